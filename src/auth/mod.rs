//! Authentication: token persistence and the user session.

pub(crate) mod models;
pub mod session;
pub mod tokens;

pub use models::{TokenPair, UserProfile};
pub use session::{SessionManager, SessionState};
pub use tokens::TokenStore;
