//! The turn-based review loop against the remote scheduler.

pub(crate) mod models;
pub mod session;

pub use models::{RateAck, Rating};
pub use session::{CompletionReason, DeckScope, ReviewPhase, ReviewSession};
