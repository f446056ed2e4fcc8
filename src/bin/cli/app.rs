use std::sync::Arc;

use anyhow::Result;

use recallforge::api::ApiClient;
use recallforge::auth::{SessionManager, TokenStore};
use recallforge::config::{self, ClientConfig};

/// Shared wiring for all CLI commands: the token store and the client that
/// uses it.
pub struct App {
    pub client: Arc<ApiClient>,
    pub tokens: Arc<TokenStore>,
}

impl App {
    pub fn new(api_url: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::from_env()?;
        if let Some(url) = api_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        let data_dir = config::default_data_dir()?;
        let tokens = Arc::new(TokenStore::new(&data_dir));
        let client = Arc::new(ApiClient::new(&config, Arc::clone(&tokens))?);

        Ok(Self { client, tokens })
    }

    pub fn session(&self) -> SessionManager {
        SessionManager::new(Arc::clone(&self.client), Arc::clone(&self.tokens))
    }
}
