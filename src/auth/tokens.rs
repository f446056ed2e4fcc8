//! Persistent storage for the access/refresh token pair.
//!
//! The pair is written to a mode-0600 file under the app data directory and
//! mirrored into the platform keyring on a best-effort basis; reads try the
//! file first and fall back to the keyring. Storing both tokens as a single
//! record keeps the pair atomic: there is no state in which only one of the
//! two tokens is persisted.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::models::TokenPair;

const KEYRING_SERVICE: &str = "recallforge";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Client-local store for the token pair. All operations are synchronous
/// and touch nothing but local storage.
pub struct TokenStore {
    file_path: PathBuf,
    keyring_user: String,
}

impl TokenStore {
    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: &Path) -> Self {
        // Key the keyring entry by directory name so separate data dirs
        // (notably test fixtures) do not share an entry.
        let keyring_user = data_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("default")
            .to_string();

        Self {
            file_path: data_dir.join(".credentials").join("tokens"),
            keyring_user,
        }
    }

    /// Persist a token pair, replacing any previous one.
    pub fn set(&self, pair: &TokenPair) -> Result<(), StoreError> {
        let value = format!("{}:{}", pair.access, pair.refresh);

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.file_path, &value)?;
        // Restrict permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600));
        }

        // Mirror into the keyring (best-effort)
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &self.keyring_user) {
            let _ = entry.set_password(&value);
        }

        Ok(())
    }

    /// Load the stored pair, if any. A malformed record reads as absent.
    pub fn get(&self) -> Option<TokenPair> {
        if let Ok(data) = fs::read_to_string(&self.file_path) {
            if let Some(pair) = parse_record(data.trim()) {
                return Some(pair);
            }
        }

        let entry = keyring::Entry::new(KEYRING_SERVICE, &self.keyring_user).ok()?;
        let value = entry.get_password().ok()?;
        parse_record(value.trim())
    }

    /// Current access token, if a pair is stored.
    pub fn access_token(&self) -> Option<String> {
        self.get().map(|pair| pair.access)
    }

    /// Remove the pair from both stores. Always removes both tokens together.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.file_path);

        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &self.keyring_user) {
            let _ = entry.delete_credential();
        }
    }
}

/// Parse the "access:refresh" record format.
fn parse_record(data: &str) -> Option<TokenPair> {
    let (access, refresh) = data.split_once(':')?;
    if access.is_empty() || refresh.is_empty() {
        return None;
    }
    Some(TokenPair {
        access: access.to_string(),
        refresh: refresh.to_string(),
    })
}
