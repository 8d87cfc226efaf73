//! Credential verification for login.

use async_trait::async_trait;
use hub_core::{HubError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Verifies login credentials.
///
/// Unknown usernames and wrong passwords are distinct [`HubError::Auth`]
/// failures; trouble reaching the credential store is
/// [`HubError::AuthStore`].
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<()>;
}

/// Credential table backed by a JSON file.
///
/// Format: `{"users": {"alice": "secret", ...}}`. The file is re-read on
/// every verification, so edits take effect without a restart.
pub struct UserTable {
    path: PathBuf,
}

#[derive(Deserialize)]
struct UserFile {
    #[serde(default)]
    users: HashMap<String, String>,
}

impl UserTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<UserFile> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| HubError::AuthStore(format!("read {}: {e}", self.path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| HubError::AuthStore(format!("parse {}: {e}", self.path.display())))
    }
}

#[async_trait]
impl Authenticator for UserTable {
    async fn verify(&self, username: &str, password: &str) -> Result<()> {
        let table = self.load().await?;
        match table.users.get(username) {
            None => Err(HubError::Auth(format!("unknown username: {username}"))),
            Some(expected) if expected == password => Ok(()),
            Some(_) => Err(HubError::Auth(format!("wrong password for {username}"))),
        }
    }
}
