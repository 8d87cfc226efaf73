//! Crate-wide error taxonomy.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Credential store failure: {0}")]
    AuthStore(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Workspace error: {0}")]
    Workspace(String),
    #[error("Agent build failed: {0}")]
    AgentBuild(String),
    #[error("No active session for user: {username}")]
    SessionNotFound { username: String },
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;
