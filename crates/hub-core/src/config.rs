//! Service and per-agent configuration.

use crate::error::{HubError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub server: ServerConfig,
    /// Directory holding one sandbox subdirectory per user.
    pub workspace_root: PathBuf,
    /// Tool server config files applied to every user, in order.
    pub tool_sources: Vec<PathBuf>,
    /// Extra tool server config files appended for specific users.
    pub extra_tool_sources: HashMap<String, Vec<PathBuf>>,
    /// Per-call timeout stamped onto every provisioned tool server.
    pub tool_timeout_secs: u64,
    /// Seconds between idle sweeps.
    pub reap_interval_secs: u64,
    /// Sessions idle strictly longer than this are evicted.
    pub idle_timeout_secs: u64,
    /// Credential table consulted at login.
    pub users_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8000,
            },
            workspace_root: PathBuf::from("./workspace"),
            tool_sources: Vec::new(),
            extra_tool_sources: HashMap::new(),
            tool_timeout_secs: 100,
            reap_interval_secs: 300,
            idle_timeout_secs: 1800,
            users_file: PathBuf::from("./users.json"),
        }
    }
}

impl HubConfig {
    /// Load configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| HubError::Config(format!("read {}: {e}", path.display())))?;
        let config: HubConfig = serde_json::from_slice(&bytes)
            .map_err(|e| HubError::Config(format!("parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Tool sources for one user: the shared list plus any per-user extras.
    pub fn tool_sources_for(&self, username: &str) -> Vec<PathBuf> {
        let mut sources = self.tool_sources.clone();
        if let Some(extra) = self.extra_tool_sources.get(username) {
            sources.extend(extra.iter().cloned());
        }
        sources
    }
}

/// Everything needed to build one user's agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub model_name: String,
    pub api_key: String,
    /// OpenAI-compatible endpoint base; provider default when None.
    pub base_url: Option<String>,
    pub system_prompt: String,
    /// Directory the user's sandbox lives under.
    pub workspace_root: PathBuf,
    /// Tool server config files, in load order.
    pub tool_sources: Vec<PathBuf>,
}
