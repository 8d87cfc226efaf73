use crate::session::Session;
use chrono::{DateTime, Utc};
use hub_agent::AgentFactory;
use hub_core::{AgentConfig, Result};
use hub_tools::provision;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Live sessions keyed by username, at most one per user.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    factory: Arc<dyn AgentFactory>,
    tool_timeout: Duration,
}

/// Row describing one live session, for listings.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub username: String,
    pub model_name: String,
    pub is_active: bool,
    pub last_active: DateTime<Utc>,
}

impl SessionStore {
    pub fn new(factory: Arc<dyn AgentFactory>, tool_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            factory,
            tool_timeout,
        }
    }

    /// Create a session for `username`, replacing any existing one.
    ///
    /// Tool provisioning and agent construction run outside the map lock;
    /// the swap itself is a single write-lock insert. The replaced session
    /// is deactivated so an in-flight turn on it refuses to commit.
    pub async fn create(&self, username: &str, config: AgentConfig) -> Result<Arc<Session>> {
        let tools = provision(
            username,
            &config.tool_sources,
            &config.workspace_root,
            self.tool_timeout,
        )?;
        let agent = self.factory.build(&config, tools).await?;
        let session = Arc::new(Session::new(username, config, agent));

        {
            let mut sessions = self.sessions.write().unwrap();
            // The old session is fully closed before the new one registers.
            if let Some(old) = sessions.remove(username) {
                old.deactivate();
                tracing::info!(username, old_id = %old.id, new_id = %session.id, "replaced session");
            } else {
                tracing::info!(username, id = %session.id, "created session");
            }
            sessions.insert(username.to_string(), Arc::clone(&session));
        }
        Ok(session)
    }

    /// Look up the live session for `username`.
    pub fn get(&self, username: &str) -> Option<Arc<Session>> {
        self.sessions.read().unwrap().get(username).cloned()
    }

    /// Remove `username`'s session. Returns false when none existed.
    pub fn close(&self, username: &str) -> bool {
        let removed = self.sessions.write().unwrap().remove(username);
        match removed {
            Some(session) => {
                session.deactivate();
                tracing::info!(username, id = %session.id, "closed session");
                true
            }
            None => false,
        }
    }

    /// Snapshot of all live sessions, unordered.
    pub fn list(&self) -> Vec<SessionInfo> {
        self.sessions
            .read()
            .unwrap()
            .values()
            .map(|s| SessionInfo {
                username: s.username.clone(),
                model_name: s.config.model_name.clone(),
                is_active: s.is_active(),
                last_active: s.last_active(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict sessions idle longer than `max_idle`; returns their usernames.
    ///
    /// Candidates are collected under the read lock, then re-checked under
    /// the write lock: a turn landing in between refreshes the timestamp
    /// and spares the session.
    pub fn reap_idle(&self, max_idle: Duration) -> Vec<String> {
        let cutoff = chrono::Duration::from_std(max_idle)
            .ok()
            .and_then(|d| Utc::now().checked_sub_signed(d));
        let Some(cutoff) = cutoff else {
            return Vec::new();
        };

        let stale: Vec<String> = {
            let sessions = self.sessions.read().unwrap();
            sessions
                .iter()
                .filter(|(_, s)| s.last_active() < cutoff)
                .map(|(name, _)| name.clone())
                .collect()
        };
        if stale.is_empty() {
            return Vec::new();
        }

        let mut evicted = Vec::new();
        let mut sessions = self.sessions.write().unwrap();
        for username in stale {
            let still_stale = sessions
                .get(&username)
                .map(|s| s.last_active() < cutoff)
                .unwrap_or(false);
            if still_stale {
                if let Some(session) = sessions.remove(&username) {
                    session.deactivate();
                    evicted.push(username);
                }
            }
        }
        evicted
    }
}
