use crate::store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Background task that periodically evicts idle sessions.
pub struct IdleReaper {
    handle: JoinHandle<()>,
}

impl IdleReaper {
    /// Spawn the sweep loop: every `interval`, sessions idle longer than
    /// `max_idle` are evicted.
    pub fn spawn(store: Arc<SessionStore>, interval: Duration, max_idle: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // An interval's first tick fires immediately; consume it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = store.reap_idle(max_idle);
                if !evicted.is_empty() {
                    tracing::info!(count = evicted.len(), users = ?evicted, "evicted idle sessions");
                }
            }
        });
        Self { handle }
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for IdleReaper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
