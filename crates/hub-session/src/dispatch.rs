use crate::store::SessionStore;
use hub_core::{HubError, Result};
use std::sync::Arc;

/// Routes chat turns to the caller's live session.
pub struct Dispatcher {
    store: Arc<SessionStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Run one chat turn for `username` and return the assistant's reply.
    ///
    /// The transcript lock is held across the whole backend call. The new
    /// transcript is committed only when the turn succeeds and the session
    /// is still live; a session replaced or closed mid-turn discards the
    /// result. Touching on entry and on completion keeps long turns from
    /// aging into the reaper.
    pub async fn send(&self, username: &str, message: &str) -> Result<String> {
        let session = self.store.get(username).ok_or_else(|| HubError::SessionNotFound {
            username: username.to_string(),
        })?;
        if !session.is_active() {
            return Err(HubError::SessionNotFound {
                username: username.to_string(),
            });
        }

        session.touch();
        let mut transcript = session.lock_transcript().await;
        let result = session.agent().run_turn(&transcript, message).await;
        session.touch();

        match result {
            Ok(outcome) => {
                if !session.is_active() {
                    return Err(HubError::SessionNotFound {
                        username: username.to_string(),
                    });
                }
                *transcript = outcome.messages;
                tracing::debug!(username, messages = transcript.len(), "turn committed");
                Ok(outcome.output)
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "turn failed, transcript unchanged");
                Err(e)
            }
        }
    }
}
