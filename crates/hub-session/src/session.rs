use chrono::{DateTime, Utc};
use hub_agent::AgentHandle;
use hub_core::{AgentConfig, ConversationHistory};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

/// One user's live agent session.
///
/// The transcript sits behind an async mutex held across the whole backend
/// call, so turns for the same user run strictly one at a time. Liveness
/// bookkeeping has its own locks and stays readable while a turn is in
/// flight.
pub struct Session {
    pub id: String,
    pub username: String,
    pub config: AgentConfig,
    agent: AgentHandle,
    transcript: AsyncMutex<ConversationHistory>,
    last_active: Mutex<DateTime<Utc>>,
    active: AtomicBool,
}

impl Session {
    pub fn new(username: impl Into<String>, config: AgentConfig, agent: AgentHandle) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            config,
            agent,
            transcript: AsyncMutex::new(Vec::new()),
            last_active: Mutex::new(Utc::now()),
            active: AtomicBool::new(true),
        }
    }

    pub fn agent(&self) -> &AgentHandle {
        &self.agent
    }

    /// Whether the session still accepts turns.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Mark the session dead. Idempotent.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Timestamp of the last activity.
    pub fn last_active(&self) -> DateTime<Utc> {
        *self.last_active.lock().unwrap()
    }

    /// Refresh the activity timestamp. Never moves it backwards.
    pub fn touch(&self) {
        let now = Utc::now();
        let mut guard = self.last_active.lock().unwrap();
        if now > *guard {
            *guard = now;
        }
    }

    /// Snapshot of the committed transcript.
    pub async fn history(&self) -> ConversationHistory {
        self.transcript.lock().await.clone()
    }

    /// Number of committed messages.
    pub async fn message_count(&self) -> usize {
        self.transcript.lock().await.len()
    }

    /// Lock the transcript for the duration of one turn.
    pub(crate) async fn lock_transcript(
        &self,
    ) -> tokio::sync::MutexGuard<'_, ConversationHistory> {
        self.transcript.lock().await
    }

    #[cfg(test)]
    pub(crate) fn backdate(&self, to: DateTime<Utc>) {
        *self.last_active.lock().unwrap() = to;
    }
}

// Manual impl: the agent handle has no Debug.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Session(user={}, id={}, active={})",
            self.username,
            self.id,
            self.is_active()
        )
    }
}
