use async_trait::async_trait;
use hub_core::{ChatMessage, ConversationHistory, Result};
use std::sync::Arc;

/// The result of one completed user turn.
///
/// `messages` is the full transcript including the new user message, any
/// intermediate tool exchanges and the final assistant reply. Callers commit
/// it wholesale; a failed turn commits nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub messages: ConversationHistory,
    pub output: String,
}

/// A conversational backend that can advance a transcript by one user turn.
///
/// Implementations receive the committed history as-is and must not mutate
/// shared state; the caller serializes turns per session.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    async fn run_turn(&self, history: &[ChatMessage], message: &str) -> Result<TurnOutcome>;
}

/// Shared handle to a built backend, cloned into each session.
pub type AgentHandle = Arc<dyn AgentBackend>;
