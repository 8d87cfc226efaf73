//! Agent construction and turn execution for the session hub.
//!
//! An agent is a chat-completion backend bound to a model, a system prompt
//! and a provisioned set of tool servers. [`AgentFactory`] builds one per
//! login; [`AgentBackend::run_turn`] drives a single user turn, dispatching
//! tool calls through a [`ToolClient`] until the model produces plain text.

pub mod backend;
pub mod factory;
pub mod openai;
pub mod tool_client;

pub use backend::{AgentBackend, AgentHandle, TurnOutcome};
pub use factory::{AgentFactory, OpenAiAgentFactory};
pub use openai::{OpenAiBackend, DEFAULT_BASE_URL, MAX_TOOL_ROUNDS};
pub use tool_client::{StdioToolClient, ToolClient, DEFAULT_TOOL_TIMEOUT};
