pub mod config;
pub mod error;
pub mod message;

pub use config::{AgentConfig, HubConfig, ServerConfig};
pub use error::{HubError, Result};
pub use message::{ChatMessage, ConversationHistory, FunctionCall, Role, ToolCall};
