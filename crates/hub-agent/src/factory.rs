use crate::backend::AgentHandle;
use crate::openai::OpenAiBackend;
use crate::tool_client::{StdioToolClient, ToolClient};
use async_trait::async_trait;
use hub_core::{AgentConfig, HubError, Result};
use hub_tools::ToolServerSpec;
use std::sync::Arc;

/// Builds a backend for a freshly provisioned session.
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn build(&self, config: &AgentConfig, tools: Vec<ToolServerSpec>) -> Result<AgentHandle>;
}

/// Factory for [`OpenAiBackend`] agents sharing one tool client.
pub struct OpenAiAgentFactory {
    tool_client: Arc<dyn ToolClient>,
}

impl OpenAiAgentFactory {
    pub fn new() -> Self {
        Self {
            tool_client: Arc::new(StdioToolClient),
        }
    }

    pub fn with_tool_client(tool_client: Arc<dyn ToolClient>) -> Self {
        Self { tool_client }
    }
}

impl Default for OpenAiAgentFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentFactory for OpenAiAgentFactory {
    async fn build(&self, config: &AgentConfig, tools: Vec<ToolServerSpec>) -> Result<AgentHandle> {
        if config.model_name.trim().is_empty() {
            return Err(HubError::AgentBuild("model name is empty".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(HubError::AgentBuild("api key is empty".to_string()));
        }
        for spec in &tools {
            if spec.command.trim().is_empty() {
                return Err(HubError::AgentBuild(format!(
                    "tool server {} has no command",
                    spec.name
                )));
            }
        }
        tracing::debug!(model = %config.model_name, tools = tools.len(), "building agent");
        Ok(Arc::new(OpenAiBackend::new(
            config,
            tools,
            Arc::clone(&self.tool_client),
        )))
    }
}
