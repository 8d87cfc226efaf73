use crate::backend::{AgentBackend, TurnOutcome};
use crate::tool_client::ToolClient;
use async_trait::async_trait;
use hub_core::{AgentConfig, ChatMessage, ConversationHistory, HubError, Result, Role, ToolCall};
use hub_tools::ToolServerSpec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Used when an agent config carries no base URL override.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on completion rounds within one user turn.
pub const MAX_TOOL_ROUNDS: usize = 8;

/// Chat-completion backend for OpenAI-compatible APIs.
///
/// Each turn extends the committed transcript, then loops: request a
/// completion, execute any tool calls through the [`ToolClient`], feed the
/// results back, and stop once the model answers in plain text.
pub struct OpenAiBackend {
    http: reqwest::Client,
    model: String,
    api_key: String,
    base_url: String,
    system_prompt: String,
    tools: Vec<ToolServerSpec>,
    tool_client: Arc<dyn ToolClient>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Serialize)]
struct ToolDef {
    #[serde(rename = "type")]
    typ: &'static str,
    function: FunctionDef,
}

#[derive(Serialize)]
struct FunctionDef {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantReply,
}

#[derive(Deserialize)]
struct AssistantReply {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

impl OpenAiBackend {
    pub fn new(
        config: &AgentConfig,
        tools: Vec<ToolServerSpec>,
        tool_client: Arc<dyn ToolClient>,
    ) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Self {
            http: reqwest::Client::new(),
            model: config.model_name.clone(),
            api_key: config.api_key.clone(),
            base_url,
            system_prompt: config.system_prompt.clone(),
            tools,
            tool_client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn tool_defs(&self) -> Option<Vec<ToolDef>> {
        if self.tools.is_empty() {
            return None;
        }
        let defs = self
            .tools
            .iter()
            .map(|spec| ToolDef {
                typ: "function",
                function: FunctionDef {
                    name: spec.name.clone(),
                    description: spec
                        .description
                        .clone()
                        .unwrap_or_else(|| format!("Tool server {}", spec.name)),
                    parameters: json!({"type": "object", "additionalProperties": true}),
                },
            })
            .collect();
        Some(defs)
    }

    fn spec_for(&self, name: &str) -> Result<&ToolServerSpec> {
        self.tools
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| HubError::Backend(format!("model requested unknown tool: {name}")))
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<AssistantReply> {
        let tools = self.tool_defs();
        let tool_choice = tools.as_ref().map(|_| "auto");
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools,
            tool_choice,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| HubError::Backend(format!("chat completion request: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HubError::Backend(format!("read chat completion response: {e}")))?;
        if !status.is_success() {
            return Err(HubError::Backend(format!(
                "chat completion returned {status}: {body}"
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| HubError::Backend(format!("malformed chat completion response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| HubError::Backend("chat completion returned no choices".to_string()))
    }

    async fn dispatch(&self, call: &ToolCall) -> Result<ChatMessage> {
        let spec = self.spec_for(&call.function.name)?;
        let arguments: Value = if call.function.arguments.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&call.function.arguments).map_err(|e| {
                HubError::Backend(format!(
                    "malformed arguments for tool {}: {e}",
                    call.function.name
                ))
            })?
        };
        tracing::debug!(tool = %call.function.name, "dispatching tool call");
        let result = self.tool_client.call(spec, &arguments).await?;
        Ok(ChatMessage::tool(result, &call.id, &call.function.name))
    }
}

#[async_trait]
impl AgentBackend for OpenAiBackend {
    async fn run_turn(&self, history: &[ChatMessage], message: &str) -> Result<TurnOutcome> {
        let mut messages: ConversationHistory = if history.is_empty() {
            vec![ChatMessage::system(&self.system_prompt)]
        } else {
            history.to_vec()
        };
        messages.push(ChatMessage::user(message));

        for round in 0..MAX_TOOL_ROUNDS {
            let reply = self.complete(&messages).await?;
            let tool_calls = reply.tool_calls.unwrap_or_default();

            messages.push(ChatMessage {
                role: Role::Assistant,
                content: reply.content.clone(),
                tool_calls: (!tool_calls.is_empty()).then(|| tool_calls.clone()),
                tool_call_id: None,
                name: None,
            });

            if tool_calls.is_empty() {
                tracing::debug!(rounds = round + 1, "turn complete");
                return Ok(TurnOutcome {
                    messages,
                    output: reply.content.unwrap_or_default(),
                });
            }
            for call in &tool_calls {
                messages.push(self.dispatch(call).await?);
            }
        }
        Err(HubError::Backend(format!(
            "tool loop exceeded {MAX_TOOL_ROUNDS} rounds"
        )))
    }
}
