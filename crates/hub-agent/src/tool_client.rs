use async_trait::async_trait;
use hub_core::{HubError, Result};
use hub_tools::ToolServerSpec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Applied when a spec carries no timeout of its own.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(100);

/// Executes a single tool invocation against a tool server.
#[async_trait]
pub trait ToolClient: Send + Sync {
    async fn call(&self, spec: &ToolServerSpec, arguments: &Value) -> Result<String>;
}

/// Speaks line-delimited JSON-RPC to a tool server spawned per call.
///
/// The child is launched with the spec's full command line, handed one
/// `tools/call` request on stdin and killed after its first reply line.
pub struct StdioToolClient;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[async_trait]
impl ToolClient for StdioToolClient {
    async fn call(&self, spec: &ToolServerSpec, arguments: &Value) -> Result<String> {
        let argv = spec.command_line();
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HubError::Backend(format!("tool server {} has no command", spec.name)))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HubError::Backend(format!("spawn tool server {}: {e}", spec.name)))?;

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "tools/call",
            params: json!({"name": spec.name, "arguments": arguments}),
        };
        let mut frame = serde_json::to_string(&request)?;
        frame.push('\n');

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| HubError::Backend(format!("tool server {} has no stdin", spec.name)))?;
        stdin
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| HubError::Backend(format!("write to tool server {}: {e}", spec.name)))?;
        // Close the pipe so read-loop servers see EOF after the one request.
        drop(stdin);

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HubError::Backend(format!("tool server {} has no stdout", spec.name)))?;
        let mut lines = BufReader::new(stdout).lines();

        let timeout = spec.timeout.unwrap_or(DEFAULT_TOOL_TIMEOUT);
        let reply = tokio::time::timeout(timeout, lines.next_line())
            .await
            .map_err(|_| {
                HubError::Backend(format!(
                    "tool server {} timed out after {}s",
                    spec.name,
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| HubError::Backend(format!("read from tool server {}: {e}", spec.name)))?
            .ok_or_else(|| {
                HubError::Backend(format!("tool server {} exited without replying", spec.name))
            })?;

        let _ = child.kill().await;
        tracing::debug!(server = %spec.name, bytes = reply.len(), "tool server replied");

        let response: RpcResponse = serde_json::from_str(&reply).map_err(|e| {
            HubError::Backend(format!("malformed reply from tool server {}: {e}", spec.name))
        })?;
        if let Some(err) = response.error {
            return Err(HubError::Backend(format!(
                "tool server {} error {}: {}",
                spec.name, err.code, err.message
            )));
        }
        let result = response.result.ok_or_else(|| {
            HubError::Backend(format!("tool server {} reply carried no result", spec.name))
        })?;
        Ok(render_result(&result))
    }
}

/// Flattens a tool result into the text handed back to the model.
///
/// Results shaped as `{"content": [{"type": "text", "text": ...}, ...]}`
/// have their text blocks joined; anything else is passed through as JSON.
pub(crate) fn render_result(result: &Value) -> String {
    match result.get("content").and_then(Value::as_array) {
        Some(blocks) => {
            let texts: Vec<&str> = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            if texts.is_empty() {
                result.to_string()
            } else {
                texts.join("\n")
            }
        }
        None => result.to_string(),
    }
}
