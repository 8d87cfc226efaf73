//! Tool server config loading.
//!
//! A config file is `{"toolServers": [ ... ]}`. Entries keep file order,
//! several files concatenate in the order given, and duplicate names stay
//! as distinct entries.

use crate::spec::{ToolServerKind, ToolServerSpec, FILESYSTEM_TOOL_PACKAGE};
use hub_core::{HubError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct ToolConfigFile {
    #[serde(rename = "toolServers", default)]
    tool_servers: Vec<ToolServerEntry>,
}

#[derive(Debug, Deserialize)]
struct ToolServerEntry {
    #[serde(default)]
    name: String,
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Parse one config document.
pub fn parse_tool_config(source: &str) -> Result<Vec<ToolServerSpec>> {
    let file = parse_file(source)
        .map_err(|e| HubError::Config(format!("parse tool config: {e}")))?;
    file.tool_servers.into_iter().map(classify).collect()
}

/// Load one config file.
pub fn load_tool_config(path: &Path) -> Result<Vec<ToolServerSpec>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| HubError::Config(format!("read tool config {}: {e}", path.display())))?;
    let file = parse_file(&source)
        .map_err(|e| HubError::Config(format!("parse tool config {}: {e}", path.display())))?;
    file.tool_servers.into_iter().map(classify).collect()
}

/// Load and concatenate several config files, preserving order.
/// Any failing source aborts the whole load.
pub fn load_tool_specs(paths: &[PathBuf]) -> Result<Vec<ToolServerSpec>> {
    let mut specs = Vec::new();
    for path in paths {
        specs.extend(load_tool_config(path)?);
    }
    Ok(specs)
}

fn parse_file(source: &str) -> std::result::Result<ToolConfigFile, serde_json::Error> {
    serde_json::from_str(source)
}

fn classify(entry: ToolServerEntry) -> Result<ToolServerSpec> {
    let command = entry.command.trim().to_string();
    if command.is_empty() {
        return Err(HubError::Config(format!(
            "tool server {:?} has an empty command",
            entry.name
        )));
    }
    let name = if entry.name.trim().is_empty() {
        command.clone()
    } else {
        entry.name.trim().to_string()
    };
    let (kind, args) = split_filesystem_root(entry.args);
    Ok(ToolServerSpec {
        name,
        command,
        args,
        kind,
        timeout: None,
        description: entry.description,
    })
}

/// Lift the argument after the filesystem package out as the root. The
/// package argument itself stays in `args` so the launch argv can be
/// rebuilt around a rewritten root.
fn split_filesystem_root(args: Vec<String>) -> (ToolServerKind, Vec<String>) {
    let Some(pos) = args.iter().position(|a| a == FILESYSTEM_TOOL_PACKAGE) else {
        return (ToolServerKind::Generic, args);
    };
    let mut args = args;
    let root = if pos + 1 < args.len() {
        PathBuf::from(args.remove(pos + 1))
    } else {
        PathBuf::new()
    };
    (ToolServerKind::Filesystem { root }, args)
}
