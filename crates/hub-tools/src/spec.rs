//! Tool server descriptions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Package name of the filesystem tool server.
pub const FILESYSTEM_TOOL_PACKAGE: &str = "@modelcontextprotocol/server-filesystem";

/// What a tool server is allowed to touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolServerKind {
    /// Filesystem server rooted at a directory. The configured root is
    /// replaced with the per-user sandbox before launch.
    Filesystem { root: PathBuf },
    /// Opaque server launched exactly as configured.
    Generic,
}

/// One tool server a user's agent can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolServerSpec {
    pub name: String,
    pub command: String,
    /// Launch arguments without the filesystem root, which lives in `kind`.
    pub args: Vec<String>,
    pub kind: ToolServerKind,
    /// Per-call timeout, stamped during provisioning.
    pub timeout: Option<Duration>,
    pub description: Option<String>,
}

impl ToolServerSpec {
    pub fn is_filesystem(&self) -> bool {
        matches!(self.kind, ToolServerKind::Filesystem { .. })
    }

    /// Full launch argv. For filesystem servers the root is inserted right
    /// after the package argument.
    pub fn command_line(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.command.clone());
        match &self.kind {
            ToolServerKind::Filesystem { root } => {
                let mut inserted = false;
                for arg in &self.args {
                    argv.push(arg.clone());
                    if !inserted && arg == FILESYSTEM_TOOL_PACKAGE {
                        argv.push(root.to_string_lossy().into_owned());
                        inserted = true;
                    }
                }
                if !inserted {
                    argv.push(root.to_string_lossy().into_owned());
                }
            }
            ToolServerKind::Generic => argv.extend(self.args.iter().cloned()),
        }
        argv
    }
}
