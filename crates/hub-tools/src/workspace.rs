//! Per-user workspace sandboxes.
//!
//! The sandbox is the only isolation boundary between users; every
//! filesystem tool a user gets is rooted here.

use crate::spec::{ToolServerKind, ToolServerSpec};
use hub_core::{HubError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sandbox directory for one user under the workspace root.
pub fn sandbox_path(workspace_root: &Path, username: &str) -> PathBuf {
    workspace_root.join(format!("workspace_{username}"))
}

/// Create the user's sandbox if needed and return its canonical path.
///
/// The username must stay a single path component, so anything that could
/// step outside the workspace root is rejected before touching the disk.
pub fn ensure_sandbox(workspace_root: &Path, username: &str) -> Result<PathBuf> {
    if username.is_empty()
        || username.contains('/')
        || username.contains('\\')
        || username.contains("..")
    {
        return Err(HubError::Workspace(format!(
            "username {username:?} is not a valid sandbox name"
        )));
    }
    let dir = sandbox_path(workspace_root, username);
    std::fs::create_dir_all(&dir)
        .map_err(|e| HubError::Workspace(format!("create sandbox {}: {e}", dir.display())))?;
    dir.canonicalize()
        .map_err(|e| HubError::Workspace(format!("resolve sandbox {}: {e}", dir.display())))
}

/// Point every filesystem tool at the sandbox and stamp the per-call timeout.
pub fn isolate(specs: &mut [ToolServerSpec], sandbox: &Path, timeout: Duration) {
    for spec in specs.iter_mut() {
        if let ToolServerKind::Filesystem { root } = &mut spec.kind {
            *root = sandbox.to_path_buf();
        }
        spec.timeout = Some(timeout);
    }
}
