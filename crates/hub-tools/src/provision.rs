//! Toolset provisioning: load configs, then confine them to one user.

use crate::loader::load_tool_specs;
use crate::spec::ToolServerSpec;
use crate::workspace::{ensure_sandbox, isolate};
use hub_core::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Build the isolated toolset for one user.
///
/// Loads every source in order, ensures the sandbox exists, rewrites
/// filesystem roots to it and stamps the timeout on every server. The
/// result is deterministic for identical inputs.
pub fn provision(
    username: &str,
    sources: &[PathBuf],
    workspace_root: &Path,
    timeout: Duration,
) -> Result<Vec<ToolServerSpec>> {
    let mut specs = load_tool_specs(sources)?;
    let sandbox = ensure_sandbox(workspace_root, username)?;
    isolate(&mut specs, &sandbox, timeout);
    tracing::debug!(
        username,
        servers = specs.len(),
        sandbox = %sandbox.display(),
        "provisioned toolset"
    );
    Ok(specs)
}
