//! Tool server configuration, workspace isolation and provisioning.

pub mod loader;
pub mod provision;
pub mod spec;
pub mod workspace;

pub use loader::{load_tool_config, load_tool_specs, parse_tool_config};
pub use provision::provision;
pub use spec::{ToolServerKind, ToolServerSpec, FILESYSTEM_TOOL_PACKAGE};
pub use workspace::{ensure_sandbox, isolate, sandbox_path};

#[cfg(test)]
mod tests;
