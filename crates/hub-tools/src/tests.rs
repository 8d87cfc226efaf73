use crate::loader::{load_tool_specs, parse_tool_config};
use crate::provision::provision;
use crate::spec::{ToolServerKind, FILESYSTEM_TOOL_PACKAGE};
use crate::workspace::{ensure_sandbox, isolate, sandbox_path};
use hub_core::HubError;
use std::path::PathBuf;
use std::time::Duration;

// ========== Config Parsing ==========

#[test]
fn test_parse_basic_config() {
    let specs = parse_tool_config(
        r#"{
            "toolServers": [
                {"name": "excel", "command": "npx", "args": ["-y", "excel-server"]},
                {"name": "search", "command": "uvx", "args": ["search-server"],
                 "description": "web search"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].name, "excel");
    assert_eq!(specs[0].command, "npx");
    assert_eq!(specs[1].name, "search");
    assert_eq!(specs[1].description.as_deref(), Some("web search"));
    assert_eq!(specs[1].kind, ToolServerKind::Generic);
}

#[test]
fn test_parse_name_defaults_to_command() {
    let specs = parse_tool_config(r#"{"toolServers": [{"command": "uvx", "args": []}]}"#).unwrap();
    assert_eq!(specs[0].name, "uvx");
}

#[test]
fn test_parse_missing_command() {
    let err = parse_tool_config(r#"{"toolServers": [{"name": "broken"}]}"#).unwrap_err();
    assert!(matches!(err, HubError::Config(_)));
}

#[test]
fn test_parse_empty_command() {
    let err =
        parse_tool_config(r#"{"toolServers": [{"name": "blank", "command": "  "}]}"#).unwrap_err();
    assert!(matches!(err, HubError::Config(_)));
    assert!(err.to_string().contains("blank"));
}

#[test]
fn test_parse_malformed_json() {
    let err = parse_tool_config("{ not json").unwrap_err();
    assert!(matches!(err, HubError::Config(_)));
}

#[test]
fn test_parse_empty_document() {
    let specs = parse_tool_config("{}").unwrap();
    assert!(specs.is_empty());
}

// ========== Filesystem Root Lifting ==========

#[test]
fn test_filesystem_root_lifted() {
    let specs = parse_tool_config(&format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx",
              "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/srv/files"]}}
        ]}}"#
    ))
    .unwrap();
    assert_eq!(
        specs[0].kind,
        ToolServerKind::Filesystem { root: PathBuf::from("/srv/files") }
    );
    // The package argument stays; the root moves into the kind.
    assert_eq!(specs[0].args, ["-y", FILESYSTEM_TOOL_PACKAGE]);
}

#[test]
fn test_filesystem_command_line_reinserts_root() {
    let specs = parse_tool_config(&format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx",
              "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/srv/files"]}}
        ]}}"#
    ))
    .unwrap();
    assert_eq!(
        specs[0].command_line(),
        ["npx", "-y", FILESYSTEM_TOOL_PACKAGE, "/srv/files"]
    );
}

#[test]
fn test_filesystem_without_configured_root() {
    let specs = parse_tool_config(&format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx", "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}"]}}
        ]}}"#
    ))
    .unwrap();
    assert!(specs[0].is_filesystem());
    assert_eq!(
        specs[0].kind,
        ToolServerKind::Filesystem { root: PathBuf::new() }
    );
}

#[test]
fn test_filesystem_trailing_args_preserved() {
    let specs = parse_tool_config(&format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx",
              "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/data", "--readonly"]}}
        ]}}"#
    ))
    .unwrap();
    assert_eq!(specs[0].args, ["-y", FILESYSTEM_TOOL_PACKAGE, "--readonly"]);
    assert_eq!(
        specs[0].command_line(),
        ["npx", "-y", FILESYSTEM_TOOL_PACKAGE, "/data", "--readonly"]
    );
}

#[test]
fn test_generic_command_line_unchanged() {
    let specs = parse_tool_config(
        r#"{"toolServers": [{"name": "excel", "command": "uvx", "args": ["excel-server", "--strict"]}]}"#,
    )
    .unwrap();
    assert_eq!(specs[0].command_line(), ["uvx", "excel-server", "--strict"]);
}

// ========== Multiple Sources ==========

#[test]
fn test_load_specs_preserves_order_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    std::fs::write(
        &a,
        r#"{"toolServers": [{"name": "one", "command": "x"}, {"name": "two", "command": "y"}]}"#,
    )
    .unwrap();
    std::fs::write(&b, r#"{"toolServers": [{"name": "one", "command": "z"}]}"#).unwrap();

    let specs = load_tool_specs(&[a, b]).unwrap();
    let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
    // Duplicate names are kept as distinct entries, in file order.
    assert_eq!(names, ["one", "two", "one"]);
    assert_eq!(specs[2].command, "z");
}

#[test]
fn test_load_specs_failing_file_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    std::fs::write(&good, r#"{"toolServers": [{"name": "ok", "command": "x"}]}"#).unwrap();
    std::fs::write(&bad, "not json").unwrap();

    let err = load_tool_specs(&[good, bad]).unwrap_err();
    assert!(matches!(err, HubError::Config(_)));
    assert!(err.to_string().contains("bad.json"));
}

#[test]
fn test_load_specs_missing_file() {
    let err = load_tool_specs(&[PathBuf::from("/nonexistent/tools.json")]).unwrap_err();
    assert!(matches!(err, HubError::Config(_)));
}

// ========== Sandboxes ==========

#[test]
fn test_sandbox_path_format() {
    let p = sandbox_path(std::path::Path::new("/ws"), "alice");
    assert_eq!(p, PathBuf::from("/ws/workspace_alice"));
}

#[test]
fn test_ensure_sandbox_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let sandbox = ensure_sandbox(dir.path(), "alice").unwrap();
    assert!(sandbox.is_dir());
    assert!(sandbox.ends_with("workspace_alice"));
    // Canonical, so absolute.
    assert!(sandbox.is_absolute());
}

#[test]
fn test_ensure_sandbox_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let first = ensure_sandbox(dir.path(), "bob").unwrap();
    let second = ensure_sandbox(dir.path(), "bob").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_ensure_sandbox_creates_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let nested_root = dir.path().join("deep").join("workspaces");
    let sandbox = ensure_sandbox(&nested_root, "carol").unwrap();
    assert!(sandbox.is_dir());
}

#[test]
fn test_ensure_sandbox_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    for bad in ["../evil", "a/b", "a\\b", "..", ""] {
        let err = ensure_sandbox(dir.path(), bad).unwrap_err();
        assert!(matches!(err, HubError::Workspace(_)), "accepted {bad:?}");
    }
    // Nothing escaped the root.
    assert!(!dir.path().parent().unwrap().join("workspace_evil").exists());
}

// ========== Isolation ==========

#[test]
fn test_isolate_rewrites_roots_and_timeouts() {
    let mut specs = parse_tool_config(&format!(
        r#"{{"toolServers": [
            {{"name": "fs", "command": "npx",
              "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/configured/elsewhere"]}},
            {{"name": "excel", "command": "uvx", "args": ["excel-server"]}}
        ]}}"#
    ))
    .unwrap();

    let sandbox = PathBuf::from("/ws/workspace_alice");
    isolate(&mut specs, &sandbox, Duration::from_secs(100));

    assert_eq!(
        specs[0].kind,
        ToolServerKind::Filesystem { root: sandbox.clone() }
    );
    assert_eq!(specs[1].kind, ToolServerKind::Generic);
    for spec in &specs {
        assert_eq!(spec.timeout, Some(Duration::from_secs(100)));
    }
    // The launch argv now points at the sandbox, not the configured dir.
    let argv = specs[0].command_line();
    assert!(argv.contains(&sandbox.to_string_lossy().into_owned()));
    assert!(!argv.iter().any(|a| a == "/configured/elsewhere"));
}

// ========== Provisioning ==========

#[test]
fn test_provision_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tools.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"toolServers": [
                {{"name": "fs", "command": "npx",
                  "args": ["-y", "{FILESYSTEM_TOOL_PACKAGE}", "/ignored"]}},
                {{"name": "excel", "command": "uvx", "args": ["excel-server"]}}
            ]}}"#
        ),
    )
    .unwrap();
    let workspace_root = dir.path().join("ws");

    let specs = provision(
        "alice",
        &[config],
        &workspace_root,
        Duration::from_secs(100),
    )
    .unwrap();

    let sandbox = ensure_sandbox(&workspace_root, "alice").unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!(
        specs[0].kind,
        ToolServerKind::Filesystem { root: sandbox.clone() }
    );
    assert_eq!(specs[1].kind, ToolServerKind::Generic);
    assert!(specs.iter().all(|s| s.timeout == Some(Duration::from_secs(100))));
    assert!(sandbox.is_dir());
}

#[test]
fn test_provision_config_error_before_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "oops").unwrap();
    let workspace_root = dir.path().join("ws");

    let err = provision("alice", &[bad], &workspace_root, Duration::from_secs(5)).unwrap_err();
    assert!(matches!(err, HubError::Config(_)));
    // The sandbox is never created when the toolset config is rejected.
    assert!(!sandbox_path(&workspace_root, "alice").exists());
}

#[test]
fn test_provision_no_sources() {
    let dir = tempfile::tempdir().unwrap();
    let specs = provision("dana", &[], dir.path(), Duration::from_secs(5)).unwrap();
    assert!(specs.is_empty());
    assert!(sandbox_path(dir.path(), "dana").exists());
}
