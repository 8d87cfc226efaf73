//! HTTP handlers for the hub API.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use hub_core::{AgentConfig, HubError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Login request. Absent fields deserialize as empty and fail validation
/// with a 400 rather than a rejection at the extractor.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub system_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub session_created: bool,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct UserEntry {
    pub username: String,
    pub model_name: String,
    pub is_active: bool,
    pub last_active: String,
}

fn validate_login(req: &LoginRequest) -> Result<(), HubError> {
    if req.username.trim().is_empty() {
        return Err(HubError::Validation("username must not be empty".to_string()));
    }
    let mut missing = Vec::new();
    if req.model_name.trim().is_empty() {
        missing.push("model_name");
    }
    if req.api_key.trim().is_empty() {
        missing.push("api_key");
    }
    if req.system_prompt.trim().is_empty() {
        missing.push("system_prompt");
    }
    if !missing.is_empty() {
        return Err(HubError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// POST /login: verify credentials, then build and register a session.
///
/// A session already live for the username is replaced. Creation is
/// all-or-nothing: any failure leaves the store as it was.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_login(&req)?;
    state.auth.verify(&req.username, &req.password).await?;

    let config = AgentConfig {
        model_name: req.model_name,
        api_key: req.api_key,
        base_url: req.base_url,
        system_prompt: req.system_prompt,
        workspace_root: state.config.workspace_root.clone(),
        tool_sources: state.config.tool_sources_for(&req.username),
    };
    let session = state.store.create(&req.username, config).await?;
    tracing::info!(username = %req.username, id = %session.id, "login");

    Ok(Json(LoginResponse {
        message: format!("User {} logged in", req.username),
        session_created: true,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// POST /logout/{username}: drop the session. Idempotent.
pub async fn logout(State(state): State<AppState>, Path(username): Path<String>) -> Json<Value> {
    let existed = state.store.close(&username);
    tracing::info!(username = %username, existed, "logout");
    Json(json!({ "message": format!("User {username} logged out") }))
}

/// POST /chat: run one turn against the caller's live session.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.username.trim().is_empty() {
        return Err(HubError::Validation("username must not be empty".to_string()).into());
    }
    if req.message.trim().is_empty() {
        return Err(HubError::Validation("message must not be empty".to_string()).into());
    }

    let response = state.dispatcher.send(&req.username, &req.message).await?;
    Ok(Json(ChatResponse {
        response,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// GET /users: all live sessions.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserEntry>> {
    let users = state
        .store
        .list()
        .into_iter()
        .map(|info| UserEntry {
            username: info.username,
            model_name: info.model_name,
            is_active: info.is_active,
            last_active: info.last_active.to_rfc3339(),
        })
        .collect();
    Json(users)
}

/// GET /user_config/{username}: the session's agent configuration.
pub async fn user_config(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = state.store.get(&username).ok_or_else(|| HubError::SessionNotFound {
        username: username.clone(),
    })?;
    Ok(Json(json!({
        "username": username,
        "model_name": session.config.model_name.clone(),
        "base_url": session.config.base_url.clone(),
        "system_prompt": truncate_prompt(&session.config.system_prompt),
    })))
}

/// GET /health: liveness plus the active session count.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "active_users": state.store.len(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Prompts longer than 100 characters are cut and marked with an ellipsis.
fn truncate_prompt(prompt: &str) -> String {
    const LIMIT: usize = 100;
    if prompt.chars().count() > LIMIT {
        let cut: String = prompt.chars().take(LIMIT).collect();
        format!("{cut}...")
    } else {
        prompt.to_string()
    }
}
