//! Agent hub HTTP server (Axum).
//!
//! REST surface for login/logout, chat dispatch, session enumeration and
//! health monitoring, backed by the per-user session store.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use hub_core::HubConfig;
use state::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router with production state from `config`.
pub fn app(config: HubConfig) -> Router {
    app_with_state(AppState::new(config))
}

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/login", post(routes::login))
        .route("/logout/{username}", post(routes::logout))
        .route("/chat", post(routes::chat))
        .route("/users", get(routes::list_users))
        .route("/user_config/{username}", get(routes::user_config))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
