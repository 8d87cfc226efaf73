//! Application state shared across all handlers.

use crate::auth::{Authenticator, UserTable};
use hub_agent::OpenAiAgentFactory;
use hub_core::HubConfig;
use hub_session::{Dispatcher, SessionStore};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub auth: Arc<dyn Authenticator>,
    pub config: Arc<HubConfig>,
}

impl AppState {
    /// Wire up the production components from `config`.
    pub fn new(config: HubConfig) -> Self {
        let store = Arc::new(SessionStore::new(
            Arc::new(OpenAiAgentFactory::new()),
            Duration::from_secs(config.tool_timeout_secs),
        ));
        let auth: Arc<dyn Authenticator> = Arc::new(UserTable::new(config.users_file.clone()));
        Self::with_parts(store, auth, config)
    }

    /// Assemble state from explicit components.
    pub fn with_parts(
        store: Arc<SessionStore>,
        auth: Arc<dyn Authenticator>,
        config: HubConfig,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store)));
        Self {
            store,
            dispatcher,
            auth,
            config: Arc::new(config),
        }
    }
}
