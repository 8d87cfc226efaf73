//! Session lifecycle for the hub: one live agent session per user, chat
//! dispatch against it, and idle eviction.

pub mod dispatch;
pub mod reaper;
pub mod session;
pub mod store;

pub use dispatch::Dispatcher;
pub use reaper::IdleReaper;
pub use session::Session;
pub use store::{SessionInfo, SessionStore};
