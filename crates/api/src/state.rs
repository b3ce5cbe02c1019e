use std::sync::Arc;

use irs_db::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the store is constructed once at startup and only
/// handlers touch it.
#[derive(Clone)]
pub struct AppState {
    /// In-memory issue/media/user store.
    pub store: Arc<Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
