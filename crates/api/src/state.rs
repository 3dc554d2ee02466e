use std::sync::Arc;

use pressgrid_grid::GridController;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Category grid over the configured store and file store.
    pub grid: Arc<GridController>,
    pub config: Arc<ServerConfig>,
}
