//! Shared WebSocket adapter state.
//!
//! Each connection builds its own viewport controller from these parts, so
//! sessions never share debounce windows or sequence numbers.

use std::sync::Arc;

use crate::domain::ports::SpotsQuery;
use crate::domain::{ViewportController, ViewportSettings};

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub spots: Arc<dyn SpotsQuery>,
    pub settings: ViewportSettings,
    /// HTTPS hosts (and their subdomains) allowed to open sessions.
    pub allowed_hosts: Arc<[String]>,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        spots: Arc<dyn SpotsQuery>,
        settings: ViewportSettings,
        allowed_hosts: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            spots,
            settings,
            allowed_hosts: allowed_hosts.into_iter().collect(),
        }
    }

    pub(super) fn controller(&self) -> ViewportController {
        ViewportController::new(Arc::clone(&self.spots), self.settings)
    }
}
