//! Application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::coordinator::Coordinator;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let coordinator = Coordinator::new(
            config.initial_store(),
            config.id_scheme,
            config.broadcast_capacity,
        );
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}
