//! Server configuration.

use todosync_core::{IdScheme, Store};

/// Port the server listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 3001;

/// Events queued per connection before a slow one is disconnected.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub broadcast_capacity: usize,
    pub id_scheme: IdScheme,
    /// Start with the seed items instead of an empty list.
    pub seed: bool,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The store a server with this configuration starts from.
    pub fn initial_store(&self) -> Store {
        if self.seed {
            Store::seeded()
        } else {
            Store::empty()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            id_scheme: IdScheme::default(),
            seed: true,
        }
    }
}
