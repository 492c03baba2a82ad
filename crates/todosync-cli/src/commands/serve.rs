//! Server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use todosync_core::IdScheme;
use todosync_web::config::{DEFAULT_BROADCAST_CAPACITY, DEFAULT_PORT};
use todosync_web::ServerConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "SOCKET_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "TODOSYNC_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Events queued per connection before a slow client is disconnected
    #[arg(long, env = "TODOSYNC_BROADCAST_CAPACITY", default_value_t = DEFAULT_BROADCAST_CAPACITY)]
    pub broadcast_capacity: usize,

    /// How new todo ids are generated (uuid, timestamp)
    #[arg(long, env = "TODOSYNC_ID_SCHEME", default_value = "uuid")]
    pub id_scheme: IdScheme,

    /// Start with an empty list instead of the sample todos
    #[arg(long)]
    pub no_seed: bool,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (implies --log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    pub fn log_path(&self) -> Option<PathBuf> {
        match (&self.log_file, self.log) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from("todosync-serve.log")),
            (None, false) => None,
        }
    }

    fn config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            broadcast_capacity: self.broadcast_capacity,
            id_scheme: self.id_scheme,
            seed: !self.no_seed,
        }
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = args.config();

    println!();
    println!("  {} {}", "todosync".cyan().bold(), "Server".bold());
    println!();
    println!(
        "  {}  ws://{}:{}/ws",
        "WebSocket".green(),
        config.host,
        config.port
    );
    println!(
        "  {}   http://{}:{}/api/todos",
        "Snapshot".green(),
        config.host,
        config.port
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    todosync_web::run_server(config).await?;

    Ok(())
}
