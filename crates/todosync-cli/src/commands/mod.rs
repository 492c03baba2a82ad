//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod serve;
pub mod todo;

/// Real-time shared todo list
#[derive(Parser)]
#[command(name = "todosync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the todo server
    Serve(serve::ServeArgs),

    /// Print the current todo list
    List(todo::ListArgs),

    /// Add a todo
    Add(todo::AddArgs),

    /// Change a todo's text or completion
    Update(todo::UpdateArgs),

    /// Delete a todo
    Delete(todo::DeleteArgs),

    /// Print every change as it happens
    Watch(todo::WatchArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::List(args) => todo::list(args).await,
            Commands::Add(args) => todo::add(args).await,
            Commands::Update(args) => todo::update(args).await,
            Commands::Delete(args) => todo::delete(args).await,
            Commands::Watch(args) => todo::watch(args).await,
        }
    }
}
