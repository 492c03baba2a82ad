//! Client commands: talk to a running server.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use todosync_client::{TodoClient, DEFAULT_URL};
use todosync_core::{ServerEvent, Todo};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{timeout, Duration};
use tracing::warn;

use crate::output;

/// How long to wait for the server to answer a request.
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Args)]
pub struct ConnectArgs {
    /// Server WebSocket URL
    #[arg(long, env = "TODOSYNC_URL", default_value = DEFAULT_URL)]
    pub url: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Todo text
    pub text: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Todo ID
    pub id: String,

    /// New text
    #[arg(short, long)]
    pub text: Option<String>,

    /// Mark as completed or not
    #[arg(short, long)]
    pub completed: Option<bool>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Todo ID
    pub id: String,
}

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

/// A connected client and its event stream, past the initial snapshot.
struct Session {
    client: TodoClient,
    events: broadcast::Receiver<ServerEvent>,
    todos: Vec<Todo>,
}

impl Session {
    async fn open(args: &ConnectArgs) -> Result<Self> {
        let client = TodoClient::new(&args.url);
        let mut events = client.subscribe();
        client
            .connect()
            .await
            .with_context(|| format!("Could not connect to {}", args.url))?;

        let todos = wait_for(&mut events, |event| match event {
            ServerEvent::InitialTodos(todos) => Some(todos),
            _ => None,
        })
        .await?;

        Ok(Self {
            client,
            events,
            todos,
        })
    }
}

/// Wait until `pick` accepts an event, skipping the rest.
async fn wait_for<T>(
    events: &mut broadcast::Receiver<ServerEvent>,
    mut pick: impl FnMut(ServerEvent) -> Option<T>,
) -> Result<T> {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(found) = pick(event) {
                        return Ok(found);
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed events"),
                Err(RecvError::Closed) => bail!("Connection closed"),
            }
        }
    };
    timeout(REPLY_TIMEOUT, wait)
        .await
        .context("Timed out waiting for the server")?
}

pub async fn list(args: ListArgs) -> Result<()> {
    let session = Session::open(&args.connect).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.todos)?);
    } else {
        output::print_todos(&session.todos);
    }
    Ok(())
}

pub async fn add(args: AddArgs) -> Result<()> {
    let mut session = Session::open(&args.connect).await?;
    let known: HashSet<String> = session.todos.iter().map(|t| t.id.clone()).collect();
    session.client.add_todo(args.text.clone()).await?;

    // Adds carry no request id, so a concurrent add of the same text by
    // another client can still be taken for ours.
    let todo = wait_for(&mut session.events, |event| match event {
        ServerEvent::TodoAdded(todo) if todo.text == args.text && !known.contains(&todo.id) => {
            Some(todo)
        }
        _ => None,
    })
    .await?;

    println!(
        "{} Added todo: {} ({})",
        "✓".green().bold(),
        todo.text.cyan(),
        todo.id.dimmed()
    );
    Ok(())
}

pub async fn update(args: UpdateArgs) -> Result<()> {
    if args.text.is_none() && args.completed.is_none() {
        bail!("Nothing to update: pass --text and/or --completed");
    }

    let mut session = Session::open(&args.connect).await?;
    let current = session
        .todos
        .iter()
        .find(|t| t.id == args.id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No todo with id '{}'", args.id))?;

    let todo = Todo {
        text: args.text.unwrap_or(current.text),
        completed: args.completed.unwrap_or(current.completed),
        ..current
    };
    session.client.update_todo(&todo).await?;

    wait_for(&mut session.events, |event| match event {
        ServerEvent::TodoUpdated(t) if t.id == todo.id => Some(()),
        _ => None,
    })
    .await?;

    println!("{} Updated todo:", "✓".green().bold());
    output::print_todo(&todo);
    Ok(())
}

pub async fn delete(args: DeleteArgs) -> Result<()> {
    let mut session = Session::open(&args.connect).await?;
    if !session.todos.iter().any(|t| t.id == args.id) {
        println!("{} No todo with id {}", "!".yellow().bold(), args.id.dimmed());
    }

    session.client.delete_todo(args.id.clone()).await?;
    wait_for(&mut session.events, |event| match event {
        ServerEvent::TodoDeleted(id) if id == args.id => Some(()),
        _ => None,
    })
    .await?;

    println!("{} Deleted todo {}", "✓".green().bold(), args.id.dimmed());
    Ok(())
}

pub async fn watch(args: WatchArgs) -> Result<()> {
    let mut session = Session::open(&args.connect).await?;
    output::print_todos(&session.todos);
    println!();
    println!("  {}", "Watching for changes, Ctrl+C to stop".dimmed());
    println!();

    let mut liveness = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            event = session.events.recv() => match event {
                Ok(event) => output::print_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed events, resyncing");
                    session.client.get_all_todos().await?;
                }
                Err(RecvError::Closed) => break,
            },
            _ = liveness.tick() => {
                if !session.client.is_connected().await {
                    println!("{} Server closed the connection, reconnecting", "!".yellow().bold());
                    // A fresh snapshot arrives as initialTodos once reconnected
                    if let Err(e) = session.client.connect().await {
                        println!("{} Reconnect failed: {e}", "✗".red().bold());
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
