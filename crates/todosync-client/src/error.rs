//! Client error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No Tokio runtime: the todo client can only connect from inside an async runtime")]
    NoRuntime,

    #[error("Connection failed: {0}")]
    Connect(#[from] tungstenite::Error),

    #[error("Not connected to the todo server")]
    Disconnected,

    #[error("Protocol error: {0}")]
    Protocol(#[from] todosync_core::TodoError),
}

pub type ClientResult<T> = Result<T, ClientError>;
