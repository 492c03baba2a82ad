//! Todo route handlers.

use axum::{extract::State, Json};
use todosync_core::Todo;

use crate::state::AppState;

/// GET /api/todos - Current snapshot. Read-only; no events fire.
pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.coordinator.snapshot().await.to_vec())
}
