/// Owner-scoped task endpoints
///
/// # Endpoints
///
/// - `POST   /tasks` - Create a task owned by the caller
/// - `GET    /tasks` - List the caller's tasks
/// - `GET    /tasks/:id` - Fetch one owned task
/// - `PUT    /tasks/:id` - Update one owned task
/// - `DELETE /tasks/:id` - Delete one owned task
///
/// The owner of every operation is the `AuthContext` injected by the
/// bearer middleware, threaded into the store as an explicit argument. A
/// task that belongs to someone else yields the same 404 as a task that
/// does not exist, so other users' task ids never leak. Repeating a
/// delete reports 404 as well; retrying is logically safe.
use crate::app::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use taskvault_shared::{
    auth::middleware::AuthContext,
    error::{ApiError, ApiResult},
    models::task::{CreateTask, Task, UpdateTask},
};
use uuid::Uuid;

/// Response carrying a task plus an outcome message
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Human-readable outcome
    pub message: String,

    /// The affected task
    pub task: Task,
}

/// Response for operations that return no task body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

/// Create a task
///
/// The owner is always the verified caller; any owner field in the body
/// is not even deserialized.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = Task::create(&state.db, auth.user_id, req).await?;

    tracing::debug!(task_id = %task.id, owner_id = %auth.user_id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully".to_string(),
            task,
        }),
    ))
}

/// List all tasks owned by the caller, in insertion order
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(tasks))
}

/// Fetch a single owned task
///
/// # Errors
///
/// `404` when the id does not exist or belongs to a different owner
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = Task::find_for_owner(&state.db, auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(serde_json::json!({ "task": task })))
}

/// Update a single owned task
///
/// Only the task's own scalar fields are replaced; the owner is never
/// part of the payload.
///
/// # Errors
///
/// `404` when the id does not exist or belongs to a different owner
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::update_for_owner(&state.db, auth.user_id, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskResponse {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// Delete a single owned task
///
/// # Errors
///
/// `404` when the id does not exist, belongs to a different owner, or was
/// already deleted
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete_for_owner(&state.db, auth.user_id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
