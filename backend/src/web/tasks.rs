use crate::error::ApiError;
use crate::store::TaskStore;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use shared::{CreateTaskRequest, MessageResponse, Task, UpdateTaskRequest};

/// Ids arrive as raw path text. Like the integer column they are compared
/// against, a whole-valued number such as `1.0` names id 1; anything else
/// matches no row.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Ok(n as i64),
        _ => Err(ApiError::NotFound),
    }
}

/// Handler for GET /api/tasks
#[tracing::instrument(skip(store))]
pub async fn list_tasks_handler(
    State(store): State<TaskStore>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = store.list().await?;
    Ok(Json(tasks))
}

/// Handler for GET /api/tasks/{id}
#[tracing::instrument(skip(store))]
pub async fn get_task_handler(
    State(store): State<TaskStore>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = store.get(parse_id(&id)?).await?;
    Ok(Json(task))
}

/// Handler for POST /api/tasks
#[tracing::instrument(skip(store, payload))]
pub async fn create_task_handler(
    State(store): State<TaskStore>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(request) = payload?;
    let task = store.create(request.title, request.description).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Handler for PUT /api/tasks/{id}
#[tracing::instrument(skip(store, payload))]
pub async fn update_task_handler(
    State(store): State<TaskStore>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let task = store
        .update(id, request.title, request.description, request.completed.0)
        .await?;
    Ok(Json(task))
}

/// Handler for DELETE /api/tasks/{id}
#[tracing::instrument(skip(store))]
pub async fn delete_task_handler(
    State(store): State<TaskStore>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    store.delete(parse_id(&id)?).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Creates the task routes, relative to the API prefix.
pub fn create_task_router(store: TaskStore) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/:id",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(store)
}
