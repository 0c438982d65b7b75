//! Task API endpoints.
//!
//! All routes here sit behind `require_session`; the subject in the request
//! extensions decides which collection is read or written.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::error::ApiError;
use super::routes::AppState;
use super::types::{TaskListQuery, TaskListResponse};
use crate::auth::SubjectIdentity;
use crate::task::{self, Task, TaskSubmission};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", axum::routing::patch(update_task).delete(delete_task))
}

/// GET /api/tasks?status=&tag=&q=&due=
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<SubjectIdentity>,
    params: Result<Query<TaskListQuery>, QueryRejection>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let Query(params) = params?;
    let filter = params.into_filter()?;
    let collection = state.tasks.get_all(subject.as_str()).await;
    let result = task::query(&collection, &filter);

    Ok(Json(TaskListResponse {
        user_id: subject.to_string(),
        statistics: result.statistics,
        tags: result.tags,
        tasks: result.tasks,
    }))
}

/// POST /api/tasks
async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<SubjectIdentity>,
    body: Result<Json<TaskSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(submission) = body?;
    let task = task::submit(&state.tasks, subject.as_str(), submission).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/tasks/:id - editing is not offered yet (501), whatever the body says.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<SubjectIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.update(subject.as_str(), &id).await?;
    Ok(Json(task))
}

/// DELETE /api/tasks/:id - not offered yet (501).
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<SubjectIdentity>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let task = state.tasks.remove(subject.as_str(), &id).await?;
    Ok(Json(task))
}
