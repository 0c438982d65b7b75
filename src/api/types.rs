//! Request and response bodies.

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::task::{DueState, Statistics, Task, TaskFilter, TaskStatus};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Query string of `GET /api/tasks`. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
    pub due: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TaskListQuery {
    pub fn into_filter(self) -> Result<TaskFilter, ApiError> {
        let status = match non_empty(self.status).as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<TaskStatus>()
                    .map_err(|e| ApiError::InvalidFilter(e.to_string()))?,
            ),
        };

        let due = match non_empty(self.due).as_deref() {
            None | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<DueState>()
                    .map_err(|e| ApiError::InvalidFilter(e.to_string()))?,
            ),
        };

        Ok(TaskFilter {
            status,
            tag: non_empty(self.tag),
            search: non_empty(self.q),
            due,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    pub user_id: String,
    pub statistics: Statistics,
    pub tags: Vec<String>,
    pub tasks: Vec<Task>,
}
