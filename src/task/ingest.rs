//! Validation and normalization of new task submissions.
//!
//! A `TaskSubmission` is the raw shape accepted from clients. It is turned
//! into a `ValidTask` here, and only a `ValidTask` can reach the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::model::{Task, TaskStatus};
use super::store::TaskStore;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task name is required")]
    MissingName,

    #[error("Invalid status '{0}': expected one of todo, pending, completed")]
    InvalidStatus(String),

    #[error("Invalid due date '{0}': expected RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Client-supplied task fields. Everything is optional at this point.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TaskSubmission {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A submission that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTask {
    pub name: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl ValidTask {
    fn into_task(self, id: String, now: DateTime<Utc>) -> Task {
        let completed_date = (self.status == TaskStatus::Completed).then_some(now);
        Task {
            id,
            name: self.name,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            completed_date,
            tags: self.tags,
            created_at: now,
        }
    }
}

pub fn validate(submission: TaskSubmission) -> Result<ValidTask, ValidationError> {
    let name = submission
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ValidationError::MissingName)?
        .to_string();

    let status = match submission.status.as_deref().map(str::trim) {
        None | Some("") => TaskStatus::default(),
        Some(raw) => raw
            .parse()
            .map_err(|_| ValidationError::InvalidStatus(raw.to_string()))?,
    };

    let due_date = match submission.due_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_due_date(raw)?),
    };

    Ok(ValidTask {
        name,
        description: submission.description.unwrap_or_default(),
        status,
        due_date,
        tags: normalize_tags(submission.tags.unwrap_or_default()),
    })
}

fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidDueDate(raw.to_string()))
}

/// Trim, drop empties and keep the first occurrence of each tag.
fn normalize_tags(raw: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Validate `submission` and append the resulting task to `subject`'s collection.
///
/// Nothing is written when validation fails.
pub async fn submit(
    store: &TaskStore,
    subject: &str,
    submission: TaskSubmission,
) -> Result<Task, ValidationError> {
    let valid = validate(submission)?;
    let now = Utc::now();
    let task = store
        .append_with(subject, |id| valid.into_task(id, now))
        .await;
    tracing::info!(subject = %subject, task_id = %task.id, "Created task");
    Ok(task)
}
