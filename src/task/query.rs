//! Filtered views and dashboard statistics over a task collection.
//!
//! Statistics and the tag catalogue always describe the full collection.
//! Filters only shape the returned `tasks` list, which is an order-preserving
//! subsequence of the input.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Task, TaskStatus};

/// Aggregate counts over a whole collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub todo: usize,
}

impl Statistics {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::Todo => stats.todo += 1,
            }
        }
        stats
    }
}

/// Where a task stands relative to its due date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    /// Due before `now` and not completed
    Overdue,
    /// Due later today (UTC) and not completed
    DueToday,
    Upcoming,
    /// No due date, or already completed
    None,
}

/// Returned when a string is not one of the due-state names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown due state: {0}")]
pub struct UnknownDueState(pub String);

impl FromStr for DueState {
    type Err = UnknownDueState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overdue" => Ok(Self::Overdue),
            "due_today" => Ok(Self::DueToday),
            "upcoming" => Ok(Self::Upcoming),
            "none" => Ok(Self::None),
            other => Err(UnknownDueState(other.to_string())),
        }
    }
}

pub fn due_state(task: &Task, now: DateTime<Utc>) -> DueState {
    let Some(due) = task.due_date else {
        return DueState::None;
    };
    if task.is_completed() {
        return DueState::None;
    }
    if due < now {
        DueState::Overdue
    } else if due.date_naive() == now.date_naive() {
        DueState::DueToday
    } else {
        DueState::Upcoming
    }
}

/// Recognized filter options. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub tag: Option<String>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
    pub due: Option<DueState>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tag.is_none() && self.search.is_none() && self.due.is_none()
    }

    /// Whether `task` satisfies every set predicate.
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            if !task.name.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.has_tag(tag) {
                return false;
            }
        }
        if let Some(due) = self.due {
            if due_state(task, now) != due {
                return false;
            }
        }
        true
    }
}

/// Result of a query: totals over the full collection plus the filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub statistics: Statistics,
    /// Distinct tags of the full collection, in first-seen order
    pub tags: Vec<String>,
    pub tasks: Vec<Task>,
}

pub fn query(collection: &[Task], filter: &TaskFilter) -> QueryResult {
    query_at(collection, filter, Utc::now())
}

/// Same as [`query`] with an explicit clock for the due-state predicate.
pub fn query_at(collection: &[Task], filter: &TaskFilter, now: DateTime<Utc>) -> QueryResult {
    let tasks = if filter.is_empty() {
        collection.to_vec()
    } else {
        collection
            .iter()
            .filter(|t| filter.matches(t, now))
            .cloned()
            .collect()
    };

    QueryResult {
        statistics: Statistics::from_tasks(collection),
        tags: tag_catalogue(collection),
        tasks,
    }
}

fn tag_catalogue(collection: &[Task]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in collection.iter().flat_map(|t| t.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}
