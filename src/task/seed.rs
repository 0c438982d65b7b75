//! Sample tasks used to populate the reference account on startup.

use chrono::{DateTime, Utc};

use super::model::{Task, TaskStatus};
use super::store::TaskStore;

fn ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn sample(
    id: &str,
    name: &str,
    description: &str,
    status: TaskStatus,
    due_date: Option<&str>,
    completed_date: Option<&str>,
    tags: &[&str],
) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        status,
        due_date: due_date.and_then(ts),
        completed_date: completed_date.and_then(ts),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: ts("2025-02-10T09:00:00Z").unwrap_or_else(Utc::now),
    }
}

/// Six tasks: two of each status.
pub fn sample_tasks() -> Vec<Task> {
    vec![
        sample(
            "task-1",
            "Finalize project proposal",
            "Complete the final draft of the Q2 marketing strategy proposal for client review",
            TaskStatus::Pending,
            Some("2025-03-01T23:59:59Z"),
            None,
            &["work", "high-priority", "documentation"],
        ),
        sample(
            "task-2",
            "Weekly team meeting",
            "Prepare agenda and host weekly team sync to discuss project progress",
            TaskStatus::Completed,
            None,
            Some("2025-02-18T15:30:00Z"),
            &["work", "recurring", "meeting"],
        ),
        sample(
            "task-3",
            "Learn Framer Motion",
            "Complete the advanced animation tutorial series for React components",
            TaskStatus::Todo,
            Some("2025-02-25T23:59:59Z"),
            None,
            &["personal", "learning", "development"],
        ),
        sample(
            "task-4",
            "Refactor authentication flow",
            "Implement new middleware approach and improve error handling",
            TaskStatus::Pending,
            Some("2025-02-23T23:59:59Z"),
            None,
            &["work", "technical", "security"],
        ),
        sample(
            "task-5",
            "Grocery shopping",
            "Buy ingredients for weekend dinner party",
            TaskStatus::Todo,
            Some("2025-02-22T18:00:00Z"),
            None,
            &["personal", "errands"],
        ),
        sample(
            "task-6",
            "Update portfolio website",
            "Add recent projects and refresh design with new color scheme",
            TaskStatus::Completed,
            None,
            Some("2025-02-15T20:45:00Z"),
            &["personal", "design", "career"],
        ),
    ]
}

/// Append the sample tasks to `subject`'s collection.
pub async fn seed_store(store: &TaskStore, subject: &str) {
    for task in sample_tasks() {
        store.append(subject, task).await;
    }
    tracing::info!("Seeded {} sample tasks for subject {}", store.count(subject).await, subject);
}
