//! In-memory task store keyed by subject identifier.
//!
//! Each subject owns one ordered collection. Insertion order is the display
//! order and is never changed. All writes go through a single write lock, so
//! an append (including id assignment) is atomic with respect to readers and
//! other writers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Task;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} is not supported")]
    NotSupported(&'static str),
}

/// Subject identifier -> ordered task collection.
#[derive(Debug, Default)]
pub struct TaskStore {
    collections: RwLock<HashMap<String, Vec<Task>>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the subject's collection. Unknown subjects get an empty list.
    pub async fn get_all(&self, subject: &str) -> Vec<Task> {
        self.collections
            .read()
            .await
            .get(subject)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a fully built task, creating the collection on first write.
    pub async fn append(&self, subject: &str, task: Task) {
        let mut collections = self.collections.write().await;
        collections
            .entry(subject.to_string())
            .or_default()
            .push(task);
    }

    /// Assign a fresh id and append, holding the write lock across both steps.
    ///
    /// `build` receives the id and returns the task to store.
    pub async fn append_with<F>(&self, subject: &str, build: F) -> Task
    where
        F: FnOnce(String) -> Task,
    {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(subject.to_string()).or_default();

        let id = loop {
            let candidate = format!("task-{}", Uuid::new_v4());
            if !collection.iter().any(|t| t.id == candidate) {
                break candidate;
            }
        };

        let task = build(id);
        collection.push(task.clone());
        task
    }

    /// Number of tasks the subject owns.
    pub async fn count(&self, subject: &str) -> usize {
        self.collections
            .read()
            .await
            .get(subject)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Editing tasks (status changes included) is not offered yet.
    pub async fn update(&self, _subject: &str, _task_id: &str) -> Result<Task, StoreError> {
        Err(StoreError::NotSupported("changing tasks"))
    }

    /// Deleting tasks is not offered yet.
    pub async fn remove(&self, _subject: &str, _task_id: &str) -> Result<Task, StoreError> {
        Err(StoreError::NotSupported("deleting tasks"))
    }
}

/// Shared task store wrapped in Arc for concurrent access.
pub type SharedTaskStore = Arc<TaskStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use chrono::Utc;
    use std::collections::HashSet;

    fn task(id: &str, name: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            due_date: None,
            completed_date: None,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_subject_is_empty() {
        let store = TaskStore::new();
        assert!(store.get_all("nobody").await.is_empty());
        assert_eq!(store.count("nobody").await, 0);
    }

    #[tokio::test]
    async fn test_append_preserves_order_and_duplicates() {
        let store = TaskStore::new();
        store.append("1", task("a", "Same")).await;
        store.append("1", task("b", "Same")).await;
        store.append("1", task("c", "Other")).await;

        let ids: Vec<String> = store.get_all("1").await.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = TaskStore::new();
        store.append("1", task("a", "Mine")).await;
        assert_eq!(store.count("1").await, 1);
        assert!(store.get_all("2").await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_unique_ids() {
        let store = Arc::new(TaskStore::new());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append_with("1", |id| task(&id, &format!("task {}", i)))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let tasks = store.get_all("1").await;
        assert_eq!(tasks.len(), 64);
        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 64);
        assert!(tasks.iter().all(|t| t.id.starts_with("task-")));
    }

    #[tokio::test]
    async fn test_mutations_not_supported() {
        let store = TaskStore::new();
        store.append("1", task("a", "Keep")).await;

        let err = store.update("1", "a").await.unwrap_err();
        assert!(matches!(err, StoreError::NotSupported(_)));
        assert!(store.remove("1", "a").await.is_err());
        assert_eq!(store.get_all("1").await[0].status, TaskStatus::Todo);
    }
}
