//! Task module - data model, per-subject store, query engine and ingestion.
//!
//! The query and validation logic is pure; only the store holds state.

pub mod ingest;
pub mod model;
pub mod query;
pub mod seed;
pub mod store;

pub use ingest::{submit, validate, TaskSubmission, ValidTask, ValidationError};
pub use model::{Task, TaskStatus, UnknownStatus};
pub use query::{
    due_state, query, query_at, DueState, QueryResult, Statistics, TaskFilter, UnknownDueState,
};
pub use store::{SharedTaskStore, StoreError, TaskStore};
