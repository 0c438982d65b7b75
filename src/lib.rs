//! # Task Dashboard
//!
//! Backend for a personal task dashboard.
//!
//! This library provides:
//! - Cookie-based JWT sessions for a single configured account
//! - Per-subject in-memory task collections
//! - Filtered task views with dashboard statistics
//! - A proxy to an external natural-language task assistant
//!
//! ## Request Flow
//!
//! ```text
//!   request ──▶ SessionGate ──▶ subject ──▶ TaskStore ──▶ query ──▶ response
//!                                   │
//!                                   └──▶ ingest (validate) ──▶ TaskStore
//! ```
//!
//! ## Modules
//! - `auth`: credential signing/verification and the session gate
//! - `task`: data model, store, query engine and ingestion
//! - `chat`: assistant client
//! - `api`: HTTP surface
//! - `config`: environment configuration

pub mod api;
pub mod auth;
pub mod chat;
pub mod config;
pub mod task;

pub use config::Config;
