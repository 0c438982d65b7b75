//! HTTP API.
//!
//! ## Routes
//! - `GET  /api/health` - liveness
//! - `POST /api/login`, `POST /api/logout` - session cookie management
//! - `GET  /api/tasks`, `POST /api/tasks` - list/filter and create tasks
//! - `PATCH|DELETE /api/tasks/:id` - reserved, answer 501
//! - `POST /api/chat` - task assistant proxy
//! - `/`, `/login`, `/register` - placeholder pages behind the route guard

pub mod auth;
pub mod chat;
pub mod error;
pub mod guard;
pub mod routes;
pub mod tasks;
pub mod types;

pub use error::ApiError;
pub use routes::{router, serve, AppState};
