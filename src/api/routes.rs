//! HTTP route wiring and server startup.

use std::any::Any;
use std::sync::Arc;

use axum::middleware;
use axum::{
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{IdentityVerifier, SessionGate};
use crate::chat::{ChatClient, HttpChatClient};
use crate::config::{Config, MAX_SESSION_TTL_HOURS};
use crate::task::{seed, SharedTaskStore, TaskStore};

use super::auth;
use super::chat;
use super::error::ApiError;
use super::guard;
use super::tasks;
use super::types::HealthResponse;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Login and credential verification
    pub gate: SessionGate,
    /// Per-subject task collections
    pub tasks: SharedTaskStore,
    /// External task assistant
    pub chat: Arc<dyn ChatClient>,
}

impl AppState {
    /// Build state with an HTTP assistant client taken from `config`.
    pub fn new(config: Config) -> Self {
        let chat = Arc::new(HttpChatClient::new(
            config.chat.api_url.clone(),
            config.chat.timeout,
        ));
        Self::with_chat_client(config, chat)
    }

    pub fn with_chat_client(config: Config, chat: Arc<dyn ChatClient>) -> Self {
        let ttl_hours = config.auth.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        let verifier = IdentityVerifier::new(&config.auth.jwt_secret, Duration::hours(ttl_hours));
        let accounts = Arc::new(config.auth.account.to_credential_store());
        Self {
            gate: SessionGate::new(verifier, accounts),
            tasks: Arc::new(TaskStore::new()),
            chat,
            config,
        }
    }

    /// Seed the login account with sample tasks when enabled.
    pub async fn seed(&self) {
        if self.config.seed_sample_tasks {
            seed::seed_store(&self.tasks, &self.config.auth.account.subject).await;
        }
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("Handler panicked: {}", detail)).into_response()
}

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout));

    let protected_routes = Router::new()
        .nest("/api/tasks", tasks::routes())
        .route("/api/chat", post(chat::post_message))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(guard::pages())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config));
    state.seed().await;

    tracing::info!("Chat assistant endpoint: {}", state.config.chat.api_url);

    let app = router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
