//! Proxy to the external task assistant.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};

use super::error::ApiError;
use super::routes::AppState;
use crate::auth::SubjectIdentity;
use crate::chat::{task_context, ChatError, ChatReply, ChatRequest};

/// POST /api/chat
///
/// Forwards `{message}` together with the caller's task list and relays
/// `{response}`. A blank message is 400 and no client is asked. Any assistant
/// failure becomes a 502 carrying the user-facing "Error connecting to chatbot."
/// message.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Extension(subject): Extension<SubjectIdentity>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(req) = body?;
    let message = req.message.trim();
    if message.is_empty() {
        return Err(ChatError::EmptyMessage.into());
    }

    let tasks = state.tasks.get_all(subject.as_str()).await;
    let request = ChatRequest {
        message: message.to_string(),
        context: (!tasks.is_empty()).then(|| task_context(&tasks)),
    };

    tracing::debug!(subject = %subject, tasks = tasks.len(), "Forwarding chat message");
    let reply = state.chat.ask(&request).await?;
    Ok(Json(reply))
}
