//! Client for the external task assistant.
//!
//! The assistant is a remote service that takes `{message, context}` and
//! answers with `{response}`. `context` is the caller's task list rendered by
//! [`task_context`]. Calls are bounded by a timeout and only read task data;
//! every failure comes back as a `ChatError`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Shown to the user whenever the assistant cannot be reached.
pub const CHAT_UNAVAILABLE_MESSAGE: &str = "Error connecting to chatbot.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Assistant request failed: {0}")]
    Transport(String),

    #[error("Assistant returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse assistant response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// The caller's tasks, one per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Anything that can answer a question about tasks.
///
/// Callers reject blank messages before asking.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn ask(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;
}

/// `ChatClient` that POSTs JSON to a remote endpoint.
pub struct HttpChatClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpChatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn ask(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let response = match self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(ChatError::Transport(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(ChatError::Transport(format!("Connection failed: {}", e)));
                } else {
                    return Err(ChatError::Transport(format!("Request failed: {}", e)));
                }
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ChatError::Decode(format!("{}, body: {}", e, body)))
    }
}

/// One line per task, the context an assistant prompt is built from.
pub fn task_context(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| {
            let due = t
                .due_date
                .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                "Task: {}, Status: {}, Due: {}, Tags: {}",
                t.name,
                t.status,
                due,
                t.tags.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::seed::sample_tasks;

    #[test]
    fn test_task_context_lines() {
        let context = task_context(&sample_tasks());
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "Task: Finalize project proposal, Status: pending, Due: 2025-03-01T23:59:59Z, Tags: work, high-priority, documentation"
        );
        assert_eq!(
            lines[1],
            "Task: Weekly team meeting, Status: completed, Due: N/A, Tags: work, recurring, meeting"
        );
    }

    #[test]
    fn test_context_omitted_when_absent() {
        let request = ChatRequest {
            message: "hi".to_string(),
            context: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"message": "hi"})
        );

        let parsed: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert!(parsed.context.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = HttpChatClient::new("http://127.0.0.1:9/chat", Duration::from_millis(500));
        let request = ChatRequest {
            message: "What is due today?".to_string(),
            context: None,
        };
        assert!(matches!(
            client.ask(&request).await,
            Err(ChatError::Transport(_))
        ));
    }
}
