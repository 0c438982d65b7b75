//! Cookie-based session auth for the dashboard.
//!
//! - `POST /api/login` checks the configured account and sets an http-only
//!   `session` cookie holding a signed JWT (24h by default)
//! - `POST /api/logout` clears the cookie. It always succeeds.
//! - Protected routes go through `require_session`, which accepts the cookie
//!   or an `Authorization: Bearer <jwt>` header
//!
//! # Security notes
//! - Logout does not revoke anything server-side. A copied token keeps
//!   working until it expires.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::error::ApiError;
use super::routes::AppState;
use super::types::{LoginRequest, LoginResponse, LogoutResponse};
use crate::auth::{AuthError, CredentialSource};

pub const SESSION_COOKIE: &str = "session";

/// Value of the named cookie, if the request carries one.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
}

/// Credentials carried by request headers: session cookie first, then bearer token.
pub struct RequestCredentials<'a>(pub &'a HeaderMap);

impl CredentialSource for RequestCredentials<'_> {
    fn credential(&self) -> Option<String> {
        if let Some(cookie) = read_cookie(self.0, SESSION_COOKIE).filter(|c| !c.is_empty()) {
            return Some(cookie);
        }
        let auth_header = self
            .0
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");
        auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

fn session_cookie(value: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("Failed to build session cookie: {}", e)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let credential = match state.gate.login(&username, &password) {
        Ok(c) => c,
        Err(e) => {
            if e == AuthError::InvalidCredentials {
                tracing::warn!("Failed login attempt for user '{}'", username.trim());
            }
            return Err(e.into());
        }
    };

    let max_age = state.gate.verifier().ttl().num_seconds();
    let cookie = session_cookie(&credential.token, max_age, state.config.auth.cookie_secure)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
        }),
    )
        .into_response())
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    state.gate.logout();
    let cookie = session_cookie("", 0, state.config.auth.cookie_secure)?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    )
        .into_response())
}

/// Resolve the caller's subject and stash it in request extensions.
///
/// Runs before any handler touches the task store.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match state.gate.authorize(&RequestCredentials(req.headers())) {
        Ok(subject) => {
            req.extensions_mut().insert(subject);
            next.run(req).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
