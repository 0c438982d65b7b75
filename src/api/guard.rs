//! Page-level route guard.
//!
//! Only looks at whether a `session` cookie is present. Whether it is valid
//! is checked later by `require_session` on the data routes.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use super::auth::{read_cookie, SESSION_COOKIE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Continue,
    /// Protected page, no cookie
    RedirectToLogin { from: String },
    /// Login/register page while holding a cookie
    RedirectHome,
}

pub fn is_public_path(path: &str) -> bool {
    path == "/login" || path == "/register" || path.starts_with("/api/auth")
}

pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    match (is_public_path(path), has_session) {
        (false, false) => GuardDecision::RedirectToLogin {
            from: path.to_string(),
        },
        (true, true) => GuardDecision::RedirectHome,
        _ => GuardDecision::Continue,
    }
}

pub async fn route_guard(req: Request<Body>, next: Next) -> Response {
    let has_session = read_cookie(req.headers(), SESSION_COOKIE)
        .map(|c| !c.is_empty())
        .unwrap_or(false);

    match decide(req.uri().path(), has_session) {
        GuardDecision::Continue => next.run(req).await,
        GuardDecision::RedirectToLogin { from } => {
            let target = format!("/login?redirect={}", urlencoding::encode(&from));
            Redirect::to(&target).into_response()
        }
        GuardDecision::RedirectHome => Redirect::to("/").into_response(),
    }
}

/// Placeholder pages; the real UI is served elsewhere.
pub fn pages<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(|| async { Html("<h1>Task dashboard</h1>") }))
        .route("/login", get(|| async { Html("<h1>Sign in</h1>") }))
        .route("/register", get(|| async { Html("<h1>Register</h1>") }))
        .layer(axum::middleware::from_fn(route_guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_without_session() {
        assert_eq!(
            decide("/", false),
            GuardDecision::RedirectToLogin {
                from: "/".to_string()
            }
        );
        assert_eq!(decide("/", true), GuardDecision::Continue);
    }

    #[test]
    fn test_public_with_session() {
        assert_eq!(decide("/login", true), GuardDecision::RedirectHome);
        assert_eq!(decide("/register", true), GuardDecision::RedirectHome);
        assert_eq!(decide("/login", false), GuardDecision::Continue);
        assert_eq!(decide("/api/auth/callback", false), GuardDecision::Continue);
    }
}
