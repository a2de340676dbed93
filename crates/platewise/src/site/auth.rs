use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Shared admin credential checked by [`require_bearer`]. A `None`
/// token keeps the admin surface locked rather than open.
#[derive(Debug, Clone, Default)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

/// Why a request was turned away at the auth gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    BadToken,
}

impl AuthRejection {
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingToken => "NO_TOKEN",
            Self::BadToken => "BAD_TOKEN",
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Authentication required",
            Self::BadToken => "Invalid token",
        }
    }
}

pub(crate) fn authorize(expected: Option<&str>, header: Option<&str>) -> Result<(), AuthRejection> {
    let presented = match header.and_then(|value| value.strip_prefix("Bearer ")) {
        Some(token) if !token.trim().is_empty() => token.trim(),
        _ => return Err(AuthRejection::MissingToken),
    };

    match expected {
        Some(token) if token == presented => Ok(()),
        _ => Err(AuthRejection::BadToken),
    }
}

/// Middleware guarding the admin surface. Requests without a bearer
/// token never reach the wrapped handler.
pub async fn require_bearer(
    State(auth): State<AdminAuth>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authorize(auth.token.as_deref(), header) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            let payload = json!({
                "error": rejection.message(),
                "code": rejection.code(),
            });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}
