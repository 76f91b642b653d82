//! Bearer-token auth middleware, gated by `GatewayConfig::auth`
//! (`AuthMode::Token` requires a matching `Authorization: Bearer <token>`
//! header; `AuthMode::None` accepts every request unauthenticated).

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use skynet_core::config::AuthMode;

use crate::app::AppState;

pub fn check(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    match state.config.gateway.auth.mode {
        AuthMode::None => Ok(()),
        AuthMode::Token => {
            let expected = state.config.gateway.auth.token.as_deref().unwrap_or_default();
            let supplied = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));
            match supplied {
                Some(token) if token == expected => Ok(()),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }
    }
}

/// Axum middleware wrapper around [`check`] for use with `Router::layer`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    match check(&state, &headers) {
        Ok(()) => next.run(request).await,
        Err(status) => (status, "unauthorized").into_response(),
    }
}
