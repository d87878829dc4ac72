//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use formscan_core::ports::PortError;
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

/// Middleware that verifies the bearer credential and extracts the caller.
///
/// If valid, inserts the `AuthenticatedUser` into request extensions for
/// handlers to use. If invalid or missing, returns 401 Unauthorized and no
/// handler logic runs.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    // 1. Extract the bearer token
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "認証エラー: 認証情報がありません".to_string(),
        ))?;

    // 2. Verify against the identity provider, get the caller's identity
    let user = state.identity.verify_token(&token).await.map_err(|e| {
        error!("Failed to verify credential: {:?}", e);
        match e {
            PortError::MissingCredential(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            other => (StatusCode::UNAUTHORIZED, format!("認証エラー: {}", other)),
        }
    })?;

    // 3. Insert the identity into request extensions
    req.extensions_mut().insert(user);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}
