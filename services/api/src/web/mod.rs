pub mod middleware;
pub mod rest;
pub mod state;

pub use middleware::require_auth;
pub use rest::ApiDoc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Builds the API router: the public health route plus the protected
/// document and prompt routes behind the auth middleware. Kept separate from
/// `main` so tests can drive the same routing with substituted adapters.
pub fn api_router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(rest::health_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/process", post(rest::process_document_handler))
        .route("/api/prompts", put(rest::update_prompt_handler))
        .route("/api/prompts/test", post(rest::test_prompt_handler))
        .route(
            "/api/prompts/{document_type}",
            get(rest::get_prompt_handler).delete(rest::reset_prompt_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}
