use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{broken, echo, empty, greet, health, secret, teapot, AppState};
use super::middleware::logging_middleware;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/greet", get(greet))
        .route("/echo", post(echo))
        .route("/teapot", get(teapot))
        .route("/secret", get(secret))
        .route("/broken", get(broken))
        .route("/empty", get(empty))
        // Order matters: logging sees the final response, trace wraps everything
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
