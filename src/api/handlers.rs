use axum::{
    body::Body,
    extract::State,
    http::Uri,
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::{ErrorCategory, Failure};
use crate::request::{query_param, read_json};
use crate::response::Responder;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub responder: Responder,
    pub max_body_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: String,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Response {
    state.responder.reply(
        200,
        &serde_json::json!({
            "status": "healthy",
            "service": "api-reply",
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Greet the caller named by the `name` query parameter
pub async fn greet(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(name) = query_param(&uri, "name") else {
        return state
            .responder
            .reply_error(&ErrorCategory::BadRequest.error("name query parameter is required"));
    };

    info!(name = %name, "Greeting request");
    state.responder.reply(
        200,
        &Greeting {
            message: format!("hello, {}", name),
        },
    )
}

/// Echo a JSON body back, subject to the configured size ceiling
pub async fn echo(State(state): State<AppState>, body: Body) -> Response {
    match read_json::<Value>(body, Some(state.max_body_bytes)).await {
        Ok(value) => state.responder.reply(200, &value),
        Err(err) => {
            warn!(error = %err, "Rejected request body");
            state.responder.reply_error(&err)
        }
    }
}

pub async fn teapot(State(state): State<AppState>) -> Response {
    state
        .responder
        .reply_error(&ErrorCategory::ImATeapot.error("short and stout"))
}

/// A forbidden error whose internal detail stays out of the response
pub async fn secret(State(state): State<AppState>) -> Response {
    let err = ErrorCategory::Forbidden
        .error("caller lacks the vault:read scope")
        .with_message("you are not allowed to see this");
    state.responder.reply_error(&err)
}

/// An unclassified failure, answered with the configured defaults
pub async fn broken(State(state): State<AppState>) -> Response {
    let err = io::Error::new(io::ErrorKind::ConnectionReset, "database connection reset");
    warn!(error = %err, "Backend failure");
    state.responder.reply_error(Failure::plain(&err))
}

/// 200 with no body
pub async fn empty(State(state): State<AppState>) -> Response {
    state.responder.reply(200, &())
}
