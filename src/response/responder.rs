use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use super::envelope::{ErrorBody, ResponseEnvelope};
use super::sink::{BufferedResponse, ResponseSink, APPLICATION_JSON, CONTENT_TYPE};
use crate::config::ResponderConfig;
use crate::errors::{ErrorCategory, Failure, TypedError};

/// Standard reason phrase for a status code, or `""` when there is none
pub fn status_text(status_code: u16) -> &'static str {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("")
}

/// Writes JSON replies and classifies errors according to a [`ResponderConfig`].
///
/// The configuration is fixed once the responder is built, so a responder can
/// be cloned into every handler and shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Responder {
    config: Arc<ResponderConfig>,
}

impl Responder {
    pub fn new(config: ResponderConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Serialize `payload` and write it with `status_code`.
    ///
    /// A payload that serializes to `null` produces an empty body. When
    /// serialization fails nothing is written and an `InternalServerError` is
    /// returned instead.
    pub fn respond<S, T>(&self, sink: &mut S, status_code: u16, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        if self.config.use_envelopes {
            let data = serde_json::to_value(payload).map_err(marshal_failed)?;
            return write_json(sink, status_code, &ResponseEnvelope::success(status_code, data));
        }

        write_json(sink, status_code, payload)
    }

    /// Classify `err` and write the matching error body
    pub fn respond_error<'a, S, E>(&self, sink: &mut S, err: E) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        E: Into<Failure<'a>>,
    {
        let failure = err.into();
        let (status_code, message) = self.classify(&failure);

        debug!(
            status = status_code,
            kind = failure.kind(),
            "Responding with error"
        );

        let raw_error = if self.config.return_raw_error {
            failure.raw_text()
        } else {
            None
        };

        if self.config.use_envelopes {
            let envelope = ResponseEnvelope::failure(status_code, message, raw_error);
            return write_json(sink, status_code, &envelope);
        }

        let body = ErrorBody::new(message).with_raw_error(raw_error);
        write_json(sink, status_code, &body)
    }

    /// Decide the status code and client message for `failure`.
    ///
    /// Classified errors speak for themselves; missing and plain errors get the
    /// configured defaults. An empty message falls back to the status reason
    /// phrase.
    pub fn classify(&self, failure: &Failure<'_>) -> (u16, String) {
        let (status_code, message) = match failure {
            Failure::Classified(err) => (err.status_code(), err.client_message().to_string()),
            Failure::Missing | Failure::Plain(_) => (
                self.config.default_status_code,
                self.config.default_error_message.clone(),
            ),
        };

        if message.is_empty() {
            return (status_code, status_text(status_code).to_string());
        }

        (status_code, message)
    }

    // 200
    pub fn respond_ok<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 200, payload)
    }

    // 400
    pub fn respond_bad_request<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 400, payload)
    }

    // 401
    pub fn respond_unauthorized<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 401, payload)
    }

    // 403
    pub fn respond_forbidden<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 403, payload)
    }

    // 404
    pub fn respond_not_found<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 404, payload)
    }

    // 413
    pub fn respond_too_large<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 413, payload)
    }

    // 418
    pub fn respond_teapot<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 418, payload)
    }

    // 500
    pub fn respond_internal_error<S, T>(&self, sink: &mut S, payload: &T) -> Result<(), TypedError>
    where
        S: ResponseSink + ?Sized,
        T: Serialize + ?Sized,
    {
        self.respond(sink, 500, payload)
    }

    /// [`Responder::respond`] into an axum response.
    ///
    /// A marshal failure is answered as an error response instead.
    pub fn reply<T>(&self, status_code: u16, payload: &T) -> Response
    where
        T: Serialize + ?Sized,
    {
        let mut buffered = BufferedResponse::new();
        match self.respond(&mut buffered, status_code, payload) {
            Ok(()) => buffered.into_response(),
            Err(err) => {
                error!(error = %err, "Failed to build response");
                self.reply_error(&err)
            }
        }
    }

    /// [`Responder::respond_error`] into an axum response
    pub fn reply_error<'a, E>(&self, err: E) -> Response
    where
        E: Into<Failure<'a>>,
    {
        let mut buffered = BufferedResponse::new();
        match self.respond_error(&mut buffered, err) {
            Ok(()) => buffered.into_response(),
            Err(err) => {
                error!(error = %err, "Failed to build error response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn marshal_failed(err: serde_json::Error) -> TypedError {
    ErrorCategory::InternalServerError.wrap(err, "failed to marshal payload")
}

fn write_json<S, T>(sink: &mut S, status_code: u16, body: &T) -> Result<(), TypedError>
where
    S: ResponseSink + ?Sized,
    T: Serialize + ?Sized,
{
    // Marshal before touching the sink so a failure leaves it untouched
    let bytes = serde_json::to_vec(body).map_err(marshal_failed)?;

    sink.set_header(CONTENT_TYPE, APPLICATION_JSON);
    sink.write_status(status_code);

    if bytes.as_slice() == b"null" {
        return Ok(());
    }

    sink.write_body(&bytes).map_err(|err| {
        ErrorCategory::InternalServerError.wrap(err, "failed to write response body")
    })
}
