//! JSON replies and categorized errors for HTTP handlers.
//!
//! [`errors`] tags errors with a category and a client-safe message,
//! [`response::Responder`] turns payloads and errors into JSON responses, and
//! [`request`] covers query parameters and JSON bodies.

pub mod api;
pub mod config;
pub mod errors;
pub mod request;
pub mod response;

pub use config::ResponderConfig;
pub use errors::{ErrorCategory, Failure, HttpError, TypedError};
pub use response::{BufferedResponse, Responder, ResponseSink};
