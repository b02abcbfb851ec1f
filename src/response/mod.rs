//! JSON replies and error responses

pub mod envelope;
pub mod responder;
pub mod sink;

pub use envelope::{ErrorBody, ErrorDetail, ResponseEnvelope};
pub use responder::{status_text, Responder};
pub use sink::{BufferedResponse, ResponseSink, APPLICATION_JSON, CONTENT_TYPE};
