//! Request-side helpers: query parameters and JSON bodies

pub mod body;
pub mod query;

pub use body::{read_json, unmarshal_body, BodyError};
pub use query::query_param;
