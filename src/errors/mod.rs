//! Categorized errors and the classification contract used when responding

pub mod category;
pub mod classify;
pub mod typed;

pub use category::ErrorCategory;
pub use classify::{Failure, HttpError};
pub use typed::{new_error, set_message, wrap, BoxError, TypedError};
