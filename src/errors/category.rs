use serde::{Deserialize, Serialize};
use std::fmt;

use super::typed::{share, BoxError, Cause, TypedError};

/// Semantic error categories, each tied to one HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Not explicitly categorized
    #[default]
    NoType,

    /// Malformed client input
    BadRequest,

    /// Missing or invalid credentials
    Unauthorized,

    /// Authenticated but not allowed
    Forbidden,

    /// Resource does not exist
    NotFound,

    /// Request body exceeds the configured ceiling
    TooLarge,

    /// 418 passthrough
    ImATeapot,

    /// Unclassified server fault
    InternalServerError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoType => write!(f, "NO_TYPE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::TooLarge => write!(f, "TOO_LARGE"),
            Self::ImATeapot => write!(f, "IM_A_TEAPOT"),
            Self::InternalServerError => write!(f, "INTERNAL_SERVER_ERROR"),
        }
    }
}

impl ErrorCategory {
    /// Get HTTP status code for this category
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::TooLarge => 413,
            Self::ImATeapot => 418,
            Self::InternalServerError | Self::NoType => 500,
        }
    }

    /// Create an error whose internal text and display message are both `message`
    pub fn error(self, message: impl Into<String>) -> TypedError {
        let message = message.into();
        TypedError::from_parts(self, Cause::Message(message.clone()), message)
    }

    /// Formatted variant of [`ErrorCategory::error`]
    ///
    /// ```
    /// use api_reply::errors::ErrorCategory;
    ///
    /// let err = ErrorCategory::NotFound.error_fmt(format_args!("no user {}", 7));
    /// assert_eq!(err.message(), "no user 7");
    /// ```
    pub fn error_fmt(self, args: fmt::Arguments<'_>) -> TypedError {
        self.error(fmt::format(args))
    }

    /// Wrap `cause` under this category.
    ///
    /// The error text becomes `"<message>: <cause>"` and the display message becomes
    /// `message`. A wrapped [`TypedError`] loses its category and display message.
    pub fn wrap<E>(self, cause: E, message: impl Into<String>) -> TypedError
    where
        E: Into<BoxError>,
    {
        let message = message.into();
        let cause = Cause::Wrapped {
            context: message.clone(),
            source: share(cause),
        };
        TypedError::from_parts(self, cause, message)
    }

    /// Formatted variant of [`ErrorCategory::wrap`]
    pub fn wrap_fmt<E>(self, cause: E, args: fmt::Arguments<'_>) -> TypedError
    where
        E: Into<BoxError>,
    {
        self.wrap(cause, fmt::format(args))
    }

    /// Re-categorize `err` as-is, without adding context to its text
    pub fn cast<E>(self, err: E, message: impl Into<String>) -> TypedError
    where
        E: Into<BoxError>,
    {
        TypedError::from_parts(self, Cause::Opaque(share(err)), message.into())
    }
}
