use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::category::ErrorCategory;

/// Owned, thread-safe error object accepted wherever a cause is wrapped
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub(crate) type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

pub(crate) fn share<E>(err: E) -> SharedError
where
    E: Into<BoxError>,
{
    let boxed: BoxError = err.into();
    Arc::from(boxed)
}

/// What a [`TypedError`] carries underneath its category.
///
/// The text is rendered on demand so the wrapped error stays reachable
/// through `source()`.
#[derive(Debug, Clone, Error)]
pub(crate) enum Cause {
    #[error("{0}")]
    Message(String),

    #[error("{context}: {source}")]
    Wrapped { context: String, source: SharedError },

    #[error("{0}")]
    Opaque(SharedError),
}

/// An error tagged with a category and an optional client-facing message.
///
/// `Display` renders the internal diagnostic text (the cause chain); the
/// client-facing text is only available through [`TypedError::message`].
#[derive(Debug, Clone)]
pub struct TypedError {
    category: ErrorCategory,
    cause: Cause,
    message: String,
}

impl TypedError {
    pub(crate) fn from_parts(category: ErrorCategory, cause: Cause, message: String) -> Self {
        Self {
            category,
            cause,
            message,
        }
    }

    /// Turn any error into a `TypedError`.
    ///
    /// The first `TypedError` found in the error or its `source()` chain comes
    /// back unchanged; an `anyhow::Error` is searched through its own chain.
    /// Anything else becomes a [`ErrorCategory::NoType`] error with an empty
    /// display message.
    pub fn cast<E>(err: E) -> Self
    where
        E: Into<BoxError> + 'static,
    {
        if let Some(typed) = typed_in_anyhow(&err) {
            return typed;
        }

        let boxed: BoxError = err.into();
        if let Some(typed) = find_typed(&*boxed) {
            return typed.clone();
        }
        Self::from_parts(
            ErrorCategory::NoType,
            Cause::Opaque(Arc::from(boxed)),
            String::new(),
        )
    }

    /// Replace the display message, keeping category and cause
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn status_code(&self) -> u16 {
        self.category.status_code()
    }

    /// Client-facing message, possibly empty
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The immediately wrapped error, if this error wraps one
    pub fn cause(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Cause::Message(_) => None,
            Cause::Wrapped { source, .. } => Some(&**source),
            Cause::Opaque(err) => Some(&**err),
        }
    }

    /// Innermost error of the `source()` chain, or `self` when nothing is wrapped
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl fmt::Display for TypedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.cause, f)
    }
}

impl StdError for TypedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Cause::Message(_) => None,
            Cause::Wrapped { source, .. } => Some(&**source),
            // Opaque shares its text with the cast error, so skip straight past it
            Cause::Opaque(err) => err.source(),
        }
    }
}

/// First `TypedError` in `err` or its `source()` chain
pub(crate) fn find_typed<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a TypedError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(typed) = err.downcast_ref::<TypedError>() {
            return Some(typed);
        }
        current = err.source();
    }
    None
}

// Boxing an `anyhow::Error` hides the error it was built from, so look
// before converting.
fn typed_in_anyhow<E: 'static>(err: &E) -> Option<TypedError> {
    let err = (err as &dyn Any).downcast_ref::<anyhow::Error>()?;
    err.chain()
        .find_map(|link| link.downcast_ref::<TypedError>())
        .cloned()
}

/// Uncategorized error with no display message
pub fn new_error(text: impl Into<String>) -> TypedError {
    TypedError::from_parts(ErrorCategory::NoType, Cause::Message(text.into()), String::new())
}

/// Add context to `err` without changing how it is classified.
///
/// When `err` carries a `TypedError` (directly, in its `source()` chain or
/// inside an `anyhow::Error`) its category and display message are kept; any
/// other error becomes [`ErrorCategory::NoType`].
pub fn wrap<E>(err: E, context: impl Into<String>) -> TypedError
where
    E: Into<BoxError> + 'static,
{
    let carried = typed_in_anyhow(&err).map(|typed| (typed.category, typed.message));
    let boxed: BoxError = err.into();
    let (category, message) = carried
        .or_else(|| find_typed(&*boxed).map(|typed| (typed.category, typed.message.clone())))
        .unwrap_or((ErrorCategory::NoType, String::new()));
    let cause = Cause::Wrapped {
        context: context.into(),
        source: Arc::from(boxed),
    };
    TypedError::from_parts(category, cause, message)
}

/// Cast `err` and set its display message. Never fails.
pub fn set_message<E>(err: E, message: impl Into<String>) -> TypedError
where
    E: Into<BoxError> + 'static,
{
    TypedError::cast(err).with_message(message)
}

/// Build a [`TypedError`] from a category and format arguments.
///
/// ```
/// use api_reply::errors::ErrorCategory;
///
/// let err = api_reply::typed_error!(ErrorCategory::BadRequest, "bad id {}", 12);
/// assert_eq!(err.status_code(), 400);
/// ```
#[macro_export]
macro_rules! typed_error {
    ($category:expr, $($arg:tt)+) => {
        $crate::errors::ErrorCategory::error_fmt($category, ::std::format_args!($($arg)+))
    };
}

/// Wrap a cause under a category with a formatted message
#[macro_export]
macro_rules! wrap_error {
    ($category:expr, $cause:expr, $($arg:tt)+) => {
        $crate::errors::ErrorCategory::wrap_fmt($category, $cause, ::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn plain(text: &str) -> io::Error {
        io::Error::new(io::ErrorKind::Other, text.to_string())
    }

    #[test]
    fn test_cast_plain_error() {
        let err = TypedError::cast(plain("og error"));
        assert_eq!(err.category(), ErrorCategory::NoType);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "");
        assert_eq!(err.to_string(), "og error");
    }

    #[test]
    fn test_cast_typed_error_is_unchanged() {
        let original = ErrorCategory::ImATeapot
            .error("some awesome error")
            .with_message("short and stout");
        let cast = TypedError::cast(original.clone());

        assert_eq!(cast.category(), original.category());
        assert_eq!(cast.message(), original.message());
        assert_eq!(cast.to_string(), original.to_string());
    }

    #[test]
    fn test_cast_is_idempotent() {
        let once = TypedError::cast(plain("og error"));
        let twice = TypedError::cast(once.clone());

        assert_eq!(twice.category(), once.category());
        assert_eq!(twice.message(), once.message());
        assert_eq!(twice.to_string(), once.to_string());
    }

    #[test]
    fn test_cast_finds_typed_error_in_source_chain() {
        #[derive(Debug, Error)]
        #[error("lookup failed")]
        struct Lookup(#[source] TypedError);

        let err = TypedError::cast(Lookup(ErrorCategory::NotFound.error("no such card")));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.message(), "no such card");
    }

    #[test]
    fn test_cast_anyhow_error() {
        let err = TypedError::cast(anyhow::Error::new(ErrorCategory::Forbidden.error("nope")));
        assert_eq!(err.category(), ErrorCategory::Forbidden);
        assert_eq!(err.message(), "nope");

        let err = TypedError::cast(anyhow::anyhow!("plain failure"));
        assert_eq!(err.category(), ErrorCategory::NoType);
        assert_eq!(err.to_string(), "plain failure");
    }

    #[test]
    fn test_set_message_on_anyhow_error() {
        let err = anyhow::Error::new(ErrorCategory::NotFound.error("missing row"));
        let updated = set_message(err, "that card does not exist");
        assert_eq!(updated.status_code(), 404);
        assert_eq!(updated.message(), "that card does not exist");

        let err = anyhow::Error::new(ErrorCategory::NotFound.error("missing row"))
            .context("loading card");
        let updated = set_message(err, "that card does not exist");
        assert_eq!(updated.status_code(), 404);
        assert_eq!(updated.to_string(), "missing row");
    }

    #[test]
    fn test_set_message_keeps_category_and_cause() {
        let original = ErrorCategory::Unauthorized.error("user hit a page they shouldn't");
        let updated = set_message(original.clone(), "You don't have permission to do that!");

        assert_eq!(updated.message(), "You don't have permission to do that!");
        assert_eq!(updated.category(), ErrorCategory::Unauthorized);
        assert_eq!(updated.to_string(), original.to_string());
    }

    #[test]
    fn test_set_message_on_plain_error() {
        let updated = set_message(plain("some error"), "created by set_message");

        assert_eq!(updated.message(), "created by set_message");
        assert_eq!(updated.category(), ErrorCategory::NoType);
        assert_eq!(updated.status_code(), TypedError::cast(plain("x")).status_code());
        assert_eq!(updated.to_string(), "some error");
    }

    #[test]
    fn test_error_text_is_not_display_message() {
        let err = ErrorCategory::Forbidden
            .error("secret detail")
            .with_message("safe text");
        assert_eq!(err.to_string(), "secret detail");
        assert_eq!(err.message(), "safe text");
    }

    #[test]
    fn test_empty_error_text() {
        let err = ErrorCategory::BadRequest.error("");
        assert_eq!(err.to_string(), "");
    }

    #[test]
    fn test_source_chain() {
        let err = ErrorCategory::NotFound.wrap(plain("og error"), "wrapped error");
        let source = err.source().expect("wrapped error has a source");
        assert_eq!(source.to_string(), "og error");
        assert_eq!(err.cause().map(|c| c.to_string()), Some("og error".to_string()));

        let root = ErrorCategory::InternalServerError.wrap(err, "outer");
        assert_eq!(root.to_string(), "outer: wrapped error: og error");
        assert_eq!(root.root_cause().to_string(), "og error");
    }

    #[test]
    fn test_root_cause_without_wrapping() {
        let err = ErrorCategory::BadRequest.error("leaf");
        assert!(err.cause().is_none());
        assert_eq!(err.root_cause().to_string(), "leaf");
    }

    #[test]
    fn test_free_new_error() {
        let err = new_error("some error");
        assert_eq!(err.to_string(), "some error");
        assert_eq!(err.category(), ErrorCategory::NoType);
        assert_eq!(err.message(), "");
    }

    #[test]
    fn test_free_wrap_preserves_classification() {
        let inner = ErrorCategory::Forbidden.error("no access");
        let err = wrap(inner, "while loading profile");

        assert_eq!(err.category(), ErrorCategory::Forbidden);
        assert_eq!(err.message(), "no access");
        assert_eq!(err.to_string(), "while loading profile: no access");
    }

    #[test]
    fn test_free_wrap_plain_error() {
        let err = wrap(plain("some error"), "wrapped in some message");
        assert_eq!(err.category(), ErrorCategory::NoType);
        assert_eq!(err.message(), "");
        assert_eq!(err.to_string(), "wrapped in some message: some error");
    }

    #[test]
    fn test_free_wrap_anyhow_with_context() {
        let err = anyhow::Error::new(ErrorCategory::TooLarge.error("upload too big"))
            .context("reading upload");
        let err = wrap(err, "handling request");

        assert_eq!(err.category(), ErrorCategory::TooLarge);
        assert_eq!(err.message(), "upload too big");
        assert_eq!(err.to_string(), "handling request: reading upload");
    }

    #[test]
    fn test_macros() {
        let err = crate::typed_error!(ErrorCategory::NotFound, "no card {}", "abc123");
        assert_eq!(err.message(), "no card abc123");
        assert_eq!(err.status_code(), 404);

        let err = crate::wrap_error!(
            ErrorCategory::BadRequest,
            plain("eof"),
            "field {} unreadable",
            "name"
        );
        assert_eq!(err.to_string(), "field name unreadable: eof");
        assert_eq!(err.message(), "field name unreadable");
    }
}
