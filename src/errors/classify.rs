use std::error::Error as StdError;

use super::typed::{find_typed, TypedError};

/// Errors that know which HTTP status and client message they map to.
///
/// [`TypedError`] implements this; any other error type can too, and the
/// responder will trust its answers.
pub trait HttpError: StdError {
    fn status_code(&self) -> u16;

    /// Client-safe text. May be empty.
    fn client_message(&self) -> &str;
}

impl HttpError for TypedError {
    fn status_code(&self) -> u16 {
        TypedError::status_code(self)
    }

    fn client_message(&self) -> &str {
        self.message()
    }
}

/// An error handed to the responder for classification
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// No error value at all
    Missing,
    /// Carries its own status and message
    Classified(&'a dyn HttpError),
    /// Anything else; answered with configured defaults
    Plain(&'a (dyn StdError + 'static)),
}

impl<'a> Failure<'a> {
    pub fn classified(err: &'a dyn HttpError) -> Self {
        Self::Classified(err)
    }

    /// Wrap an arbitrary error, promoting it when it is, or has a `source()`
    /// chain containing, a [`TypedError`]
    pub fn plain(err: &'a (dyn StdError + 'static)) -> Self {
        match find_typed(err) {
            Some(typed) => Self::Classified(typed),
            None => Self::Plain(err),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Internal diagnostic text of the error, if there is one
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Classified(err) => Some(err.to_string()),
            Self::Plain(err) => Some(err.to_string()),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Classified(_) => "classified",
            Self::Plain(_) => "plain",
        }
    }
}

impl<'a> From<&'a TypedError> for Failure<'a> {
    fn from(err: &'a TypedError) -> Self {
        Self::Classified(err)
    }
}

impl<'a> From<&'a anyhow::Error> for Failure<'a> {
    fn from(err: &'a anyhow::Error) -> Self {
        match err.chain().find_map(|link| link.downcast_ref::<TypedError>()) {
            Some(typed) => Self::Classified(typed),
            None => {
                let plain: &(dyn StdError + 'static) = err.as_ref();
                Self::Plain(plain)
            }
        }
    }
}

impl<'a> From<&'a (dyn StdError + 'static)> for Failure<'a> {
    fn from(err: &'a (dyn StdError + 'static)) -> Self {
        Self::plain(err)
    }
}

impl<'a> From<&'a (dyn StdError + Send + Sync + 'static)> for Failure<'a> {
    fn from(err: &'a (dyn StdError + Send + Sync + 'static)) -> Self {
        Self::plain(err)
    }
}

impl<'a, T> From<Option<T>> for Failure<'a>
where
    T: Into<Failure<'a>>,
{
    fn from(err: Option<T>) -> Self {
        err.map_or(Self::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use std::fmt;

    #[derive(Debug)]
    struct Custom;

    impl fmt::Display for Custom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "custom failure")
        }
    }

    impl StdError for Custom {}

    impl HttpError for Custom {
        fn status_code(&self) -> u16 {
            666
        }

        fn client_message(&self) -> &str {
            "custom error someone created"
        }
    }

    #[test]
    fn test_typed_error_is_classified() {
        let err = ErrorCategory::Forbidden.error("nope");
        match Failure::from(&err) {
            Failure::Classified(e) => {
                assert_eq!(e.status_code(), 403);
                assert_eq!(e.client_message(), "nope");
            }
            _ => panic!("expected classified"),
        }
    }

    #[test]
    fn test_plain_typed_error_is_promoted() {
        let err = ErrorCategory::NotFound.error("gone");
        let dyn_err: &(dyn StdError + 'static) = &err;
        assert!(matches!(Failure::plain(dyn_err), Failure::Classified(_)));
    }

    #[test]
    fn test_plain_error_stays_plain() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let failure = Failure::plain(&err);
        assert!(matches!(failure, Failure::Plain(_)));
        assert_eq!(failure.raw_text().as_deref(), Some("disk on fire"));
    }

    #[test]
    fn test_anyhow_error_with_typed_inside() {
        let err = anyhow::Error::new(ErrorCategory::ImATeapot.error("short and stout"));
        match Failure::from(&err) {
            Failure::Classified(e) => assert_eq!(e.status_code(), 418),
            _ => panic!("expected classified"),
        }

        let err = anyhow::anyhow!("just text");
        assert!(matches!(Failure::from(&err), Failure::Plain(_)));
    }

    #[test]
    fn test_anyhow_context_and_set_message_agree() {
        let err = anyhow::Error::new(ErrorCategory::NotFound.error("no row"))
            .context("loading profile");
        let direct = match Failure::from(&err) {
            Failure::Classified(e) => e.status_code(),
            _ => panic!("expected classified"),
        };

        let updated = crate::errors::set_message(err, "profile not found");
        assert_eq!(direct, 404);
        assert_eq!(updated.status_code(), direct);
    }

    #[test]
    fn test_external_http_error() {
        let err = Custom;
        let failure = Failure::classified(&err);
        assert_eq!(failure.raw_text().as_deref(), Some("custom failure"));
    }

    #[test]
    fn test_none_is_missing() {
        let failure: Failure<'_> = Failure::from(None::<&TypedError>);
        assert!(failure.is_missing());
        assert!(failure.raw_text().is_none());
    }
}
