//! Non-retryable error marker.
//!
//! Retry middlewares treat every failure as transient unless it carries this
//! tag. A caller that knows an error is fatal wraps it with
//! [`as_not_retry_error`]; the retry middleware detects the tag with
//! [`is_not_retry_error`], stops immediately and surfaces the original cause.
//!
//! The tag is a dedicated [`Error`] variant holding a [`NotRetryError`], whose
//! constructor is private to this crate, so user-visible fields can never be
//! mistaken for it.

use derive_more::Display;

use crate::Error;

/// Message carried by every tagged error.
pub const NOT_RETRY_MESSAGE: &str = "Not retryable error";

/// The payload of [`Error::NotRetryable`]: a fatal error and its original cause.
#[derive(Debug, Display)]
#[display("{}", NOT_RETRY_MESSAGE)]
pub struct NotRetryError {
    cause: Box<Error>,
}

impl NotRetryError {
    /// The original error that was tagged.
    #[must_use]
    pub fn cause(&self) -> &Error {
        &self.cause
    }

    /// Consume the tag, returning the original error.
    #[must_use]
    pub fn into_cause(self) -> Error {
        *self.cause
    }
}

impl std::error::Error for NotRetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

/// Tag `cause` as non-retryable.
///
/// The returned error displays as [`NOT_RETRY_MESSAGE`] and reports `cause` as
/// its source.
///
/// # Example
///
/// ```
/// use plier_core::{Error, as_not_retry_error, is_not_retry_error};
///
/// let fatal = as_not_retry_error(Error::http(400, "Bad Request"));
/// assert!(is_not_retry_error(Some(&fatal)));
/// assert_eq!(fatal.to_string(), "Not retryable error");
/// ```
#[must_use]
pub fn as_not_retry_error(cause: impl Into<Error>) -> Error {
    Error::NotRetryable(NotRetryError {
        cause: Box::new(cause.into()),
    })
}

/// Returns `true` only for a present error carrying the non-retryable tag.
#[must_use]
pub fn is_not_retry_error(value: Option<&Error>) -> bool {
    value.is_some_and(Error::is_not_retryable)
}
