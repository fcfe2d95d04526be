//! Error types for plier.

use derive_more::{Display, From};

use crate::not_retry::NotRetryError;

/// Boxed error used for failures raised by custom transports and middlewares.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for plier operations.
#[derive(Debug, Display, From)]
pub enum Error {
    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(String),

    /// Neither an address nor a base address was configured.
    #[display("missing request address")]
    #[from(skip)]
    MissingAddress,

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form and query string serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Failure raised by a custom transport or middleware.
    #[display("{_0}")]
    #[from(skip)]
    Custom(BoxError),

    /// An error tagged as fatal: retry middlewares stop on it immediately.
    #[display("{_0}")]
    #[from]
    NotRetryable(NotRetryError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonSerialization(err) => Some(err),
            Self::FormSerialization(err) => Some(err),
            Self::InvalidUrl(err) => Some(err),
            Self::Custom(err) => Some(err.as_ref()),
            Self::NotRetryable(err) => Some(err.cause()),
            _ => None,
        }
    }
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Wrap an arbitrary error raised outside plier.
    #[must_use]
    pub fn custom(error: impl Into<BoxError>) -> Self {
        Self::Custom(error.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Tag this error as non-retryable.
    ///
    /// See [`crate::as_not_retry_error`].
    #[must_use]
    pub fn not_retryable(self) -> Self {
        crate::as_not_retry_error(self)
    }

    /// Returns `true` if this error carries the non-retryable tag.
    #[must_use]
    pub const fn is_not_retryable(&self) -> bool {
        matches!(self, Self::NotRetryable(_))
    }

    /// Strip the non-retryable tag, returning the original cause.
    ///
    /// Untagged errors are returned unchanged.
    #[must_use]
    pub fn into_retry_cause(self) -> Self {
        match self {
            Self::NotRetryable(tagged) => tagged.into_cause(),
            other => other,
        }
    }

    /// The error a caller should inspect: the cause of a tagged error, or
    /// `self` otherwise.
    ///
    /// The predicates and accessors below all look through the tag, so a
    /// tagged HTTP error still reports its status and body.
    #[must_use]
    pub fn untagged(&self) -> &Self {
        match self {
            Self::NotRetryable(tagged) => tagged.cause().untagged(),
            other => other,
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self.untagged(), Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.untagged(), Self::Connection(_))
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.untagged() {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self.untagged() {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Try to decode the HTTP error body as JSON.
    ///
    /// Returns `None` if there is no body or this is not an HTTP error.
    pub fn decode_body<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T>> {
        self.body().map(|body| crate::from_json(body))
    }
}
