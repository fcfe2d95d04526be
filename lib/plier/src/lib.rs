//! Composable HTTP client middleware with retry and backoff.
//!
//! A request is described by an immutable [`Config`]: an address, request
//! options, an optional transport override and an ordered list of
//! [`Middleware`]s. [`execute`] wraps the transport in the middlewares and
//! invokes the resulting [`Call`].
//!
//! The retry machinery lives in [`retry`] (the generic engine, backoff and a
//! cancellable sleep) and [`middleware`] (the retry middleware and friends).
//! Errors can be tagged non-retryable with [`as_not_retry_error`] so that a
//! retry middleware stops at once.
//!
//! # Example
//!
//! ```no_run
//! use plier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> plier::Result<()> {
//! let api = Config::new()
//!     .url("https://api.example.com")
//!     .error_for_status()
//!     .with_retry(3)
//!     .with_logging();
//!
//! let user: User = api.path("/users/42").send().await?.json()?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

mod call;
mod config;
mod execute;
pub mod middleware;
pub mod prelude;
pub mod retry;
pub mod transport;

pub use call::{Call, CallFuture, invoke, transport_fn};
pub use config::Config;
pub use execute::execute;
pub use middleware::{
    Middleware, apply_middlewares, create_retry, create_retry_base, create_retry_with,
    error_for_status,
};
pub use transport::{HyperTransport, TransportConfig, TransportConfigBuilder, default_transport};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use plier_core::{
    BoxError, Error, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, NOT_RETRY_MESSAGE, NotRetryError,
    Request, RequestOptions, Response, Result, as_not_retry_error, from_json, is_not_retry_error,
    to_form, to_json, to_query_string,
};

// Re-export http types for methods, status codes and headers
pub use plier_core::{Method, StatusCode, header};

pub use plier_core::CancellationToken;
