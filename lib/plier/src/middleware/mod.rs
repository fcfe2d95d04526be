//! Middleware composition.
//!
//! A [`Middleware`] wraps the next [`Call`] of the chain and returns a new call
//! with the same signature. It may intercept, delay, retry, transform or
//! short-circuit the call. It also sees the whole [`Config`], so it can read
//! request-level settings such as the cancellation token.
//!
//! [`apply_middlewares`] folds the configured list around a terminal call:
//! the middleware at index 0 is the innermost (closest to the transport),
//! the last one added is the outermost and sees each call first.
//!
//! # Available middlewares
//!
//! - [`create_retry`] / [`create_retry_with`] / [`create_retry_base`] - retries with backoff
//! - [`error_for_status`] - turns non-2xx responses into errors
//! - [`LoggingLayer`] - logs calls using `tracing`
//! - [`BearerAuthLayer`] - adds `Authorization: Bearer <token>`
//!
//! Any tower [`Layer`] becomes a middleware through [`Middleware::layer`].
//!
//! # Example
//!
//! ```
//! use plier::Config;
//! use plier::middleware::{LoggingLayer, Middleware, create_retry};
//!
//! let config = Config::new()
//!     .url("https://api.example.com")
//!     .with(create_retry(3))
//!     .with(Middleware::layer(LoggingLayer::new()));
//!
//! assert_eq!(config.middlewares().len(), 2);
//! ```

mod bearer_auth;
mod logging;
mod retry;
mod status;

use std::fmt;
use std::sync::Arc;

pub use bearer_auth::{BearerAuth, BearerAuthLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use retry::{BeforeRetry, Retry, create_retry, create_retry_base, create_retry_with};
pub use status::{ErrorForStatus, ErrorForStatusLayer, error_for_status};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};

use tower_service::Service;

use crate::{Call, Config, Error, Request, Response};

type WrapFn = dyn Fn(Call, &Config) -> Call + Send + Sync;

/// A function of `(next, config) -> wrapped` composable into a chain.
///
/// Cloning a middleware is cheap: the wrapping function is shared.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<WrapFn>,
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

impl Middleware {
    /// Create a middleware from a wrapping function.
    ///
    /// # Example
    ///
    /// ```
    /// use plier::middleware::Middleware;
    /// use plier::{Call, Request};
    /// use tower::ServiceExt;
    ///
    /// // Adds a header read from nowhere but the call itself.
    /// let stamp = Middleware::new(|next: Call, _config| {
    ///     Call::new(next.map_request(|mut request: Request| {
    ///         request.headers_mut().insert("X-Stamp".into(), "1".into());
    ///         request
    ///     }))
    /// });
    /// # let _ = stamp;
    /// ```
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(Call, &Config) -> Call + Send + Sync + 'static,
    {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// Lift a tower [`Layer`] into a middleware. The configuration is ignored.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<Call> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self::new(move |next, _config| Call::new(layer.layer(next)))
    }

    /// Wrap `next`, returning the wrapped call.
    #[must_use]
    pub fn wrap(&self, next: Call, config: &Config) -> Call {
        (self.wrap)(next, config)
    }
}

/// Fold the configuration's middlewares around `terminal`.
///
/// With no middleware, `terminal` is returned as is. Otherwise the result is
/// `mN(...m1(m0(terminal, config), config)..., config)`.
#[must_use]
pub fn apply_middlewares(terminal: Call, config: &Config) -> Call {
    config
        .middlewares()
        .iter()
        .fold(terminal, |next, middleware| middleware.wrap(next, config))
}
