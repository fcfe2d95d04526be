//! Status-to-error middleware.
//!
//! Transports resolve with any status the server sent. This middleware turns
//! 4xx and 5xx responses into [`Error::Http`] so that an outer retry
//! middleware can react to them:
//! - 5xx, 408 and 429 stay transient and may be retried;
//! - every other 4xx is tagged non-retryable, so retries stop at once and the
//!   caller receives the plain HTTP error.
//!
//! Without an outer retry middleware the tag reaches the caller, but
//! [`Error::status`], [`Error::body`] and the other accessors look through it.

use std::task::{Context, Poll};

use tower::{Layer, Service, ServiceExt};

use super::Middleware;
use crate::{Call, CallFuture, Error, Request, Response, Result, StatusCode};

/// Middleware converting error statuses into [`Error::Http`].
///
/// Add it before the retry middleware so that retries see the converted
/// errors:
///
/// ```
/// use plier::Config;
///
/// let config = Config::new()
///     .url("https://api.example.com")
///     .error_for_status()
///     .with_retry(3);
/// # let _ = config;
/// ```
#[must_use]
pub fn error_for_status() -> Middleware {
    Middleware::new(|next, _config| Call::new(ErrorForStatusLayer.layer(next)))
}

/// Convert a response into an error when its status is 4xx or 5xx.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status < 400 {
        return Ok(response);
    }

    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown Status");
    let error = Error::http_with_body(status, reason, response.bytes());

    if is_transient_status(status) {
        Err(error)
    } else {
        Err(error.not_retryable())
    }
}

const fn is_transient_status(status: u16) -> bool {
    status >= 500 || status == 408 || status == 429
}

/// Layer for [`ErrorForStatus`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorForStatusLayer;

impl<S> Layer<S> for ErrorForStatusLayer {
    type Service = ErrorForStatus<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ErrorForStatus { inner }
    }
}

/// Service converting error statuses into [`Error::Http`].
#[derive(Debug, Clone)]
pub struct ErrorForStatus<S> {
    inner: S,
}

impl<S> Service<Request> for ErrorForStatus<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = CallFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move { check_status(inner.oneshot(request).await?) })
    }
}
