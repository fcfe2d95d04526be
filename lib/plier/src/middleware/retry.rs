//! Retry middleware.
//!
//! Wraps the next call in the [`retry`](crate::retry::retry) engine. The
//! standard policy built by [`create_retry`]:
//! - surfaces the original cause of a non-retryable error immediately;
//! - gives up with the last error once `max_retries` retries were spent;
//! - otherwise waits a jittered exponential backoff (1s, 2s, 4s... capped at
//!   10s), cut short if the configuration's cancellation token fires.

use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use tower::ServiceExt;
use tower_service::Service;
use tracing::{debug, warn};

use super::Middleware;
use crate::retry::{BackoffConfig, retry, sleep};
use crate::{Call, CallFuture, Config, Error, Request, Response, Result};

/// Retry policy callback: `(attempt, error, config)`.
///
/// `attempt` counts the failures before this one, starting at 0. Resolve to
/// `Ok(())` to try again, or to `Err` to stop with that error.
pub type BeforeRetry =
    Arc<dyn Fn(u32, Error, &Config) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Middleware retrying failed calls up to `max_retries` times.
///
/// A call that always fails is attempted `max_retries + 1` times and the last
/// error is returned. Uses the default [`BackoffConfig`].
///
/// # Example
///
/// ```
/// use plier::Config;
/// use plier::middleware::create_retry;
///
/// let config = Config::new().url("https://api.example.com").with(create_retry(3));
/// # let _ = config;
/// ```
#[must_use]
pub fn create_retry(max_retries: u32) -> Middleware {
    create_retry_with(max_retries, BackoffConfig::default())
}

/// Like [`create_retry`], with custom backoff constants.
#[must_use]
pub fn create_retry_with(max_retries: u32, backoff: BackoffConfig) -> Middleware {
    create_retry_base(move |attempt, error: Error, config: &Config| {
        let cancel = config.cancellation_token().cloned();
        async move {
            if error.is_not_retryable() {
                debug!(attempt, "not retryable, giving up");
                return Err(error.into_retry_cause());
            }

            if attempt >= max_retries {
                warn!(attempt, max_retries, error = %error, "retries exhausted");
                return Err(error);
            }

            let delay = backoff.delay(attempt);
            let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
            debug!(attempt, delay_ms, error = %error, "retrying after backoff");
            sleep(delay, cancel.as_ref()).await;
            Ok(())
        }
    })
}

/// Middleware retrying failed calls under a fully custom policy.
///
/// # Example
///
/// ```
/// use plier::Error;
/// use plier::middleware::create_retry_base;
///
/// // Retry timeouts only, at most twice, without waiting.
/// let timeouts_only = create_retry_base(|attempt, error: Error, _config| async move {
///     if error.is_timeout() && attempt < 2 { Ok(()) } else { Err(error) }
/// });
/// # let _ = timeouts_only;
/// ```
pub fn create_retry_base<F, Fut>(policy: F) -> Middleware
where
    F: Fn(u32, Error, &Config) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let before_retry: BeforeRetry = Arc::new(
        move |attempt: u32, error: Error, config: &Config| -> BoxFuture<'static, Result<()>> {
            Box::pin(policy(attempt, error, config))
        },
    );

    Middleware::new(move |next, config| {
        Call::new(Retry {
            inner: next,
            before_retry: Arc::clone(&before_retry),
            config: config.clone(),
        })
    })
}

/// Service that runs every call through the retry engine.
#[derive(Clone)]
pub struct Retry<S> {
    inner: S,
    before_retry: BeforeRetry,
    config: Config,
}

impl<S> std::fmt::Debug for Retry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S> Service<Request> for Retry<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = CallFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        // Each attempt waits for readiness on its own clone of `inner`.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let inner = self.inner.clone();
        let before_retry = Arc::clone(&self.before_retry);
        let config = self.config.clone();

        Box::pin(async move {
            retry(
                move || inner.clone().oneshot(request.clone()),
                move |attempt, error| before_retry(attempt, error, &config),
            )
            .await
        })
    }
}
