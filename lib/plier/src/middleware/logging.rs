//! Call logging middleware.
//!
//! Logs each call that passes through it with `tracing`. Placed outside a
//! retry middleware it logs the whole retried call once; placed inside, it
//! logs every attempt.

use std::collections::BTreeMap;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service, ServiceExt};
use tracing::{Instrument, Level, debug, info, span, warn};

use crate::{CallFuture, Error, Request, Response, Result};

/// Headers whose values never reach the logs.
const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", "proxy-authorization"];

/// Layer that adds call logging.
///
/// # Example
///
/// ```
/// use plier::Config;
/// use plier::middleware::LoggingLayer;
///
/// let config = Config::new().layer(LoggingLayer::debug());
/// # let _ = config;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// Detail level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Method, address and headers (sensitive values redacted).
    Debug,
    /// Method and address only.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Create a new logging layer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging layer that also logs request headers.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service that logs calls and their outcome.
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

fn redacted_headers(request: &Request) -> BTreeMap<&str, &str> {
    request
        .options()
        .headers
        .iter()
        .map(|(name, value)| {
            let shown = if REDACTED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                "<redacted>"
            } else {
                value.as_str()
            };
            (name.as_str(), shown)
        })
        .collect()
}

impl<S> Service<Request> for Logging<S>
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
        let method = request.method().clone();
        let address = request.address().to_string();
        let span = span!(Level::INFO, "http_call", %method, %address);

        match self.level {
            LogLevel::Debug => {
                debug!(parent: &span, headers = ?redacted_headers(&request), "sending request");
            }
            LogLevel::Info => {
                info!(parent: &span, "sending request");
            }
        }

        let inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.oneshot(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        info!(status = response.status(), elapsed_ms, "request completed");
                    }
                    Ok(response) => {
                        warn!(status = response.status(), elapsed_ms, "request failed with HTTP error");
                    }
                    Err(err) => {
                        warn!(error = %err, elapsed_ms, "request failed");
                    }
                }

                result
            }
            .instrument(span),
        )
    }
}
