//! Request execution.

use tower::ServiceExt;
use tracing::debug;

use crate::{Config, Request, Response, Result, apply_middlewares, default_transport};

/// Execute the request described by `config`.
///
/// Resolves the address (address, path and query), strips the
/// configuration-only fields into a [`RequestOptions`](crate::RequestOptions)
/// bag, picks the transport override or the default [`HyperTransport`](crate::HyperTransport),
/// wraps it in the configured middlewares and invokes the result. The
/// response is returned as the chain produced it.
///
/// # Errors
///
/// Returns [`Error::MissingAddress`](crate::Error::MissingAddress) when no
/// address is configured, a serialization error when the query cannot be
/// encoded, or whatever the middleware chain fails with.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> plier::Result<()> {
/// use plier::{Config, execute};
///
/// let config = Config::new()
///     .url("https://api.example.com")
///     .path("/health")
///     .with_retry(2);
///
/// let response = execute(&config).await?;
/// assert!(response.is_success());
/// # Ok(())
/// # }
/// ```
pub async fn execute(config: &Config) -> Result<Response> {
    let address = config.resolve_address()?;
    let options = config.request_options();

    let transport = config
        .transport_override()
        .cloned()
        .unwrap_or_else(default_transport);

    debug!(
        method = %options.method,
        %address,
        middlewares = config.middlewares().len(),
        custom_transport = config.transport_override().is_some(),
        "executing request"
    );

    apply_middlewares(transport, config)
        .oneshot(Request::new(address, options))
        .await
}
