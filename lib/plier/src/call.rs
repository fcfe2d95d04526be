//! Type-erased calls.
//!
//! Every link of a middleware chain, the terminal transport included, is a
//! [`Call`]: a cloneable tower service from [`Request`] to [`Response`].

use std::future::Future;

use futures_util::future::BoxFuture;
use tower::ServiceExt;
use tower::util::BoxCloneSyncService;

use crate::{Error, Request, RequestOptions, Response, Result};

/// Type-erased, cloneable call shared by transports and middlewares.
pub type Call = BoxCloneSyncService<Request, Response, Error>;

/// Future returned by the services in this crate.
pub type CallFuture = BoxFuture<'static, Result<Response>>;

/// Lift an async function of `(address, options)` into a [`Call`].
///
/// This is the usual way to plug a custom transport or a test double.
///
/// # Example
///
/// ```
/// use plier::{Response, transport_fn};
///
/// let transport = transport_fn(|address, _options| async move {
///     assert!(address.starts_with("https://"));
///     Ok(Response::with_status(204))
/// });
/// # let _ = transport;
/// ```
pub fn transport_fn<F, Fut>(f: F) -> Call
where
    F: Fn(String, RequestOptions) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    Call::new(tower::service_fn(move |request: Request| {
        let (address, options) = request.into_parts();
        f(address, options)
    }))
}

/// Invoke `call` once with `(address, options)`.
pub async fn invoke(
    call: &Call,
    address: impl Into<String>,
    options: RequestOptions,
) -> Result<Response> {
    call.clone().oneshot(Request::new(address, options)).await
}
