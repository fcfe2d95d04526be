//! Immutable request configuration.
//!
//! A [`Config`] is plain data: the address, method, headers, body, query,
//! cancellation handle, an optional transport override and the ordered list of
//! middlewares. Every builder method borrows the current value and returns a
//! new one with a single field changed, so a base configuration can be shared
//! freely and specialised per request.
//!
//! # Example
//!
//! ```
//! use plier::{Config, Method};
//!
//! let api = Config::new()
//!     .url("https://api.example.com")
//!     .header("Accept", "application/json")
//!     .with_retry(3);
//!
//! let create = api.path("/users").method(Method::POST);
//! let list = api.path("/users").query("page", "2");
//!
//! assert_eq!(create.resolve_address().unwrap(), "https://api.example.com/users");
//! assert_eq!(list.resolve_address().unwrap(), "https://api.example.com/users?page=2");
//! assert_eq!(api.middlewares().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tower::Layer;
use tower_service::Service;

use crate::middleware::{BearerAuthLayer, LoggingLayer, Middleware, create_retry, error_for_status};
use crate::{
    Call, Error, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, Method, Request, RequestOptions, Response,
    Result,
};

/// Immutable configuration for one request, or a base shared by many.
#[derive(Clone, Default)]
pub struct Config {
    address: Option<String>,
    path: Option<String>,
    method: Method,
    headers: BTreeMap<String, String>,
    body: Option<Bytes>,
    query: Vec<(String, String)>,
    cancellation: Option<CancellationToken>,
    timeout: Option<Duration>,
    extensions: BTreeMap<String, String>,
    transport: Option<Call>,
    middlewares: Vec<Middleware>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("path", &self.path)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("query", &self.query)
            .field("cancellable", &self.cancellation.is_some())
            .field("timeout", &self.timeout)
            .field("extensions", &self.extensions)
            .field("custom_transport", &self.transport.is_some())
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl Config {
    /// An empty configuration: no address, `GET`, no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_change(&self, change: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        change(&mut next);
        next
    }

    // ========================================================================
    // Address
    // ========================================================================

    /// Set the address, or the base address when combined with [`Config::path`].
    #[must_use]
    pub fn url(&self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.with_change(|c| c.address = Some(address))
    }

    /// Set the path appended to the address.
    #[must_use]
    pub fn path(&self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.with_change(|c| c.path = Some(path))
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let pair = (name.into(), value.into());
        self.with_change(|c| c.query.push(pair))
    }

    /// Append several query parameters.
    #[must_use]
    pub fn query_pairs<K, V>(&self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<_> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_change(|c| c.query.extend(pairs))
    }

    // ========================================================================
    // Request options
    // ========================================================================

    /// Set the HTTP method.
    #[must_use]
    pub fn method(&self, method: Method) -> Self {
        self.with_change(|c| c.method = method)
    }

    /// Set a header, replacing any previous value.
    #[must_use]
    pub fn header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.with_change(|c| {
            c.headers.insert(name, value);
        })
    }

    /// Set several headers.
    #[must_use]
    pub fn headers<K, V>(&self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let headers: Vec<_> = headers
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_change(|c| c.headers.extend(headers))
    }

    /// Set the raw body.
    #[must_use]
    pub fn body(&self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.with_change(|c| c.body = Some(body))
    }

    /// Set a JSON body and its `Content-Type`.
    pub fn json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Self> {
        let body = crate::to_json(value)?;
        Ok(self.header("Content-Type", JSON_CONTENT_TYPE).body(body))
    }

    /// Set a form-urlencoded body and its `Content-Type`.
    pub fn form<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<Self> {
        let body = crate::to_form(value)?;
        Ok(self.header("Content-Type", FORM_CONTENT_TYPE).body(body))
    }

    /// Attach a cancellation token.
    ///
    /// Cancelling it cuts short any retry backoff wait; it does not abort a
    /// call already in flight.
    #[must_use]
    pub fn cancellation(&self, token: CancellationToken) -> Self {
        self.with_change(|c| c.cancellation = Some(token))
    }

    /// Set a per-request timeout, passed through to the transport.
    #[must_use]
    pub fn timeout(&self, timeout: Duration) -> Self {
        self.with_change(|c| c.timeout = Some(timeout))
    }

    /// Set an arbitrary transport-specific option.
    #[must_use]
    pub fn extension(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.with_change(|c| {
            c.extensions.insert(name, value);
        })
    }

    /// Replace the default transport.
    #[must_use]
    pub fn transport(&self, transport: Call) -> Self {
        self.with_change(|c| c.transport = Some(transport))
    }

    // ========================================================================
    // Middlewares
    // ========================================================================

    /// Append a middleware. The last one appended is the outermost.
    #[must_use]
    pub fn with(&self, middleware: Middleware) -> Self {
        self.with_change(|c| c.middlewares.push(middleware))
    }

    /// Append a tower layer as a middleware.
    #[must_use]
    pub fn layer<L>(&self, layer: L) -> Self
    where
        L: Layer<Call> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error>
            + Clone
            + Send
            + Sync
            + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.with(Middleware::layer(layer))
    }

    /// Retry failed calls up to `max_retries` times with exponential backoff.
    ///
    /// See [`create_retry`].
    #[must_use]
    pub fn with_retry(&self, max_retries: u32) -> Self {
        self.with(create_retry(max_retries))
    }

    /// Log calls with `tracing`.
    #[must_use]
    pub fn with_logging(&self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add an `Authorization: Bearer <token>` header to every call.
    #[must_use]
    pub fn with_bearer_auth(&self, token: impl Into<String>) -> Self {
        self.layer(BearerAuthLayer::new(token))
    }

    /// Turn non-2xx responses into [`Error::Http`].
    ///
    /// See [`error_for_status`].
    #[must_use]
    pub fn error_for_status(&self) -> Self {
        self.with(error_for_status())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The configured address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// The configured path, if any.
    #[must_use]
    pub fn path_segment(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// HTTP method.
    #[must_use]
    pub const fn http_method(&self) -> &Method {
        &self.method
    }

    /// Configured headers.
    #[must_use]
    pub fn header_map(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Configured query parameters, in insertion order.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// The cancellation token, if any.
    #[must_use]
    pub const fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// The transport override, if any.
    #[must_use]
    pub const fn transport_override(&self) -> Option<&Call> {
        self.transport.as_ref()
    }

    /// Middlewares in insertion order (innermost first).
    #[must_use]
    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// The final request address: address, path and query combined.
    pub fn resolve_address(&self) -> Result<String> {
        let base = self.address.as_deref().ok_or(Error::MissingAddress)?;
        let address = match self.path.as_deref() {
            Some(path) => join_path(base, path),
            None => base.to_string(),
        };
        append_query(address, &self.query)
    }

    /// The option bag handed to the transport.
    ///
    /// Address parts, middlewares and the transport override are left out.
    #[must_use]
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            method: self.method.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            cancellation: self.cancellation.clone(),
            timeout: self.timeout,
            extensions: self.extensions.clone(),
        }
    }

    /// Execute the request. Alias for [`crate::execute`].
    pub async fn send(&self) -> Result<Response> {
        crate::execute(self).await
    }
}

/// Join `base` and `path` with exactly one `/` between them.
fn join_path(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Append serialized pairs with `?`, or `&` when `address` already has a query.
fn append_query(mut address: String, pairs: &[(String, String)]) -> Result<String> {
    if pairs.is_empty() {
        return Ok(address);
    }
    let query = crate::to_query_string(pairs)?;
    address.push(if address.contains('?') { '&' } else { '?' });
    address.push_str(&query);
    Ok(address)
}
