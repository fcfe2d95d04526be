//! The arguments of a transport call.
//!
//! Every call in a middleware chain receives the same pair: a fully resolved
//! address and a [`RequestOptions`] bag. Configuration-only fields (address
//! parts, middlewares, transport override) never reach this level.
//!
//! # Example
//!
//! ```
//! use plier_core::{Method, Request, RequestOptions};
//!
//! let options = RequestOptions::new(Method::POST).header("Accept", "application/json");
//! let request = Request::new("https://api.example.com/users", options);
//!
//! assert_eq!(request.method(), &Method::POST);
//! assert_eq!(request.header("Accept"), Some("application/json"));
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use tokio_util::sync::CancellationToken;

/// Options handed to the transport alongside the address.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
    /// Cancellation handle shared with the configuration.
    pub cancellation: Option<CancellationToken>,
    /// Per-request timeout, honored by transports that support it.
    pub timeout: Option<Duration>,
    /// Arbitrary transport-specific settings.
    pub extensions: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Options for the given method and nothing else.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A transport call's arguments: the address and the option bag.
#[derive(Debug, Clone)]
pub struct Request {
    address: String,
    options: RequestOptions,
}

impl Request {
    /// Creates a request from its parts.
    #[must_use]
    pub fn new(address: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            address: address.into(),
            options,
        }
    }

    /// Resolved request address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Request options.
    #[must_use]
    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Mutable access to the options.
    #[must_use]
    pub fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.options.method
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.options.headers.get(name).map(String::as_str)
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.options.headers
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.options.body.as_ref()
    }

    /// Consume into (address, options).
    #[must_use]
    pub fn into_parts(self) -> (String, RequestOptions) {
        (self.address, self.options)
    }
}
