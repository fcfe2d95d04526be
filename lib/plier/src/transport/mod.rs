//! Default transport using hyper-util.
//!
//! [`HyperTransport`] is the fallback used by [`execute`](crate::execute)
//! when a configuration carries no transport override. It is an ordinary
//! [`Call`] and can be injected explicitly with
//! [`Config::transport`](crate::Config::transport), e.g. to share one client
//! between many requests.

mod config;
mod connector;

use std::collections::BTreeMap;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower_service::Service;
use tracing::trace;

pub use config::{TransportConfig, TransportConfigBuilder};

use crate::{Call, CallFuture, Error, Request, Response, Result};
use connector::https_connector;

/// HTTP client transport over hyper-util with rustls.
///
/// The option bag's method, headers, body and timeout are honored; the
/// cancellation token is not, so a call in flight always runs to completion.
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: TransportConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl HyperTransport {
    /// Create a transport with the given configuration.
    #[must_use]
    pub fn new(config: TransportConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .build(https_connector(config.connect_timeout));

        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Box this transport into a [`Call`].
    #[must_use]
    pub fn into_call(self) -> Call {
        Call::new(self)
    }

    /// Build a hyper request from the address and options.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (address, options) = request.into_parts();
        let url = url::Url::parse(&address)?;

        let mut builder = http::Request::builder()
            .method(options.method)
            .uri(url.as_str());

        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = options.body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    /// Extract response headers, skipping values that are not valid strings.
    fn extract_headers(headers: &http::HeaderMap) -> BTreeMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let timeout = request.options().timeout.unwrap_or(self.config.timeout);
        let hyper_request = Self::build_hyper_request(request)?;
        trace!(uri = %hyper_request.uri(), ?timeout, "dispatching");

        let response = tokio::time::timeout(timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Service<Request> for HyperTransport {
    type Response = Response;
    type Error = Error;
    type Future = CallFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

/// The transport used when a configuration does not override it.
#[must_use]
pub fn default_transport() -> Call {
    HyperTransport::default().into_call()
}
