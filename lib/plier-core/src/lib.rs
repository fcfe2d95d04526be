//! Core types for the plier middleware HTTP client.
//!
//! This crate provides the values that flow through a plier middleware chain:
//! - [`Request`] and [`RequestOptions`] - the arguments of a transport call
//! - [`Response`] - a buffered HTTP response
//! - [`Error`] and [`Result`] - error handling
//! - [`as_not_retry_error`] / [`is_not_retry_error`] - the non-retryable marker
//! - [`Method`] and [`StatusCode`] - re-exported from the `http` crate
//! - [`CancellationToken`] - re-exported from `tokio-util`

mod body;
mod error;
mod not_retry;
pub mod prelude;
mod request;
mod response;

pub use body::{
    FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, from_json, to_form, to_json, to_query_string,
};
pub use error::{BoxError, Error, Result};
pub use not_retry::{NOT_RETRY_MESSAGE, NotRetryError, as_not_retry_error, is_not_retry_error};
pub use request::{Request, RequestOptions};
pub use response::Response;

// Re-export http crate types for methods, status codes and headers
pub use http::{Method, StatusCode, header};

pub use tokio_util::sync::CancellationToken;
