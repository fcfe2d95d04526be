//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions for easy
//! glob importing:
//!
//! ```ignore
//! use plier::prelude::*;
//! ```

pub use crate::{
    Call, CancellationToken, Config, Error, Method, Middleware, Request, RequestOptions, Response,
    Result, StatusCode, as_not_retry_error, create_retry, error_for_status, execute, from_json,
    is_not_retry_error, to_json, transport_fn,
};
pub use serde::{Deserialize, Serialize};
