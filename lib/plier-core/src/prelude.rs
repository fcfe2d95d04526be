//! Prelude module for convenient imports.
//!
//! ```ignore
//! use plier_core::prelude::*;
//! ```

pub use crate::{
    CancellationToken, Error, Method, Request, RequestOptions, Response, Result,
    as_not_retry_error, from_json, is_not_retry_error, to_json,
};
