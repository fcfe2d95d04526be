//! Body and query serialization.

use bytes::Bytes;

use crate::Result;

/// MIME type sent with JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// MIME type sent with form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Serialize a value to JSON bytes.
///
/// # Example
///
/// ```
/// use plier_core::to_json;
///
/// let bytes = to_json(&serde_json::json!({"name": "Alice"})).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// Serialize a value to form URL-encoded bytes.
///
/// Sequences become repeated fields (`tags=a&tags=b`).
pub fn to_form<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(serde_html_form::to_string(value)?))
}

/// Serialize a value to a query string, without the leading `?`.
///
/// # Example
///
/// ```
/// use plier_core::to_query_string;
///
/// let pairs = [("q", "rust lang"), ("page", "2")];
/// assert_eq!(to_query_string(&pairs).expect("serialize"), "q=rust+lang&page=2");
/// ```
pub fn to_query_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_html_form::to_string(value)?)
}

/// Deserialize JSON bytes, reporting the path of the field that failed.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
