//! Typed validation of backend response bodies.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ShapeError;

/// Decode a body that must be a JSON array.
pub fn parse_array<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<Vec<T>, ShapeError> {
    match body {
        Value::Array(_) => serde_json::from_value(body).map_err(|e| ShapeError::Invalid {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        }),
        _ => Err(ShapeError::NotAnArray {
            endpoint: endpoint.to_string(),
        }),
    }
}

/// Like `parse_array`, but a body that is not an array (including `null`)
/// yields an empty collection. Malformed elements are still an error.
pub fn parse_lenient_array<T: DeserializeOwned>(
    endpoint: &str,
    body: Value,
) -> Result<Vec<T>, ShapeError> {
    match parse_array(endpoint, body) {
        Err(ShapeError::NotAnArray { endpoint }) => {
            tracing::warn!(endpoint = %endpoint, "Expected an array, treating as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// The doctors lookup comes back either bare or wrapped as `{"doctors": [...]}`.
pub fn parse_doctors<T: DeserializeOwned>(endpoint: &str, body: Value) -> Result<Vec<T>, ShapeError> {
    match body {
        Value::Object(mut map) => match map.remove("doctors") {
            Some(inner @ Value::Array(_)) => parse_array(endpoint, inner),
            _ => parse_lenient_array(endpoint, Value::Null),
        },
        other => parse_lenient_array(endpoint, other),
    }
}
