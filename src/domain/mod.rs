//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: domain types returned by the façade
//! - `wire.rs`: raw serde shapes matching node responses (where they differ)
//! - `convert.rs`: shape checks and wire → domain conversion
//! - `client.rs`: sub-client issuing the RPC calls

pub mod ad;
pub mod prepared;
pub mod release;
pub mod wallet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ShapeError;
use crate::rpc::Method;

/// Deserialize a raw RPC result into the expected shape.
pub(crate) fn shaped<T: DeserializeOwned>(value: Value, expected: &'static str) -> Result<T, ShapeError> {
    serde_json::from_value(value).map_err(|e| ShapeError::new(expected, e.to_string()))
}

/// Collapse a shape mismatch into "no result", keeping the reason in the logs.
pub(crate) fn accept<T>(method: Method, result: Result<T, ShapeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(
                method = method.as_str(),
                expected = err.expected,
                reason = %err.reason,
                "discarding result with unexpected shape"
            );
            None
        }
    }
}
