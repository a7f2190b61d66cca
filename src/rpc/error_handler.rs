//! Error-envelope payloads, their classification, and the handler seam.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An RPC error: either the `error` member of a response or a locally raised
/// failure using one of the negative local codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    /// The transport failed to deliver the request or read the response.
    pub const TRANSPORT_FAILURE: i64 = -1;
    /// Local input validation failed.
    pub const INVALID_INPUT: i64 = -2;
    /// Local cryptographic failure.
    pub const CRYPTO_FAILURE: i64 = -3;
    /// Funding amount below the node's minimum.
    pub const AMOUNT_BELOW_MINIMUM: i64 = -4;
    /// Standard JSON-RPC "invalid params"; the node refines it by message.
    pub const INVALID_PARAMS: i64 = -32602;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::classify(self)
    }
}

/// Classification of an [`RpcError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TransportFailure,
    InvalidInput,
    CryptoFailure,
    AmountBelowMinimum,
    InvalidApiKey,
    /// The wallet passphrase did not decrypt the wallet.
    BadPassphrase,
    InsufficientFunds,
    InvalidParams,
    Unrecognized,
}

impl ErrorKind {
    pub fn classify(error: &RpcError) -> Self {
        match error.code {
            RpcError::TRANSPORT_FAILURE => ErrorKind::TransportFailure,
            RpcError::INVALID_INPUT => ErrorKind::InvalidInput,
            RpcError::CRYPTO_FAILURE => ErrorKind::CryptoFailure,
            RpcError::AMOUNT_BELOW_MINIMUM => ErrorKind::AmountBelowMinimum,
            RpcError::INVALID_PARAMS => match error.message.as_str() {
                "invalid api key" => ErrorKind::InvalidApiKey,
                "Cipher error: invalid padding" => ErrorKind::BadPassphrase,
                "Unsupported: insufficient funds" => ErrorKind::InsufficientFunds,
                _ => ErrorKind::InvalidParams,
            },
            _ => ErrorKind::Unrecognized,
        }
    }

    /// Human-readable hint for the user.
    pub fn hint(&self) -> &'static str {
        match self {
            ErrorKind::TransportFailure => "Could not reach the defiads node",
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::CryptoFailure => "Cryptographic operation failed",
            ErrorKind::AmountBelowMinimum => "Amount is below the minimum",
            ErrorKind::InvalidApiKey => "Invalid API key",
            ErrorKind::BadPassphrase => "Invalid wallet passphrase",
            ErrorKind::InsufficientFunds => "Insufficient funds",
            ErrorKind::InvalidParams => "Invalid parameters",
            ErrorKind::Unrecognized => "Unrecognized error",
        }
    }
}

/// Receives every RPC error. Its return value becomes the result of the
/// failed call.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: &RpcError) -> Option<Value>;
}

impl<F> ErrorHandler for F
where
    F: Fn(&RpcError) -> Option<Value> + Send + Sync,
{
    fn handle(&self, error: &RpcError) -> Option<Value> {
        self(error)
    }
}

/// Default handler: logs the error and yields no result.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorHandler;

impl ErrorHandler for LoggingErrorHandler {
    fn handle(&self, error: &RpcError) -> Option<Value> {
        let kind = error.kind();
        tracing::warn!(
            code = error.code,
            kind = ?kind,
            message = %error.message,
            "{}",
            kind.hint()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_local_codes() {
        assert_eq!(RpcError::new(-1, "x").kind(), ErrorKind::TransportFailure);
        assert_eq!(RpcError::new(-2, "x").kind(), ErrorKind::InvalidInput);
        assert_eq!(RpcError::new(-3, "x").kind(), ErrorKind::CryptoFailure);
        assert_eq!(RpcError::new(-4, "x").kind(), ErrorKind::AmountBelowMinimum);
    }

    #[test]
    fn refines_invalid_params_by_message() {
        let kind = |message: &str| RpcError::new(RpcError::INVALID_PARAMS, message).kind();
        assert_eq!(kind("invalid api key"), ErrorKind::InvalidApiKey);
        assert_eq!(kind("Cipher error: invalid padding"), ErrorKind::BadPassphrase);
        assert_eq!(kind("Unsupported: insufficient funds"), ErrorKind::InsufficientFunds);
        assert_eq!(kind("something else"), ErrorKind::InvalidParams);
    }

    #[test]
    fn unknown_codes_are_unrecognized() {
        assert_eq!(RpcError::new(-32000, "invalid api key").kind(), ErrorKind::Unrecognized);
        assert_eq!(RpcError::new(7, "").kind(), ErrorKind::Unrecognized);
    }

    #[test]
    fn closures_are_handlers() {
        let handler = |error: &RpcError| Some(json!(error.code));
        assert_eq!(handler.handle(&RpcError::new(-4, "x")), Some(json!(-4)));
        assert_eq!(LoggingErrorHandler.handle(&RpcError::new(-4, "x")), None);
    }
}
