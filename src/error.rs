//! Unified SDK error types.
//!
//! The façade itself never returns these: remote and validation failures
//! surface as `None` plus a call to the configured error handler. They show up
//! at construction time, in the key codec, in signing, and inside transports.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Failures importing or exporting P-384 key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Unsupported key profile: kty={kty} crv={crv}")]
    UnsupportedProfile { kty: String, crv: String },

    #[error("Invalid base64url in `{field}`: {reason}")]
    InvalidEncoding { field: &'static str, reason: String },

    #[error("Coordinate `{field}` has {len} bytes, expected at most {max}")]
    CoordinateLength {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("Point is not on the P-384 curve: {0}")]
    InvalidPoint(String),

    #[error("Invalid private scalar: {0}")]
    InvalidScalar(String),

    #[error("Private scalar does not match the public coordinates")]
    Mismatch,

    #[error("Key material carries no private scalar with `sign` usage")]
    NotPrivate,
}

/// Failures producing or checking a signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Abstract already carries a metadata separator")]
    SeparatorInAbstract,

    #[error("Public key could not be encoded")]
    Encoding,

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// A result that does not match the shape a façade method expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected}: {reason}")]
pub struct ShapeError {
    pub expected: &'static str,
    pub reason: String,
}

impl ShapeError {
    pub fn new(expected: &'static str, reason: impl Into<String>) -> Self {
        Self {
            expected,
            reason: reason.into(),
        }
    }
}

/// Transport-level failures. The RPC client folds every variant into code `-1`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Transport failed: {0}")]
    Failed(String),
}

/// HTTP-layer errors raised by the bundled transport.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unsupported HTTP verb: {0}")]
    InvalidVerb(String),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad request {status}: {body}")]
    BadRequest { status: u16, body: String },

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}
