//! JSON-RPC 2.0 envelopes.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Method, RpcError};

pub const JSONRPC_VERSION: &str = "2.0";

/// Every request carries this id.
pub const REQUEST_ID: u64 = 0;

/// Outgoing request envelope.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: &'a [Value],
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: Method, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.as_str(),
            params,
            id: REQUEST_ID,
        }
    }
}

/// A classified response body.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    /// `result` was present; `null` is a valid result.
    Success(Value),
    Error(RpcError),
    /// Neither envelope shape; carries the reason.
    Malformed(String),
}

impl RpcResponse {
    pub fn parse(text: &str) -> Self {
        let envelope = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(envelope)) => envelope,
            Ok(_) => return RpcResponse::Malformed("not a JSON object".into()),
            Err(e) => return RpcResponse::Malformed(format!("invalid JSON: {}", e)),
        };
        Self::from_envelope(envelope)
    }

    fn from_envelope(mut envelope: Map<String, Value>) -> Self {
        if envelope.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return RpcResponse::Malformed("missing or unsupported jsonrpc version".into());
        }
        if !envelope.contains_key("id") {
            return RpcResponse::Malformed("missing id".into());
        }
        if let Some(result) = envelope.remove("result") {
            return RpcResponse::Success(result);
        }
        match envelope.remove("error") {
            Some(error) => match parse_error(&error) {
                Some(error) => RpcResponse::Error(error),
                None => RpcResponse::Malformed(format!("error member has no code/message: {}", error)),
            },
            None => RpcResponse::Malformed("neither result nor error present".into()),
        }
    }
}

fn parse_error(error: &Value) -> Option<RpcError> {
    let code = error.get("code")?.as_i64()?;
    let message = error.get("message")?.as_str()?;
    Some(RpcError::new(code, message))
}
