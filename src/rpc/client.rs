//! Transport-agnostic JSON-RPC client.
//!
//! Builds the request envelope, hands it to a [`Transport`], and validates the
//! response. Nothing here returns `Err`: failures go to the [`ErrorHandler`]
//! and whatever it returns is the result of the call.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::wire::{RpcRequest, RpcResponse};
use super::{ErrorHandler, Method, RpcError, Transport};

/// Issues JSON-RPC calls against one endpoint with one API key.
#[derive(Clone)]
pub struct RpcClient {
    endpoint: String,
    api_key: String,
    transport: Arc<dyn Transport>,
    error_handler: Arc<dyn ErrorHandler>,
}

impl RpcClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        transport: Arc<dyn Transport>,
        error_handler: Arc<dyn ErrorHandler>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            transport,
            error_handler,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `method` with positional `params`; the API key is prepended.
    ///
    /// Params must be JSON primitives (string, number, bool, null).
    pub async fn call(&self, method: Method, params: Vec<Value>) -> Option<Value> {
        if let Some(index) = params.iter().position(|p| !is_primitive(p)) {
            return self.report(RpcError::new(
                RpcError::INVALID_INPUT,
                format!("param {} of `{}` is not a JSON primitive", index, method),
            ));
        }

        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(Value::from(self.api_key.as_str()));
        full.extend(params);

        let body = match serde_json::to_string(&RpcRequest::new(method, &full)) {
            Ok(body) => body,
            Err(e) => return self.report(RpcError::new(RpcError::INVALID_INPUT, e.to_string())),
        };

        tracing::debug!(method = method.as_str(), endpoint = %self.endpoint, "rpc call");

        let text = match self.transport.send(&self.endpoint, "POST", Some(body)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(method = method.as_str(), error = %e, "transport failed");
                return self.report(RpcError::new(RpcError::TRANSPORT_FAILURE, e.to_string()));
            }
        };

        match RpcResponse::parse(&text) {
            RpcResponse::Success(result) => Some(result),
            RpcResponse::Error(error) => {
                tracing::debug!(
                    method = method.as_str(),
                    code = error.code,
                    message = %error.message,
                    "rpc error envelope"
                );
                self.report(error)
            }
            RpcResponse::Malformed(reason) => {
                tracing::debug!(method = method.as_str(), %reason, "ignoring malformed rpc response");
                None
            }
        }
    }

    /// Hand a locally raised error to the error handler.
    pub fn report(&self, error: RpcError) -> Option<Value> {
        self.error_handler.handle(&error)
    }
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn is_primitive(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
