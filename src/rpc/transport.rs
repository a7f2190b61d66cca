//! The transport seam between the RPC client and the network.

use async_trait::async_trait;

use crate::error::TransportError;

/// Delivers a request body to an endpoint and returns the raw response text.
///
/// Any `Err` is reported to the error handler as a transport failure.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        endpoint: &str,
        http_verb: &str,
        body: Option<String>,
    ) -> Result<String, TransportError>;
}
