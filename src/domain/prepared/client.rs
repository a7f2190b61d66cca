//! Publisher sub-client: stage, list and read prepared ads.

use crate::authenticity::sign_prepared;
use crate::client::DefiadsClient;
use crate::domain::prepared::{prepared_from_value, PreparedAd};
use crate::domain::{accept, shaped};
use crate::keys::KeyMaterial;
use crate::rpc::{Method, RpcError};
use crate::shared::DefiadId;
use serde_json::Value;

/// Sub-client for publishing.
pub struct Publisher<'a> {
    pub(crate) client: &'a DefiadsClient,
}

impl<'a> Publisher<'a> {
    /// Stage an ad on the node. Returns the assigned id.
    pub async fn prepare(&self, prepared: &PreparedAd) -> Option<DefiadId> {
        let value = self
            .client
            .rpc
            .call(Method::Prepare, prepared.to_params())
            .await?;
        accept(Method::Prepare, shaped(value, "string id"))
    }

    /// Ids of all staged ads.
    pub async fn list_prepared(&self) -> Option<Vec<DefiadId>> {
        let value = self.client.rpc.call(Method::ListPrepared, Vec::new()).await?;
        accept(Method::ListPrepared, shaped(value, "array of string ids"))
    }

    pub async fn read_prepared(&self, id: &DefiadId) -> Option<PreparedAd> {
        let value = self
            .client
            .rpc
            .call(Method::ReadPrepared, vec![Value::from(id.as_str())])
            .await?;
        accept(Method::ReadPrepared, prepared_from_value(value))
    }

    /// Sign an ad with `key` and stage it.
    ///
    /// Signing failures are reported to the error handler as crypto failures
    /// and nothing is sent to the node.
    pub async fn prepare_signed(
        &self,
        prepared: &PreparedAd,
        key: &KeyMaterial,
        link: Option<&str>,
    ) -> Option<DefiadId> {
        match sign_prepared(prepared, key, link) {
            Ok(signed) => self.prepare(&signed).await,
            Err(err) => {
                tracing::warn!(error = %err, "refusing to stage ad that could not be signed");
                self.client
                    .rpc
                    .report(RpcError::new(RpcError::CRYPTO_FAILURE, err.to_string()));
                None
            }
        }
    }
}
