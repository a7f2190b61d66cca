//! Wallet sub-client: deposit address, balance, passphrase-scoped spending.

use crate::client::DefiadsClient;
use crate::domain::wallet::{balance_from_value, Balance, MIN_FUND_SAT};
use crate::domain::{accept, shaped};
use crate::rpc::{Method, RpcError};
use crate::shared::DefiadId;
use serde_json::Value;
use zeroize::Zeroize;

/// Sub-client for wallet reads.
pub struct Wallet<'a> {
    pub(crate) client: &'a DefiadsClient,
}

impl<'a> Wallet<'a> {
    /// A fresh deposit address.
    pub async fn deposit(&self) -> Option<String> {
        let value = self.client.rpc.call(Method::Deposit, Vec::new()).await?;
        accept(Method::Deposit, shaped(value, "string address"))
    }

    pub async fn balance(&self) -> Option<Balance> {
        let value = self.client.rpc.call(Method::Balance, Vec::new()).await?;
        accept(Method::Balance, balance_from_value(value))
    }

    /// Scope spending calls to a wallet passphrase.
    pub fn unlock(&self, passphrase: impl Into<String>) -> UnlockedWallet<'a> {
        UnlockedWallet {
            client: self.client,
            passphrase: passphrase.into(),
        }
    }
}

/// Spending calls. The passphrase is sent as the first param of each call.
pub struct UnlockedWallet<'a> {
    client: &'a DefiadsClient,
    passphrase: String,
}

impl<'a> UnlockedWallet<'a> {
    /// Withdraw to `destination`. Without an amount the node sends everything
    /// available. Returns the transaction id.
    pub async fn withdraw(
        &self,
        destination: &str,
        fee_rate: u64,
        amount_sat: Option<u64>,
    ) -> Option<String> {
        let mut params = vec![Value::from(destination), Value::from(fee_rate)];
        if let Some(amount) = amount_sat {
            if self.below_minimum(amount) {
                return None;
            }
            params.push(Value::from(amount));
        }
        self.spend(Method::Withdraw, params).await
    }

    /// Fund a prepared ad and publish it for `term` blocks. Returns the
    /// transaction id.
    pub async fn fund(
        &self,
        id: &DefiadId,
        amount_sat: u64,
        term: u64,
        fee_rate: u64,
    ) -> Option<String> {
        if self.below_minimum(amount_sat) {
            return None;
        }
        let params = vec![
            Value::from(id.as_str()),
            Value::from(amount_sat),
            Value::from(term),
            Value::from(fee_rate),
        ];
        self.spend(Method::Fund, params).await
    }

    /// Reports `-4` for amounts under [`MIN_FUND_SAT`].
    fn below_minimum(&self, amount_sat: u64) -> bool {
        if amount_sat >= MIN_FUND_SAT {
            return false;
        }
        self.client.rpc.report(RpcError::new(
            RpcError::AMOUNT_BELOW_MINIMUM,
            format!("Minimum amount is {} sat", MIN_FUND_SAT),
        ));
        true
    }

    async fn spend(&self, method: Method, params: Vec<Value>) -> Option<String> {
        let mut full = Vec::with_capacity(params.len() + 1);
        full.push(Value::from(self.passphrase.as_str()));
        full.extend(params);
        let value = self.client.rpc.call(method, full).await?;
        accept(method, shaped(value, "string transaction id"))
    }
}

impl Drop for UnlockedWallet<'_> {
    fn drop(&mut self) {
        self.passphrase.zeroize();
    }
}
