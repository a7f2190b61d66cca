//! High-level client: `DefiadsClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::cache::{KeyValueStore, MemoryStore, SingleFlight, TtlCache};
use crate::domain::ad::client::Ads;
use crate::domain::ad::ListItem;
use crate::domain::prepared::client::Publisher;
use crate::domain::release::client::Releases;
use crate::domain::wallet::client::Wallet;
use crate::error::SdkError;
use crate::network::{CATEGORIES_CACHE_KEY, DEFAULT_ENDPOINT, DEFAULT_LIST_CACHE_TTL, LIST_CACHE_PREFIX};
use crate::rpc::{ErrorHandler, LoggingErrorHandler, RpcClient, Transport};

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::ad::client::Ads as AdsClient;
pub use crate::domain::prepared::client::Publisher as PublisherClient;
pub use crate::domain::release::client::Releases as ReleasesClient;
pub use crate::domain::wallet::client::{UnlockedWallet, Wallet as WalletClient};

/// The primary entry point for the defiads SDK.
///
/// Provides nested sub-client accessors mirroring the node's methods:
/// `client.ads()`, `client.publisher()`, `client.wallet()`, `client.releases()`.
/// Every remote call returns `Option`; failures are delivered to the
/// configured error handler.
pub struct DefiadsClient {
    pub(crate) rpc: RpcClient,
    pub(crate) store: Arc<dyn KeyValueStore>,
    /// Category listings: `defiadsAdsIn<category>` → JSON list,
    /// plus the category names under `defiadsCategories`
    pub(crate) list_cache: TtlCache,
    pub(crate) list_flights: Arc<SingleFlight<Option<Vec<ListItem>>>>,
    pub(crate) category_flights: Arc<SingleFlight<Option<Vec<String>>>>,
}

impl DefiadsClient {
    pub fn builder() -> DefiadsClientBuilder {
        DefiadsClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn ads(&self) -> Ads<'_> {
        Ads { client: self }
    }

    pub fn publisher(&self) -> Publisher<'_> {
        Publisher { client: self }
    }

    pub fn wallet(&self) -> Wallet<'_> {
        Wallet { client: self }
    }

    pub fn releases(&self) -> Releases<'_> {
        Releases { client: self }
    }

    // ── Misc ─────────────────────────────────────────────────────────────

    /// Static command reference.
    pub fn help(&self) -> Value {
        crate::rpc::help()
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Drop the cached listing of one category.
    pub fn invalidate_listing(&self, category: &str) {
        self.store
            .delete(&format!("{}{}", LIST_CACHE_PREFIX, category));
    }

    /// Drop the cached category names.
    pub fn invalidate_categories(&self) {
        self.store.delete(CATEGORIES_CACHE_KEY);
    }
}

impl Clone for DefiadsClient {
    fn clone(&self) -> Self {
        Self {
            rpc: self.rpc.clone(),
            store: self.store.clone(),
            list_cache: self.list_cache.clone(),
            list_flights: self.list_flights.clone(),
            category_flights: self.category_flights.clone(),
        }
    }
}

impl fmt::Debug for DefiadsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefiadsClient")
            .field("rpc", &self.rpc)
            .field("list_cache_ttl", &self.list_cache.ttl())
            .finish_non_exhaustive()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DefiadsClientBuilder {
    endpoint: String,
    api_key: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    error_handler: Arc<dyn ErrorHandler>,
    store: Option<Arc<dyn KeyValueStore>>,
    list_cache_ttl: Duration,
}

impl Default for DefiadsClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            transport: None,
            error_handler: Arc::new(LoggingErrorHandler),
            store: None,
            list_cache_ttl: DEFAULT_LIST_CACHE_TTL,
        }
    }
}

impl DefiadsClientBuilder {
    pub fn endpoint(mut self, url: &str) -> Self {
        self.endpoint = url.to_string();
        self
    }

    /// Required.
    pub fn api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Defaults to the bundled HTTP transport when the `http` feature is on.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = handler;
        self
    }

    /// Backing store for cached listings. Defaults to a fresh in-memory store.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn list_cache_ttl(mut self, ttl: Duration) -> Self {
        self.list_cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<DefiadsClient, SdkError> {
        let api_key = self
            .api_key
            .ok_or_else(|| SdkError::Config("an API key is required".into()))?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        Ok(DefiadsClient {
            rpc: RpcClient::new(self.endpoint, api_key, transport, self.error_handler),
            list_cache: TtlCache::new(store.clone(), self.list_cache_ttl),
            store,
            list_flights: Arc::new(SingleFlight::new()),
            category_flights: Arc::new(SingleFlight::new()),
        })
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Result<Arc<dyn Transport>, SdkError> {
    let transport = crate::http::HttpTransport::new().map_err(crate::error::TransportError::from)?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<Arc<dyn Transport>, SdkError> {
    Err(SdkError::Config(
        "no transport configured and the `http` feature is disabled".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _: &str, _: &str, _: Option<String>) -> Result<String, TransportError> {
            Err(TransportError::Failed("unreachable".into()))
        }
    }

    #[test]
    fn api_key_is_required() {
        let err = DefiadsClient::builder()
            .transport(Arc::new(Unreachable))
            .build()
            .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn defaults_to_local_endpoint() {
        let client = DefiadsClient::builder()
            .api_key("k")
            .transport(Arc::new(Unreachable))
            .build()
            .unwrap();
        assert_eq!(client.rpc().endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(client.list_cache.ttl(), DEFAULT_LIST_CACHE_TTL);
    }

    #[test]
    fn invalidate_listing_removes_cached_category() {
        let client = DefiadsClient::builder()
            .api_key("k")
            .transport(Arc::new(Unreachable))
            .build()
            .unwrap();
        client.store().set("defiadsAdsInbikes", "[]");
        client.invalidate_listing("bikes");
        assert_eq!(client.store().get("defiadsAdsInbikes"), None);

        client.store().set("defiadsCategories", "[]");
        client.invalidate_categories();
        assert_eq!(client.store().get("defiadsCategories"), None);
    }

    #[test]
    fn build_fails_only_on_configuration_or_transport() {
        let describe = |err: &SdkError| match err {
            SdkError::Config(_) => "config",
            SdkError::Transport(_) => "transport",
        };
        let err = DefiadsClient::builder().build().unwrap_err();
        assert_eq!(describe(&err), "config");
        let err = SdkError::from(TransportError::Failed("no client".into()));
        assert_eq!(describe(&err), "transport");
    }
}
