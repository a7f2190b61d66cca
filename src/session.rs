//! Session: lazily built client and credentials for an interactive front end.
//!
//! Configuration values (endpoint, API key, passphrase, signing key, link)
//! are looked up in the store first and otherwise requested from a
//! [`ValueSource`], e.g. a prompt. The client is built on first use and
//! rebuilt after [`Session::invalidate`]. Errors reported by that client pass
//! through the session's error policy before reaching the configured handler.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::{Arc, Weak};

use crate::cache::{KeyValueStore, SingleFlight};
use crate::client::DefiadsClient;
use crate::keys::{decode, encode, generate_key_pair, import_signing_key, is_private, KeyMaterial};
use crate::network::DEFAULT_ENDPOINT;
use crate::rpc::{ErrorHandler, ErrorKind, RpcError, Transport};

/// Store key of the transaction id log.
const TX_LOG_KEY: &str = "txIds";

// ─── Variables ───────────────────────────────────────────────────────────────

/// A configuration value the session may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Var {
    Endpoint,
    ApiKey,
    Passphrase,
    PrivateKey,
    /// Offer a freshly generated private key for safekeeping.
    ShowPrivateKey,
    Link,
}

impl Var {
    /// Store key. `ShowPrivateKey` shares the key of `PrivateKey`.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Var::Endpoint => "endpoint",
            Var::ApiKey => "apiKey",
            Var::Passphrase => "passphrase",
            Var::PrivateKey | Var::ShowPrivateKey => "privateKey",
            Var::Link => "link",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Var::Endpoint => "Configure defiads endpoint",
            Var::ApiKey => "Enter API key",
            Var::Passphrase => "Please unlock wallet",
            Var::PrivateKey => "Provide private key for signing",
            Var::ShowPrivateKey => "Please save your newly generated private key",
            Var::Link => "Enter link to release notes",
        }
    }

    /// Whether the value may be persisted beyond the session.
    pub fn allows_storage(&self) -> bool {
        !matches!(self, Var::Passphrase | Var::Link)
    }

    /// Whether persisting should be offered as the default choice.
    pub fn remember_by_default(&self) -> bool {
        matches!(self, Var::Endpoint | Var::ApiKey)
    }

    /// Secret values should not be echoed.
    pub fn is_secret(&self) -> bool {
        matches!(self, Var::Passphrase | Var::PrivateKey)
    }
}

/// What the session asks a [`ValueSource`] for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueRequest {
    pub var: Var,
    /// Pre-filled value (the default endpoint, a generated key).
    pub suggested: Option<String>,
    pub allow_remember: bool,
    pub remember_by_default: bool,
}

impl ValueRequest {
    pub fn new(var: Var, suggested: Option<String>) -> Self {
        Self {
            var,
            suggested,
            allow_remember: var.allows_storage(),
            remember_by_default: var.remember_by_default(),
        }
    }
}

/// A value supplied by a [`ValueSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObtainedValue {
    pub value: String,
    /// Persist the value beyond the session, where the variable allows it.
    pub remember: bool,
}

/// Supplies configuration values on demand. `None` means the user declined.
#[async_trait]
pub trait ValueSource: Send + Sync {
    async fn obtain(&self, request: ValueRequest) -> Option<ObtainedValue>;
}

// ─── Session ─────────────────────────────────────────────────────────────────

struct SessionState {
    store: Arc<dyn KeyValueStore>,
    client: RwLock<Option<DefiadsClient>>,
}

impl SessionState {
    fn invalidate(&self) {
        *self.client.write() = None;
    }

    fn apply(&self, error: &RpcError) -> ErrorKind {
        let kind = error.kind();
        match kind {
            ErrorKind::TransportFailure => self.invalidate(),
            ErrorKind::InvalidApiKey => {
                self.store.delete(Var::ApiKey.storage_key());
                self.invalidate();
            }
            ErrorKind::BadPassphrase => {
                self.store.delete(Var::Passphrase.storage_key());
            }
            _ => {}
        }
        tracing::debug!(code = error.code, ?kind, "applied session error policy");
        kind
    }
}

/// Applies the session policy, then delegates to the user's handler.
struct PolicyHandler {
    state: Weak<SessionState>,
    inner: Arc<dyn ErrorHandler>,
}

impl ErrorHandler for PolicyHandler {
    fn handle(&self, error: &RpcError) -> Option<Value> {
        if let Some(state) = self.state.upgrade() {
            state.apply(error);
        }
        self.inner.handle(error)
    }
}

/// Owns the lazily-built client and the credentials it needs.
pub struct Session {
    state: Arc<SessionState>,
    source: Arc<dyn ValueSource>,
    transport: Arc<dyn Transport>,
    error_handler: Arc<dyn ErrorHandler>,
    client_init: SingleFlight<Option<DefiadsClient>>,
    private_key: RwLock<Option<KeyMaterial>>,
    key_init: SingleFlight<Option<KeyMaterial>>,
}

impl Session {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn ValueSource>,
        transport: Arc<dyn Transport>,
        error_handler: Arc<dyn ErrorHandler>,
    ) -> Self {
        Self {
            state: Arc::new(SessionState {
                store,
                client: RwLock::new(None),
            }),
            source,
            transport,
            error_handler,
            client_init: SingleFlight::new(),
            private_key: RwLock::new(None),
            key_init: SingleFlight::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.state.store
    }

    /// The session's client, built on first use from the `endpoint` and
    /// `apiKey` variables. Concurrent first calls build it once.
    pub async fn client(&self) -> Option<DefiadsClient> {
        if let Some(client) = self.state.client.read().clone() {
            return Some(client);
        }
        let session = self;
        self.client_init
            .run("client", move || async move { session.build_client().await })
            .await
    }

    async fn build_client(&self) -> Option<DefiadsClient> {
        if let Some(client) = self.state.client.read().clone() {
            return Some(client);
        }

        let endpoint = self.obtain(Var::Endpoint).await?;
        let api_key = self.obtain(Var::ApiKey).await?;
        let handler = PolicyHandler {
            state: Arc::downgrade(&self.state),
            inner: self.error_handler.clone(),
        };

        let built = DefiadsClient::builder()
            .endpoint(&endpoint)
            .api_key(&api_key)
            .transport(self.transport.clone())
            .error_handler(Arc::new(handler))
            .store(self.state.store.clone())
            .build();
        match built {
            Ok(client) => {
                tracing::debug!(endpoint = %endpoint, "session client ready");
                *self.state.client.write() = Some(client.clone());
                Some(client)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not build session client");
                None
            }
        }
    }

    /// Drop the cached client; the next [`Session::client`] rebuilds it.
    pub fn invalidate(&self) {
        self.state.invalidate();
    }

    /// Delete a stored variable from every store layer.
    pub fn forget(&self, var: Var) {
        self.state.store.delete(var.storage_key());
        if matches!(var, Var::PrivateKey | Var::ShowPrivateKey) {
            *self.private_key.write() = None;
        }
    }

    /// React to an error: a transport failure drops the client, an invalid
    /// API key is forgotten and drops the client, a wrong passphrase is
    /// forgotten. Clients built by the session apply this automatically.
    pub fn apply_error_policy(&self, error: &RpcError) -> ErrorKind {
        self.state.apply(error)
    }

    /// Value of `var` from the store, otherwise from the value source.
    ///
    /// Obtained values are kept for the session and persisted when the
    /// source asks to remember them and the variable allows it.
    pub async fn obtain(&self, var: Var) -> Option<String> {
        if let Some(value) = self.state.store.get(var.storage_key()) {
            return Some(value);
        }
        let suggested = match var {
            Var::Endpoint => Some(DEFAULT_ENDPOINT.to_string()),
            _ => None,
        };
        let obtained = self.source.obtain(ValueRequest::new(var, suggested)).await?;
        self.keep(var, &obtained);
        Some(obtained.value)
    }

    fn keep(&self, var: Var, obtained: &ObtainedValue) {
        let key = var.storage_key();
        self.state.store.set(key, &obtained.value);
        if obtained.remember && var.allows_storage() && !self.state.store.persist(key, &obtained.value)
        {
            tracing::warn!(key, "could not persist value");
        }
    }

    pub async fn passphrase(&self) -> Option<String> {
        self.obtain(Var::Passphrase).await
    }

    /// Link for the next signed ad. Asked for every time; empty means none.
    pub async fn link(&self) -> Option<String> {
        self.state.store.delete(Var::Link.storage_key());
        self.obtain(Var::Link).await.filter(|link| !link.is_empty())
    }

    /// The signing key: stored or supplied if valid, otherwise freshly
    /// generated and offered to the value source for safekeeping.
    pub async fn private_key(&self) -> Option<KeyMaterial> {
        if let Some(key) = self.private_key.read().clone() {
            return Some(key);
        }
        let session = self;
        self.key_init
            .run("privateKey", move || async move { session.load_private_key().await })
            .await
    }

    async fn load_private_key(&self) -> Option<KeyMaterial> {
        if let Some(key) = self.private_key.read().clone() {
            return Some(key);
        }

        let key = match self.existing_private_key().await {
            Some(key) => key,
            None => self.generate_private_key().await?,
        };
        *self.private_key.write() = Some(key.clone());
        Some(key)
    }

    async fn existing_private_key(&self) -> Option<KeyMaterial> {
        let var = Var::PrivateKey;
        if let Some(key) = self.state.store.get(var.storage_key()).and_then(|s| parse_private(&s)) {
            return Some(key);
        }
        let obtained = self.source.obtain(ValueRequest::new(var, None)).await?;
        let key = parse_private(&obtained.value)?;
        self.keep(var, &obtained);
        Some(key)
    }

    async fn generate_private_key(&self) -> Option<KeyMaterial> {
        let pair = match generate_key_pair() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "could not generate signing key");
                return None;
            }
        };
        let encoded = encode(&pair.private)?;
        tracing::debug!("generated new signing key");

        let request = ValueRequest::new(Var::ShowPrivateKey, Some(encoded.clone()));
        if let Some(ack) = self.source.obtain(request).await {
            self.keep(
                Var::ShowPrivateKey,
                &ObtainedValue {
                    value: encoded,
                    remember: ack.remember,
                },
            );
        }
        Some(pair.private)
    }

    /// Append a transaction id to the persisted log.
    pub fn record_transaction(&self, tx_id: &str) {
        let store = &self.state.store;
        let mut log = store.get(TX_LOG_KEY).unwrap_or_default();
        log.push_str(tx_id);
        log.push('\n');
        store.set(TX_LOG_KEY, &log);
        if !store.persist(TX_LOG_KEY, &log) {
            tracing::warn!(tx_id, "could not persist transaction log");
        }
    }

    /// Logged transaction ids, oldest first.
    pub fn transactions(&self) -> Vec<String> {
        self.state
            .store
            .get(TX_LOG_KEY)
            .unwrap_or_default()
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_private(text: &str) -> Option<KeyMaterial> {
    let key = decode(text)?;
    if !is_private(&key) {
        return None;
    }
    match import_signing_key(&key) {
        Ok(_) => Some(key),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unusable private key");
            None
        }
    }
}
