//! # defiads SDK
//!
//! Rust client for a defiads node: JSON-RPC calls over a pluggable transport,
//! plus signing and verification of ad content with P-384 keys.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Types, domain models, error types (no I/O)
//! 2. **Crypto**: JWK-style key material, canonical signing context, ECDSA
//! 3. **Authenticity**: Metadata embedded in ads, trust levels, release scan
//! 4. **RPC**: Envelope codec, `Transport` seam, error handler
//! 5. **HTTP**: `HttpTransport` on reqwest with retry policies
//! 6. **High-Level Client**: `DefiadsClient` with nested sub-clients and caching
//! 7. **Session**: Lazily built client and credentials for interactive front ends
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use defiads_sdk::prelude::*;
//!
//! let client = DefiadsClient::builder()
//!     .endpoint("http://127.0.0.1:21867")
//!     .api_key("my-api-key")
//!     .build()?;
//!
//! let listing = client.ads().list_cached("bikes").await;
//! let ads = client.ads().read_verified(&DefiadId::new("ad1")).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Endpoint and cache constants.
pub mod network;

// ── Layer 2: Crypto ──────────────────────────────────────────────────────────

/// Key material: generation, serialization, import.
pub mod keys;

/// Canonical signing context and ECDSA P-384 sign/verify.
pub mod signing;

// ── Layer 3: Authenticity ────────────────────────────────────────────────────

/// Signature blocks embedded in ad content.
pub mod authenticity;

// ── Layer 4: RPC ─────────────────────────────────────────────────────────────

/// JSON-RPC envelopes, methods, transport seam, error handling.
pub mod rpc;

/// Key-value stores, TTL cache, request coalescing.
pub mod cache;

// ── Layer 5: HTTP ────────────────────────────────────────────────────────────

/// HTTP transport with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 6: High-Level Client ───────────────────────────────────────────────

/// `DefiadsClient`, the primary entry point.
pub mod client;

// ── Layer 7: Session ─────────────────────────────────────────────────────────

pub mod session;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::DefiadId;

    // Domain types
    pub use crate::domain::ad::{Ad, ListItem};
    pub use crate::domain::prepared::PreparedAd;
    pub use crate::domain::wallet::{format_bitcoin_amount, Balance, MIN_FUND_SAT};

    // Errors
    pub use crate::error::{KeyError, SdkError, SigningError};

    // Network
    pub use crate::network::DEFAULT_ENDPOINT;

    // Keys + authenticity
    pub use crate::authenticity::{
        extract_metadata, scan_for_update, sign_prepared, Metadata, ReleaseCandidate, TrustLevel,
        WithMetadata,
    };
    pub use crate::keys::{KeyMaterial, KeyPair};

    // RPC
    pub use crate::rpc::{ErrorHandler, ErrorKind, LoggingErrorHandler, Method, RpcError, Transport};

    // Caching
    pub use crate::cache::{KeyValueStore, LayeredStore, MemoryStore};

    // Client + sub-clients
    pub use crate::client::{
        AdsClient, DefiadsClient, DefiadsClientBuilder, PublisherClient, ReleasesClient,
        UnlockedWallet, WalletClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::{HttpTransport, RetryConfig, RetryPolicy};

    // Session
    pub use crate::session::{ObtainedValue, Session, ValueRequest, ValueSource, Var};
}
