//! Network defaults for the defiads SDK.

use std::time::Duration;

/// Default JSON-RPC endpoint of a locally running defiads node.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:21867";

/// How long a cached category listing stays fresh.
pub const DEFAULT_LIST_CACHE_TTL: Duration = Duration::from_secs(60);

/// Store-key prefix for cached category listings.
pub const LIST_CACHE_PREFIX: &str = "defiadsAdsIn";

/// Store key of the cached category list.
pub const CATEGORIES_CACHE_KEY: &str = "defiadsCategories";
