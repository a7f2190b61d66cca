//! Request de-duplication, TTL memoization, and the key-value store seam.

pub mod single_flight;
pub mod store;
pub mod ttl;

pub use single_flight::SingleFlight;
pub use store::{KeyValueStore, LayeredStore, MemoryStore};
pub use ttl::TtlCache;
