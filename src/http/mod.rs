//! Bundled HTTP transport (`http` feature) with retry policies.

pub mod retry;
pub mod transport;

pub use retry::{RetryConfig, RetryPolicy};
pub use transport::HttpTransport;
