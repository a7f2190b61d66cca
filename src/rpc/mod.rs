//! JSON-RPC client layer: envelopes, methods, transports and error handling.

pub mod client;
pub mod error_handler;
pub mod method;
pub mod transport;
pub mod wire;

pub use client::RpcClient;
pub use error_handler::{ErrorHandler, ErrorKind, LoggingErrorHandler, RpcError};
pub use method::{help, Method};
pub use transport::Transport;
pub use wire::{RpcRequest, RpcResponse};
