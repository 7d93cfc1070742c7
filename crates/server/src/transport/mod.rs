//! Transport layer for the ephemq server
//!
//! Available transports:
//! - `rpc` - tarpc-based RPC
//! - `http` - HTTP API, one route per operation (requires `http` feature)

pub mod rpc;

#[cfg(feature = "http")]
pub mod http;
