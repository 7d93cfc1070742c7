//! ephemq server
//!
//! Serves ephemeris queries over the network. Raw parameters are normalized
//! here and handed to a [`QueryEngine`](ephemq::QueryEngine); the answer goes
//! back in the uniform envelope.
//!
//! # Transports
//!
//! - **RPC**: tarpc-based transport
//! - **HTTP** (default feature `http`): one route per operation, GET and POST
//!
//! # Example
//!
//! ```ignore
//! use ephemq_server::{Handler, run_server};
//!
//! let handler = Handler::new(Arc::new(engine), NormalizeConfig::default());
//! run_server(listener, handler, shutdown).await?;
//! ```

pub mod handler;
pub mod protocol;
pub mod transport;

pub use handler::Handler;

// Re-export protocol types for client usage
pub use protocol::{EphemqService, EphemqServiceClient};

// Re-export default transport for convenience
pub use transport::rpc::run_server;
