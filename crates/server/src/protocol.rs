//! Protocol definitions for ephemq RPC
//!
//! Requests travel in their raw shape; normalization happens on the server so
//! RPC and HTTP callers get identical validation.

use ephemq::{Envelope, Operation, RawParams};

#[tarpc::service]
pub trait EphemqService {
    /// Answers one operation. Failures are carried inside the envelope.
    async fn query(operation: Operation, params: RawParams) -> Envelope;

    /// Operations this server answers.
    async fn operations() -> Vec<Operation>;
}
