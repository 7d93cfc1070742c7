//! Handler implementation for the ephemq service

use crate::protocol::EphemqService;
use ephemq::{
    Envelope, NormalizeConfig, Operation, QueryEngine, QueryError, RawParams, normalize_request,
    to_envelope,
};
use std::sync::Arc;
use tarpc::context;
use tracing::{error, info, warn};

/// Shared by every transport: normalize, then run the engine off the runtime.
#[derive(Clone)]
pub struct Handler {
    engine: Arc<dyn QueryEngine>,
    config: Arc<NormalizeConfig>,
}

impl Handler {
    pub fn new(engine: Arc<dyn QueryEngine>, config: NormalizeConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    pub async fn answer(&self, operation: Operation, params: RawParams) -> Envelope {
        let request = match normalize_request(operation, &params, &self.config) {
            Ok(request) => request,
            Err(e) => {
                warn!(%operation, "Rejected request: {}", e);
                return to_envelope(Err(e.into()));
            }
        };

        let engine = self.engine.clone();
        let outcome = tokio::task::spawn_blocking(move || engine.query(&request))
            .await
            .map_err(|e| QueryError::Engine(format!("Internal error: {}", e)))
            .and_then(|result| result.map_err(QueryError::from));

        match &outcome {
            Ok(_) => info!(%operation, "Answered"),
            Err(e) => error!(%operation, "Engine failed: {}", e),
        }
        to_envelope(outcome)
    }
}

impl EphemqService for Handler {
    async fn query(
        self,
        _: context::Context,
        operation: Operation,
        params: RawParams,
    ) -> Envelope {
        self.answer(operation, params).await
    }

    async fn operations(self, _: context::Context) -> Vec<Operation> {
        Operation::ALL.to_vec()
    }
}
