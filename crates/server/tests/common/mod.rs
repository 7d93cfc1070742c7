use ephemq::{
    EngineError, EngineOutput, NormalizeConfig, NormalizedRequest, Query, QueryEngine,
};
use ephemq_server::Handler;
use serde_json::json;
use std::sync::Arc;

/// Echoes the normalized request back as the result.
///
/// `translateNameToCode` with frame `NOWHERE` fails the way a real engine
/// does for an unknown name.
pub struct EchoEngine;

impl QueryEngine for EchoEngine {
    fn query(&self, request: &NormalizedRequest) -> Result<EngineOutput, EngineError> {
        if let Query::TranslateNameToCode { frame, .. } = &request.query {
            if frame == "NOWHERE" {
                return Err(EngineError(
                    "SPICE(NOTRANSLATION): no code for NOWHERE".to_string(),
                ));
            }
        }

        Ok(EngineOutput {
            result: serde_json::to_value(request).map_err(|e| EngineError(e.to_string()))?,
            kernels: json!({ "lsk": ["naif0012.tls"] }),
        })
    }
}

pub fn handler() -> Handler {
    Handler::new(Arc::new(EchoEngine), NormalizeConfig::default())
}
