//! HTTP transport for the ephemq server
//!
//! Every operation is served at `/<operationName>`. `GET` reads query-string
//! parameters, `POST` reads a JSON object body. Both always answer HTTP 200;
//! the outcome is in the envelope's `statusCode`.
//!
//! ```text
//! GET  /utcToEt?utc=2016-11-26T22:32:14.582000
//! POST /getTargetStates  {"target": "MOON", "ets": [0, 10], ...}
//! ```

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use ephemq::{Envelope, Operation, RawParams, ValidationError, to_envelope};
use tracing::{info, warn};

use crate::handler::Handler;

/// Builds the router with one GET/POST route per operation.
pub fn router(handler: Handler) -> Router {
    let mut router = Router::new().route("/", get(list_operations));

    for operation in Operation::ALL {
        router = router.route(
            &operation.path(),
            get(
                move |State(handler): State<Handler>,
                      Query(pairs): Query<Vec<(String, String)>>| async move {
                    Json(answer(&handler, operation, RawParams::from_query_pairs(pairs)).await)
                },
            )
            .post(
                move |State(handler): State<Handler>,
                      body: Result<Json<serde_json::Value>, JsonRejection>| async move {
                    let params = body
                        .map_err(|e| ValidationError::Parse(format!("malformed request body: {}", e)))
                        .and_then(|Json(value)| RawParams::from_json(value));
                    Json(answer(&handler, operation, params).await)
                },
            ),
        );
    }

    router.with_state(handler)
}

async fn answer(
    handler: &Handler,
    operation: Operation,
    params: Result<RawParams, ValidationError>,
) -> Envelope {
    match params {
        Ok(params) => handler.answer(operation, params).await,
        Err(e) => {
            warn!(%operation, "Rejected request: {}", e);
            to_envelope(Err(e.into()))
        }
    }
}

async fn list_operations() -> Json<Vec<Operation>> {
    Json(Operation::ALL.to_vec())
}

/// Run the HTTP server until `shutdown` resolves.
pub async fn run_server(
    listener: tokio::net::TcpListener,
    handler: Handler,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("ephemq HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
