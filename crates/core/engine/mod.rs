//! The seam to the external query engine.
//!
//! The engine owns all spatial and temporal computation and kernel
//! selection. This crate only hands it a [`NormalizedRequest`] and forwards
//! whatever it answers.

mod command;

pub use command::CommandEngine;

use crate::config::NormalizeConfig;
use crate::error::{QueryError, Result};
use crate::request::{NormalizedRequest, Operation, RawParams, normalize_request};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the engine returns for a successful query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    #[serde(rename = "return")]
    pub result: serde_json::Value,
    /// Provenance: the kernels the engine used.
    #[serde(default)]
    pub kernels: serde_json::Value,
}

/// A failure raised by the engine, carried verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl From<EngineError> for QueryError {
    fn from(e: EngineError) -> Self {
        QueryError::Engine(e.0)
    }
}

/// A blocking, out-of-process query engine.
///
/// Implementations must be safe to call from several requests at once.
pub trait QueryEngine: Send + Sync {
    fn query(&self, request: &NormalizedRequest) -> std::result::Result<EngineOutput, EngineError>;
}

impl<E: QueryEngine + ?Sized> QueryEngine for std::sync::Arc<E> {
    fn query(&self, request: &NormalizedRequest) -> std::result::Result<EngineOutput, EngineError> {
        (**self).query(request)
    }
}

/// Normalizes `params` and, only if that succeeds, asks the engine.
pub fn run_query<E: QueryEngine + ?Sized>(
    engine: &E,
    operation: Operation,
    params: &RawParams,
    config: &NormalizeConfig,
) -> Result<EngineOutput> {
    let request = normalize_request(operation, params, config)?;
    let output = engine.query(&request)?;
    Ok(output)
}
