//! Request normalization core for an ephemeris query service.
//!
//! ## Features
//! - **Lenient input**: every parameter may arrive as a native JSON value or as
//!   text (`"[1, 2]"`, `"smithed,reconstructed"`, `"true"`)
//! - **Time sequences**: explicit `ets`, or ranges by record count, by exposure
//!   duration, or segmented by duration
//! - **Fail fast**: a request is forwarded only after every field validates
//! - **Uniform envelope**: success and failure share one response shape
//!
//! The actual ephemeris computation is delegated to a [`QueryEngine`].
//!
//! ```rust
//! use ephemq::prelude::*;
//! use serde_json::json;
//!
//! struct Echo;
//!
//! impl QueryEngine for Echo {
//!     fn query(&self, request: &NormalizedRequest) -> std::result::Result<EngineOutput, EngineError> {
//!         Ok(EngineOutput {
//!             result: serde_json::to_value(&request.query).unwrap(),
//!             kernels: json!([]),
//!         })
//!     }
//! }
//!
//! let params = RawParams::from_query_pairs([
//!     ("target", "MOON"),
//!     ("observer", "EARTH"),
//!     ("frame", "J2000"),
//!     ("abcorr", "NONE"),
//!     ("startEts", "0"),
//!     ("stopEts", "10"),
//!     ("exposureDuration", "3"),
//! ])?;
//!
//! let envelope = answer(&Echo, Operation::GetTargetStates, &params, &NormalizeConfig::default());
//! assert_eq!(envelope.status_code, 200);
//!
//! // Missing target: the engine is never asked.
//! let envelope = answer(&Echo, Operation::GetTargetStates, &RawParams::default(), &NormalizeConfig::default());
//! assert_eq!(envelope.status_code, 500);
//! # Ok::<(), ephemq::ValidationError>(())
//! ```

pub mod compute;
pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod request;

pub use config::{Config, EngineConfig, NormalizeConfig};
pub use engine::{CommandEngine, EngineError, EngineOutput, QueryEngine, run_query};
pub use envelope::{Body, Envelope, to_envelope};
pub use error::{QueryError, Result, ValidationError};
pub use request::{NormalizedRequest, Operation, Query, RawParams, normalize_request};

pub use ephemq_types::kernel::KernelSearchOptions;
pub use ephemq_types::raw::RawValue;
pub use ephemq_types::time::TimeSpec;

// Re-export normalization utilities
pub use compute::validation;
pub use compute::{derive_times, normalize_list};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Answers one request end to end: normalize, query the engine, wrap.
pub fn answer<E: QueryEngine + ?Sized>(
    engine: &E,
    operation: Operation,
    params: &RawParams,
    config: &NormalizeConfig,
) -> Envelope {
    let outcome = run_query(engine, operation, params, config);
    match &outcome {
        Ok(_) => log::debug!("{} answered", operation),
        Err(e) => log::info!("{} failed: {}", operation, e),
    }
    to_envelope(outcome)
}

/// Common imports
pub mod prelude {

    pub use crate::{QueryError, Result, ValidationError};

    pub use crate::{NormalizedRequest, Operation, Query, RawParams, normalize_request};

    pub use crate::{CommandEngine, EngineError, EngineOutput, QueryEngine, answer};

    pub use crate::{Envelope, to_envelope};

    pub use crate::{Config, EngineConfig, NormalizeConfig};

    pub use crate::{KernelSearchOptions, RawValue, TimeSpec};
}
