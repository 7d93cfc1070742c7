//! The uniform response envelope.
//!
//! ```text
//! { "statusCode": 200, "body": { "return": <any>, "kernels": <any> } }
//! { "statusCode": 500, "body": { "error": <string> } }
//! ```
//!
//! Validation and engine failures share the same shape; only the message
//! tells them apart.

use crate::engine::EngineOutput;
use crate::error::QueryError;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    Result {
        #[serde(rename = "return")]
        result: serde_json::Value,
        kernels: serde_json::Value,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub body: Body,
}

impl Envelope {
    pub fn success(output: EngineOutput) -> Self {
        Self {
            status_code: STATUS_OK,
            body: Body::Result {
                result: output.result,
                kernels: output.kernels,
            },
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_ERROR,
            body: Body::Error {
                error: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, Body::Result { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            Body::Error { error } => Some(error),
            Body::Result { .. } => None,
        }
    }
}

/// Wraps a query outcome in the response envelope.
pub fn to_envelope(outcome: Result<EngineOutput, QueryError>) -> Envelope {
    match outcome {
        Ok(output) => Envelope::success(output),
        Err(e) => Envelope::failure(e.to_string()),
    }
}

impl From<Result<EngineOutput, QueryError>> for Envelope {
    fn from(outcome: Result<EngineOutput, QueryError>) -> Self {
        to_envelope(outcome)
    }
}
