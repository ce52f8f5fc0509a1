//! Error types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a weather fetch produced no reading.
///
/// Carried inside actions, so it holds rendered messages rather than the
/// underlying `reqwest`/`serde_json` errors.
#[derive(Error, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("response is missing field `{0}`")]
    MissingField(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("location registry is empty")]
    Empty,

    #[error("duplicate location name: {0}")]
    DuplicateName(String),
}
