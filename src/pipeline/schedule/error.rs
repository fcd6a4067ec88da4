//! Error types for the schedule extraction pipeline.
//!
//! None of these escape `ScheduleExtractor::extract`: they exist so the
//! oracle boundary and the reply parser can use `?` internally, and so the
//! merge step can log why a producer contributed nothing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("External schedule oracle is not ready")]
    OracleUnavailable,

    #[error("External schedule oracle request failed: {0}")]
    OracleRequest(String),

    #[error("Malformed oracle reply: {0}")]
    MalformedReply(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        Self::JsonParsing(e.to_string())
    }
}
