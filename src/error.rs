//! Crate-wide error type.
//!
//! Every fallible operation returns [`Result`]; failures are structured
//! values surfaced to the caller, never panics, and nothing here retries.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("operation applies to {expected} notes, got a {actual} note")]
    InvalidType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("attachment file missing: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("no API key configured")]
    MissingCredential,

    #[error("chat endpoint returned no choices")]
    EmptyResponse,

    #[error("could not parse chat response: {0}")]
    MalformedResponse(String),

    #[error("chat endpoint error: {0}")]
    RemoteApi(String),

    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, Duration),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
