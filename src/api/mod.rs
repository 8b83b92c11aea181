// Backend API surface: typed wire models and the HTTP client for the
// three evaluation endpoints (document upload, evaluation trigger, job
// status query).

pub mod client;
pub mod models;

pub use client::BackendClient;

use std::path::PathBuf;

use thiserror::Error;

use self::models::DocumentType;

/// Errors produced by the backend API layer.
///
/// `Status` carries the HTTP status so callers can compose the user-facing
/// banner; everything else surfaces through its Display text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },

    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        source: reqwest::Error,
    },

    #[error("could not read {label} file {path}: {source}")]
    FileRead {
        label: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("upload response has no {0} entry")]
    MissingDocument(DocumentType),

    #[error("upload response has more than one {0} entry")]
    DuplicateDocument(DocumentType),
}

impl ApiError {
    /// The HTTP status for rejected requests, `None` for every other failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
