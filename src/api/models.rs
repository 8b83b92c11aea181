// Wire types for the evaluation backend.
//
// The backend dictates every shape here: the upload response lists the
// accepted documents with their backend-assigned identifiers, the evaluate
// response returns the job id, and the status query returns the job state
// with an optional result or error. None of these records outlive a single
// submission flow.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ApiError;

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Which of the two submitted documents a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Cv,
    ProjectReport,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Cv => f.write_str("cv"),
            DocumentType::ProjectReport => f.write_str("project_report"),
        }
    }
}

/// Backend-issued identifier plus type tag for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentReference {
    pub document_id: String,
    pub document_type: DocumentType,
}

/// Success payload of the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub files: Vec<DocumentReference>,
}

/// The validated pair of references an evaluation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    pub cv: DocumentReference,
    pub project_report: DocumentReference,
}

impl UploadResponse {
    /// Extract exactly one `cv` and one `project_report` reference.
    ///
    /// The backend is not trusted to return a well-formed list: a missing or
    /// duplicated entry fails here with a descriptive error instead of
    /// letting an absent identifier reach the evaluate call.
    pub fn into_pair(self) -> Result<DocumentPair, ApiError> {
        let mut cv = None;
        let mut project_report = None;

        for file in self.files {
            let slot = match file.document_type {
                DocumentType::Cv => &mut cv,
                DocumentType::ProjectReport => &mut project_report,
            };
            if let Some(previous) = slot.replace(file) {
                return Err(ApiError::DuplicateDocument(previous.document_type));
            }
        }

        Ok(DocumentPair {
            cv: cv.ok_or(ApiError::MissingDocument(DocumentType::Cv))?,
            project_report: project_report
                .ok_or(ApiError::MissingDocument(DocumentType::ProjectReport))?,
        })
    }
}

// ---------------------------------------------------------------------------
// Evaluation trigger
// ---------------------------------------------------------------------------

/// Request body for the evaluate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluateRequest {
    pub job_title: String,
    pub cv_document_id: String,
    pub project_report_id: String,
}

/// Success payload of the evaluate endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateResponse {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Job state as reported by the status endpoint.
///
/// Statuses the backend may add later deserialize as `Unknown`, which is
/// non-terminal: the poller keeps querying until `completed` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One answer from the status endpoint. `result` is only meaningful when the
/// status is `completed`, `error` only when it is `failed`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<EvaluationResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The scored outcome of a completed evaluation.
///
/// `cv_match_rate` is a fraction in [0, 1]; `project_score` is on a 0-5
/// scale. Both are display-formatted by the result panel, never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationResult {
    pub cv_match_rate: f64,
    pub cv_feedback: String,
    pub project_score: f64,
    pub project_feedback: String,
    pub overall_summary: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
