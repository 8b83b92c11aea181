// User-facing failure taxonomy for the submission/evaluation flow.
//
// Every failure in the flow collapses to one banner string plus a transition
// to the error state; the Display impls here ARE those banner strings, so
// wording changes happen in exactly one place. Underlying detail goes to the
// tracing log, never to the banner.

use thiserror::Error;

use crate::api::ApiError;

/// Fallback banner for a failed job that carries no error message.
pub const UNKNOWN_EVALUATION_ERROR: &str = "An unknown evaluation error occurred.";

#[derive(Debug, Error)]
pub enum FlowError {
    /// One or both documents were never selected. Raised before any network
    /// call happens.
    #[error("Please select both CV and Project Report files.")]
    MissingSelection,

    /// The upload request was answered with a non-success status.
    #[error("File upload failed with status: {0}")]
    SubmissionRejected(u16),

    /// The upload request failed before a status was available (transport,
    /// file read, undecodable or malformed response).
    #[error("File upload failed: {0}")]
    SubmissionFailed(#[source] ApiError),

    /// The evaluate request was answered with a non-success status.
    #[error("Evaluation trigger failed with status: {0}")]
    TriggerRejected(u16),

    /// The evaluate request failed before a status was available.
    #[error("Evaluation trigger failed: {0}")]
    TriggerFailed(#[source] ApiError),

    /// A status query failed. The first such failure stops the poll loop.
    #[error("Polling failed. Cannot connect to backend.")]
    PollTransport,

    /// The job itself reached the failed state; the banner is the backend's
    /// message verbatim (or [`UNKNOWN_EVALUATION_ERROR`]).
    #[error("{0}")]
    EvaluationFailed(String),
}

impl FlowError {
    /// Classify an upload failure by whether a status code was seen.
    pub fn submission(err: ApiError) -> Self {
        match err.status_code() {
            Some(status) => FlowError::SubmissionRejected(status),
            None => FlowError::SubmissionFailed(err),
        }
    }

    /// Classify an evaluation-trigger failure by whether a status code was
    /// seen.
    pub fn trigger(err: ApiError) -> Self {
        match err.status_code() {
            Some(status) => FlowError::TriggerRejected(status),
            None => FlowError::TriggerFailed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::api::models::DocumentType;

    #[test]
    fn banner_strings_match_backend_facing_wording() {
        assert_eq!(
            FlowError::MissingSelection.to_string(),
            "Please select both CV and Project Report files."
        );
        assert_eq!(
            FlowError::SubmissionRejected(500).to_string(),
            "File upload failed with status: 500"
        );
        assert_eq!(
            FlowError::TriggerRejected(503).to_string(),
            "Evaluation trigger failed with status: 503"
        );
        assert_eq!(
            FlowError::PollTransport.to_string(),
            "Polling failed. Cannot connect to backend."
        );
    }

    #[test]
    fn evaluation_failed_passes_the_message_through_verbatim() {
        let err = FlowError::EvaluationFailed("model timeout".to_string());
        assert_eq!(err.to_string(), "model timeout");
    }

    #[test]
    fn submission_classifies_by_status_presence() {
        let rejected = FlowError::submission(ApiError::Status {
            endpoint: "/upload",
            status: 500,
        });
        assert!(matches!(rejected, FlowError::SubmissionRejected(500)));

        let failed = FlowError::submission(ApiError::MissingDocument(DocumentType::Cv));
        assert!(matches!(failed, FlowError::SubmissionFailed(_)));
        assert_eq!(
            failed.to_string(),
            "File upload failed: upload response has no cv entry"
        );
    }

    #[test]
    fn trigger_classifies_by_status_presence() {
        let rejected = FlowError::trigger(ApiError::Status {
            endpoint: "/evaluate",
            status: 500,
        });
        assert!(matches!(rejected, FlowError::TriggerRejected(500)));
        assert!(rejected.to_string().contains("500"));
    }
}
