// HTTP client for the evaluation backend.
//
// Wraps a shared `reqwest::Client` with the backend base URL and a
// per-request timeout. Each method maps onto one backend endpoint; status
// handling mirrors the backend contract: upload and evaluate signal failure
// through non-2xx codes, while the status query signals failure only at the
// transport/decode level (its body is decoded regardless of HTTP status).

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::models::{EvaluateRequest, EvaluateResponse, JobStatusResponse, UploadResponse};
use super::ApiError;
use crate::config::BackendConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const UPLOAD_ENDPOINT: &str = "/upload";
const EVALUATE_ENDPOINT: &str = "/evaluate";
const RESULT_ENDPOINT: &str = "/result";

/// Multipart field name for the CV file.
const CV_FIELD: &str = "cv_file";
/// Multipart field name for the project report file.
const PROJECT_REPORT_FIELD: &str = "project_report_file";

// ---------------------------------------------------------------------------
// BackendClient
// ---------------------------------------------------------------------------

/// Typed client for the evaluation backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client with an explicit base URL and request timeout.
    ///
    /// A trailing slash on the base URL is tolerated and stripped.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        BackendClient {
            http: reqwest::Client::new(),
            base_url,
            timeout,
        }
    }

    /// Build a client from the backend section of the config.
    pub fn from_config(config: &BackendConfig) -> Self {
        BackendClient::new(config.base_url.clone(), config.request_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit the CV and project report as one multipart request.
    ///
    /// File contents are read from disk here; a read failure is reported
    /// before any network traffic happens.
    pub async fn upload_documents(
        &self,
        cv_path: &Path,
        project_report_path: &Path,
    ) -> Result<UploadResponse, ApiError> {
        let form = Form::new()
            .part(CV_FIELD, file_part("CV", cv_path).await?)
            .part(
                PROJECT_REPORT_FIELD,
                file_part("project report", project_report_path).await?,
            );

        debug!(
            cv = %cv_path.display(),
            project_report = %project_report_path.display(),
            "uploading documents"
        );

        let response = self
            .http
            .post(self.url(UPLOAD_ENDPOINT))
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: UPLOAD_ENDPOINT,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: UPLOAD_ENDPOINT,
                status: status.as_u16(),
            });
        }

        response
            .json::<UploadResponse>()
            .await
            .map_err(|source| ApiError::Decode {
                endpoint: UPLOAD_ENDPOINT,
                source,
            })
    }

    /// Ask the backend to start an evaluation job; returns the job id.
    pub async fn trigger_evaluation(
        &self,
        request: &EvaluateRequest,
    ) -> Result<String, ApiError> {
        let response = self
            .http
            .post(self.url(EVALUATE_ENDPOINT))
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: EVALUATE_ENDPOINT,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: EVALUATE_ENDPOINT,
                status: status.as_u16(),
            });
        }

        let body: EvaluateResponse =
            response.json().await.map_err(|source| ApiError::Decode {
                endpoint: EVALUATE_ENDPOINT,
                source,
            })?;
        Ok(body.id)
    }

    /// Query the current state of a job.
    ///
    /// The HTTP status line is intentionally ignored: the job state lives in
    /// the body, and an undecodable body is the only failure signal this
    /// endpoint has.
    pub async fn fetch_result(&self, job_id: &str) -> Result<JobStatusResponse, ApiError> {
        let response = self
            .http
            .get(format!("{}{}/{}", self.base_url, RESULT_ENDPOINT, job_id))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: RESULT_ENDPOINT,
                source,
            })?;

        response
            .json::<JobStatusResponse>()
            .await
            .map_err(|source| ApiError::Decode {
                endpoint: RESULT_ENDPOINT,
                source,
            })
    }
}

/// Read a file into a multipart part named after its on-disk file name.
async fn file_part(label: &'static str, path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ApiError::FileRead {
            label,
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/pdf")
        .map_err(|source| ApiError::Transport {
            endpoint: UPLOAD_ENDPOINT,
            source,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
