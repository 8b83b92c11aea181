// Evaluation job polling task.
//
// Queries the backend for job status at a fixed interval until a terminal
// status or the first failed query, then reports exactly one terminal event
// and returns. Queries never overlap: the interval uses Delay missed-tick
// behavior, so a slow response pushes the next query back instead of
// stacking. The loop has no iteration cap and no timeout ceiling; a job that
// never reaches a terminal status is polled until the owning task is
// aborted. A failed query (transport or undecodable body) is terminal on the
// first occurrence -- there is no retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::models::JobStatus;
use crate::api::BackendClient;
use crate::error::UNKNOWN_EVALUATION_ERROR;
use crate::protocol::FlowEvent;

/// Poll `job_id` every `every` until the job is terminal.
///
/// Events are tagged with `generation` so the orchestrator can discard them
/// once this loop has been superseded. Returns when a terminal event was
/// sent or the receiver is gone.
pub async fn run(
    client: Arc<BackendClient>,
    job_id: String,
    every: Duration,
    tx: mpsc::Sender<FlowEvent>,
    generation: u64,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the first status
    // query happens one full interval after the trigger.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let response = match client.fetch_result(&job_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "status query failed, stopping poll loop");
                let _ = tx
                    .send(FlowEvent::PollFailed {
                        detail: e.to_string(),
                        generation,
                    })
                    .await;
                return;
            }
        };

        match response.status {
            JobStatus::Completed => {
                let event = match response.result {
                    Some(result) => FlowEvent::JobCompleted {
                        result: Box::new(result),
                        generation,
                    },
                    // A completed job without a result record is malformed;
                    // fail rather than surface an empty result.
                    None => FlowEvent::JobFailed {
                        message: "Evaluation completed but returned no result.".to_string(),
                        generation,
                    },
                };
                let _ = tx.send(event).await;
                return;
            }
            JobStatus::Failed => {
                let message = response
                    .error
                    .unwrap_or_else(|| UNKNOWN_EVALUATION_ERROR.to_string());
                let _ = tx.send(FlowEvent::JobFailed { message, generation }).await;
                return;
            }
            JobStatus::Pending | JobStatus::Unknown => {
                debug!(job_id = %job_id, "job not finished yet");
                if tx
                    .send(FlowEvent::JobPending { generation })
                    .await
                    .is_err()
                {
                    // Receiver dropped -- stop polling.
                    return;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
