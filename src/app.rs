// Flow orchestration: the state container and the central event loop.
//
// The orchestrator owns the single FlowState instance plus the last known
// document references, job identifier, and result/error. All mutation goes
// through the named transition functions below so the transition table is
// auditable and testable without a terminal attached. Network work runs in
// spawned tasks that report back over the flow-event channel; at most one
// flow task (upload, or trigger+poll) exists at a time. Starting a new one
// aborts the previous handle and bumps the generation counter, and events
// from stale generations are discarded in `handle_flow_event`.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::models::{DocumentPair, EvaluateRequest, EvaluationResult};
use crate::api::BackendClient;
use crate::config::Config;
use crate::error::FlowError;
use crate::poller;
use crate::protocol::{FlowEvent, FlowState, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete flow state for one session.
pub struct AppState {
    config: Config,
    flow: FlowState,
    documents: Option<DocumentPair>,
    job_id: Option<String>,
    result: Option<EvaluationResult>,
    error_message: Option<String>,
    /// Handle of the in-flight upload or trigger+poll task, if any.
    current_flow_task: Option<tokio::task::JoinHandle<()>>,
    /// Monotonically increasing counter identifying the current flow task.
    /// Incremented each time a new task is spawned; events from stale
    /// generations are discarded in `handle_flow_event`.
    flow_generation: u64,
    client: Arc<BackendClient>,
    /// Sender for flow events; spawned tasks use a clone of this sender to
    /// report back to the main event loop.
    flow_tx: mpsc::Sender<FlowEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        client: Arc<BackendClient>,
        flow_tx: mpsc::Sender<FlowEvent>,
    ) -> Self {
        AppState {
            config,
            flow: FlowState::Idle,
            documents: None,
            job_id: None,
            result: None,
            error_message: None,
            current_flow_task: None,
            flow_generation: 0,
            client,
            flow_tx,
        }
    }

    pub fn flow(&self) -> FlowState {
        self.flow
    }

    pub fn documents(&self) -> Option<&DocumentPair> {
        self.documents.as_ref()
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.flow_generation
    }

    pub fn has_flow_task(&self) -> bool {
        self.current_flow_task.is_some()
    }

    // -- Named transitions ---------------------------------------------------
    //
    // These are the only places `flow` (and the records tied to it) change.
    // A previously displayed result intentionally survives a re-upload; only
    // a new completed evaluation replaces it.

    /// `* -> uploading`: a submission request is in flight.
    fn begin_upload(&mut self) {
        self.flow = FlowState::Uploading;
        self.error_message = None;
    }

    /// `uploading -> uploaded`: both document references are known.
    fn documents_received(&mut self, documents: DocumentPair) {
        self.documents = Some(documents);
        self.job_id = None;
        self.flow = FlowState::Uploaded;
    }

    /// `uploaded/completed/error -> evaluating`: trigger request sent.
    fn begin_evaluation(&mut self) {
        self.flow = FlowState::Evaluating;
        self.error_message = None;
    }

    /// Still `evaluating`: the backend assigned a job id, polling begins.
    fn job_assigned(&mut self, job_id: String) {
        self.job_id = Some(job_id);
    }

    /// `evaluating -> completed`: terminal success.
    fn evaluation_completed(&mut self, result: EvaluationResult) {
        self.result = Some(result);
        self.flow = FlowState::Completed;
    }

    /// `* -> error`: terminal failure with a banner message.
    fn flow_failed(&mut self, message: String) {
        self.error_message = Some(message);
        self.flow = FlowState::Error;
    }

    // -- Task management -----------------------------------------------------

    /// Abort the in-flight flow task if one is running.
    pub fn cancel_flow_task(&mut self) {
        if let Some(handle) = self.current_flow_task.take() {
            handle.abort();
            info!("cancelled previous flow task");
        }
    }

    /// Start the upload task for the given document paths.
    ///
    /// Fails fast with `MissingSelection` (no task spawned, no network call)
    /// when either path is absent. Any still-running flow task -- including a
    /// poll loop from an earlier evaluation -- is aborted first.
    pub fn trigger_upload(
        &mut self,
        cv: Option<PathBuf>,
        project_report: Option<PathBuf>,
    ) -> Result<(), FlowError> {
        let (cv, project_report) = match (cv, project_report) {
            (Some(cv), Some(project_report)) => (cv, project_report),
            _ => return Err(FlowError::MissingSelection),
        };

        self.cancel_flow_task();
        self.flow_generation += 1;
        let generation = self.flow_generation;
        self.begin_upload();

        let client = Arc::clone(&self.client);
        let tx = self.flow_tx.clone();
        let handle = tokio::spawn(async move {
            let outcome = match client.upload_documents(&cv, &project_report).await {
                Ok(response) => response.into_pair(),
                Err(e) => Err(e),
            };
            let event = match outcome {
                Ok(documents) => FlowEvent::UploadSucceeded {
                    documents,
                    generation,
                },
                Err(e) => FlowEvent::UploadFailed {
                    message: FlowError::submission(e).to_string(),
                    generation,
                },
            };
            let _ = tx.send(event).await;
        });

        self.current_flow_task = Some(handle);
        info!(generation, "upload task started");
        Ok(())
    }

    /// Start the trigger+poll task for the last uploaded document pair.
    ///
    /// Returns `false` (nothing spawned) when no document pair is known.
    /// A still-running poll loop from a previous evaluation is aborted and
    /// its generation retired before the new trigger request is sent.
    pub fn trigger_evaluation(&mut self) -> bool {
        let documents = match &self.documents {
            Some(documents) => documents.clone(),
            None => {
                warn!("evaluation requested before documents were uploaded");
                return false;
            }
        };

        self.cancel_flow_task();
        self.flow_generation += 1;
        let generation = self.flow_generation;
        self.begin_evaluation();

        let request = EvaluateRequest {
            job_title: self.config.backend.job_title.clone(),
            cv_document_id: documents.cv.document_id.clone(),
            project_report_id: documents.project_report.document_id.clone(),
        };
        let interval = self.config.backend.poll_interval();
        let client = Arc::clone(&self.client);
        let tx = self.flow_tx.clone();

        let handle = tokio::spawn(async move {
            match client.trigger_evaluation(&request).await {
                Ok(job_id) => {
                    let accepted = FlowEvent::EvaluationAccepted {
                        job_id: job_id.clone(),
                        generation,
                    };
                    if tx.send(accepted).await.is_err() {
                        return;
                    }
                    poller::run(client, job_id, interval, tx, generation).await;
                }
                Err(e) => {
                    let event = FlowEvent::EvaluationRejected {
                        message: FlowError::trigger(e).to_string(),
                        generation,
                    };
                    let _ = tx.send(event).await;
                }
            }
        });

        self.current_flow_task = Some(handle);
        info!(generation, "evaluation task started");
        true
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the flow event loop until the user quits or a channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut flow_rx: mpsc::Receiver<FlowEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("flow event loop started");

    loop {
        tokio::select! {
            // --- User commands from the TUI ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Events from spawned network tasks ---
            event = flow_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_flow_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("flow event channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    state.cancel_flow_task();
    info!("flow event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
///
/// Upload commands arriving while a request is in flight are dropped: the
/// TUI disables the control, and re-validating here keeps a queued keypress
/// from racing the in-flight task. An Evaluate command during a running
/// evaluation is allowed and supersedes it -- the previous poll loop is
/// cancelled before the new trigger request goes out.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Upload { cv, project_report } => {
            if state.flow().is_busy() {
                debug!("upload command ignored while busy");
                return;
            }
            match state.trigger_upload(cv, project_report) {
                Ok(()) => {
                    let _ = ui_tx.send(UiUpdate::Flow(FlowState::Uploading)).await;
                }
                Err(e) => {
                    let _ = ui_tx.send(UiUpdate::Notice(e.to_string())).await;
                }
            }
        }
        UserCommand::Evaluate => {
            if state.flow() == FlowState::Uploading {
                debug!("evaluate command ignored while an upload is in flight");
                return;
            }
            if state.trigger_evaluation() {
                let _ = ui_tx.send(UiUpdate::Flow(FlowState::Evaluating)).await;
            } else {
                let _ = ui_tx
                    .send(UiUpdate::Notice(
                        "Upload documents before starting an evaluation.".to_string(),
                    ))
                    .await;
            }
        }
        UserCommand::Quit => {
            // Handled in the main loop.
        }
    }
}

/// Handle an event from a spawned flow task.
async fn handle_flow_event(
    state: &mut AppState,
    event: FlowEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    // Discard events from stale (superseded) tasks.
    let event_generation = event.generation();
    if event_generation != state.flow_generation {
        debug!(
            event_generation,
            current = state.flow_generation,
            "discarding stale flow event"
        );
        return;
    }

    match event {
        FlowEvent::UploadSucceeded { documents, .. } => {
            let cv_id = documents.cv.document_id.clone();
            let project_report_id = documents.project_report.document_id.clone();
            info!(%cv_id, %project_report_id, "documents accepted");
            state.documents_received(documents);
            let _ = ui_tx
                .send(UiUpdate::DocumentsAccepted {
                    cv_id,
                    project_report_id,
                })
                .await;
            let _ = ui_tx.send(UiUpdate::Flow(FlowState::Uploaded)).await;
        }
        FlowEvent::UploadFailed { message, .. } => {
            fail(state, message, ui_tx).await;
        }
        FlowEvent::EvaluationAccepted { job_id, .. } => {
            info!(%job_id, "evaluation job accepted, polling");
            state.job_assigned(job_id.clone());
            let _ = ui_tx.send(UiUpdate::EvaluationStarted { job_id }).await;
        }
        FlowEvent::EvaluationRejected { message, .. } => {
            fail(state, message, ui_tx).await;
        }
        FlowEvent::JobPending { .. } => {
            // Still waiting; no state change, the poll loop keeps running.
            debug!("job still pending");
        }
        FlowEvent::JobCompleted { result, .. } => {
            info!("evaluation completed");
            state.evaluation_completed((*result).clone());
            let _ = ui_tx.send(UiUpdate::ResultReady(result)).await;
        }
        FlowEvent::JobFailed { message, .. } => {
            fail(state, message, ui_tx).await;
        }
        FlowEvent::PollFailed { detail, .. } => {
            warn!(%detail, "poll loop stopped on failed status query");
            fail(state, FlowError::PollTransport.to_string(), ui_tx).await;
        }
    }
}

/// Record a terminal failure and push the banner to the TUI.
async fn fail(state: &mut AppState, message: String, ui_tx: &mpsc::Sender<UiUpdate>) {
    warn!(%message, "flow failed");
    state.flow_failed(message.clone());
    let _ = ui_tx.send(UiUpdate::Error(message)).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
