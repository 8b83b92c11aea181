// Message types exchanged between the TUI, the flow orchestrator, and the
// spawned network tasks.
//
// Three channels exist: user commands (TUI -> orchestrator), flow events
// (network tasks -> orchestrator), and UI updates (orchestrator -> TUI).
// Flow events carry the generation counter of the task that produced them;
// the orchestrator discards events whose generation is not current, which is
// how a superseded upload or poll loop is silenced after its task is
// aborted.

use std::path::PathBuf;

use crate::api::models::{DocumentPair, EvaluationResult};

// ---------------------------------------------------------------------------
// FlowState
// ---------------------------------------------------------------------------

/// Overall progress of the single submission/evaluation flow.
///
/// Exactly one instance exists, owned by the orchestrator; the TUI keeps a
/// mirror. This is the single source of truth for which controls are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Uploading,
    Uploaded,
    Evaluating,
    Completed,
    Error,
}

impl FlowState {
    /// Display label, matching the wire-style lowercase names.
    pub fn label(self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::Uploading => "uploading",
            FlowState::Uploaded => "uploaded",
            FlowState::Evaluating => "evaluating",
            FlowState::Completed => "completed",
            FlowState::Error => "error",
        }
    }

    /// A request is in flight; upload and evaluate controls are disabled.
    pub fn is_busy(self) -> bool {
        matches!(self, FlowState::Uploading | FlowState::Evaluating)
    }
}

// ---------------------------------------------------------------------------
// UserCommand
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Submit the selected documents. `None` paths mean nothing was
    /// selected; validation happens in the orchestrator so the rule lives in
    /// one place.
    Upload {
        cv: Option<PathBuf>,
        project_report: Option<PathBuf>,
    },
    /// Trigger evaluation of the last uploaded document pair.
    Evaluate,
    Quit,
}

// ---------------------------------------------------------------------------
// FlowEvent
// ---------------------------------------------------------------------------

/// Events reported by spawned network tasks (upload task, trigger+poll task).
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    UploadSucceeded {
        documents: DocumentPair,
        generation: u64,
    },
    UploadFailed {
        message: String,
        generation: u64,
    },
    EvaluationAccepted {
        job_id: String,
        generation: u64,
    },
    EvaluationRejected {
        message: String,
        generation: u64,
    },
    /// The job is not finished; the poll loop keeps running. No state
    /// changes on this event.
    JobPending { generation: u64 },
    JobCompleted {
        result: Box<EvaluationResult>,
        generation: u64,
    },
    JobFailed {
        message: String,
        generation: u64,
    },
    /// A status query failed; the poll loop has stopped.
    PollFailed {
        detail: String,
        generation: u64,
    },
}

impl FlowEvent {
    /// The generation of the task that produced this event.
    pub fn generation(&self) -> u64 {
        match self {
            FlowEvent::UploadSucceeded { generation, .. }
            | FlowEvent::UploadFailed { generation, .. }
            | FlowEvent::EvaluationAccepted { generation, .. }
            | FlowEvent::EvaluationRejected { generation, .. }
            | FlowEvent::JobPending { generation }
            | FlowEvent::JobCompleted { generation, .. }
            | FlowEvent::JobFailed { generation, .. }
            | FlowEvent::PollFailed { generation, .. } => *generation,
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate
// ---------------------------------------------------------------------------

/// Incremental updates pushed from the orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// The flow moved to a new non-terminal display state.
    Flow(FlowState),
    /// A validation notice; no flow transition happened.
    Notice(String),
    /// Both documents were accepted and their identifiers are known.
    DocumentsAccepted {
        cv_id: String,
        project_report_id: String,
    },
    /// The backend assigned a job id and polling has begun.
    EvaluationStarted { job_id: String },
    /// The evaluation finished; implies the completed state.
    ResultReady(Box<EvaluationResult>),
    /// The flow failed; implies the error state. The string is the banner.
    Error(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_states_are_the_in_flight_ones() {
        assert!(FlowState::Uploading.is_busy());
        assert!(FlowState::Evaluating.is_busy());
        assert!(!FlowState::Idle.is_busy());
        assert!(!FlowState::Uploaded.is_busy());
        assert!(!FlowState::Completed.is_busy());
        assert!(!FlowState::Error.is_busy());
    }

    #[test]
    fn labels_are_lowercase_names() {
        assert_eq!(FlowState::Idle.label(), "idle");
        assert_eq!(FlowState::Uploading.label(), "uploading");
        assert_eq!(FlowState::Uploaded.label(), "uploaded");
        assert_eq!(FlowState::Evaluating.label(), "evaluating");
        assert_eq!(FlowState::Completed.label(), "completed");
        assert_eq!(FlowState::Error.label(), "error");
    }

    #[test]
    fn every_flow_event_exposes_its_generation() {
        let events = vec![
            FlowEvent::UploadFailed {
                message: "m".into(),
                generation: 3,
            },
            FlowEvent::EvaluationAccepted {
                job_id: "j".into(),
                generation: 3,
            },
            FlowEvent::EvaluationRejected {
                message: "m".into(),
                generation: 3,
            },
            FlowEvent::JobPending { generation: 3 },
            FlowEvent::JobFailed {
                message: "m".into(),
                generation: 3,
            },
            FlowEvent::PollFailed {
                detail: "d".into(),
                generation: 3,
            },
        ];
        for event in events {
            assert_eq!(event.generation(), 3);
        }
    }
}
