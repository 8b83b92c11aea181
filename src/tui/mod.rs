// Terminal UI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the orchestrator's flow state for
// rendering. The orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.
// Key presses either mutate `ViewState` locally (path editing) or become
// `UserCommand`s for the orchestrator.

pub mod input;
pub mod layout;
pub mod widgets;

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::api::models::EvaluationResult;
use crate::config::DocumentsConfig;
use crate::protocol::{FlowState, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which document path the user is currently editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentField {
    Cv,
    ProjectReport,
}

/// TUI-local state that mirrors the flow state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the orchestrator; the
/// document paths and the edit mode are purely local.
pub struct ViewState {
    /// Mirrored flow state; drives which controls render as live.
    pub flow: FlowState,
    /// Path of the CV file, as entered. Empty means not selected.
    pub cv_path: String,
    /// Path of the project report file, as entered. Empty means not selected.
    pub project_report_path: String,
    /// Backend-assigned document ids once the upload was accepted.
    pub cv_document_id: Option<String>,
    pub project_report_document_id: Option<String>,
    /// Job id of the running (or finished) evaluation.
    pub job_id: Option<String>,
    /// Last completed evaluation result. Survives re-uploads; replaced only
    /// by the next completed evaluation.
    pub result: Option<EvaluationResult>,
    /// Error banner text; empty when no error is showing.
    pub error_message: String,
    /// Validation notice text; empty when no notice is showing.
    pub notice: String,
    /// Active path-edit mode, if any.
    pub editing: Option<DocumentField>,
    /// Text buffer for the active path edit.
    pub edit_buffer: String,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            flow: FlowState::Idle,
            cv_path: String::new(),
            project_report_path: String::new(),
            cv_document_id: None,
            project_report_document_id: None,
            job_id: None,
            result: None,
            error_message: String::new(),
            notice: String::new(),
            editing: None,
            edit_buffer: String::new(),
        }
    }
}

impl ViewState {
    /// Seed the document paths from the config's `[documents]` table.
    pub fn with_documents(documents: &DocumentsConfig) -> Self {
        let path_string = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        ViewState {
            cv_path: path_string(&documents.cv),
            project_report_path: path_string(&documents.project_report),
            ..ViewState::default()
        }
    }

    /// The CV path as an upload argument; `None` when nothing was entered.
    pub fn cv_selection(&self) -> Option<PathBuf> {
        selection(&self.cv_path)
    }

    /// The project report path as an upload argument.
    pub fn project_report_selection(&self) -> Option<PathBuf> {
        selection(&self.project_report_path)
    }

    /// Whether the evaluate control is live: a fresh upload is ready, or a
    /// previous run finished and can be re-run.
    pub fn can_evaluate(&self) -> bool {
        self.flow == FlowState::Uploaded || self.result.is_some()
    }
}

fn selection(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Flow(flow) => {
            state.flow = flow;
            // A new request clears stale banners, mirroring the flow side.
            if flow.is_busy() {
                state.error_message.clear();
                state.notice.clear();
            }
        }
        UiUpdate::Notice(text) => {
            state.notice = text;
        }
        UiUpdate::DocumentsAccepted {
            cv_id,
            project_report_id,
        } => {
            state.cv_document_id = Some(cv_id);
            state.project_report_document_id = Some(project_report_id);
        }
        UiUpdate::EvaluationStarted { job_id } => {
            state.job_id = Some(job_id);
        }
        UiUpdate::ResultReady(result) => {
            state.result = Some(*result);
            state.flow = FlowState::Completed;
        }
        UiUpdate::Error(message) => {
            state.error_message = message;
            state.flow = FlowState::Error;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::documents::render(frame, layout.documents, state);
    widgets::result_panel::render(frame, layout.result, state);
    render_help_bar(frame, layout.help_bar, state);
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let text = if state.editing.is_some() {
        " Enter:Confirm | Esc:Cancel"
    } else {
        " c:CV path | p:Report path | u:Upload | e:Evaluate | q:Quit"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal even when a panic unwinds through the TUI.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // UI updates from the orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(update) => {
                        apply_ui_update(&mut view_state, update);
                    }
                    None => {
                        // Channel closed: the orchestrator is shutting down.
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse, resize, focus events -- nothing to do.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> EvaluationResult {
        EvaluationResult {
            cv_match_rate: 0.45,
            cv_feedback: "good fit".to_string(),
            project_score: 3.75,
            project_feedback: "solid".to_string(),
            overall_summary: "hire".to_string(),
        }
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert_eq!(state.flow, FlowState::Idle);
        assert!(state.cv_path.is_empty());
        assert!(state.project_report_path.is_empty());
        assert!(state.cv_document_id.is_none());
        assert!(state.project_report_document_id.is_none());
        assert!(state.job_id.is_none());
        assert!(state.result.is_none());
        assert!(state.error_message.is_empty());
        assert!(state.notice.is_empty());
        assert!(state.editing.is_none());
        assert!(!state.can_evaluate());
    }

    #[test]
    fn with_documents_seeds_paths_from_config() {
        let documents = DocumentsConfig {
            cv: Some(PathBuf::from("docs/cv.pdf")),
            project_report: None,
        };
        let state = ViewState::with_documents(&documents);
        assert_eq!(state.cv_path, "docs/cv.pdf");
        assert!(state.project_report_path.is_empty());
    }

    #[test]
    fn selections_are_none_for_blank_paths() {
        let mut state = ViewState::default();
        assert!(state.cv_selection().is_none());

        state.cv_path = "  ".to_string();
        assert!(state.cv_selection().is_none());

        state.cv_path = "cv.pdf".to_string();
        assert_eq!(state.cv_selection(), Some(PathBuf::from("cv.pdf")));
    }

    #[test]
    fn can_evaluate_after_upload_or_with_a_previous_result() {
        let mut state = ViewState::default();
        assert!(!state.can_evaluate());

        state.flow = FlowState::Uploaded;
        assert!(state.can_evaluate());

        // After a completed run the control stays live for a re-run.
        state.flow = FlowState::Completed;
        state.result = Some(sample_result());
        assert!(state.can_evaluate());
    }

    #[test]
    fn apply_flow_update_clears_banners_when_busy() {
        let mut state = ViewState::default();
        state.error_message = "old error".to_string();
        state.notice = "old notice".to_string();

        apply_ui_update(&mut state, UiUpdate::Flow(FlowState::Uploading));
        assert_eq!(state.flow, FlowState::Uploading);
        assert!(state.error_message.is_empty());
        assert!(state.notice.is_empty());
    }

    #[test]
    fn apply_notice_keeps_flow_unchanged() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice("pick files".to_string()));
        assert_eq!(state.flow, FlowState::Idle);
        assert_eq!(state.notice, "pick files");
    }

    #[test]
    fn apply_documents_accepted_records_both_ids() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::DocumentsAccepted {
                cv_id: "d1".to_string(),
                project_report_id: "d2".to_string(),
            },
        );
        assert_eq!(state.cv_document_id.as_deref(), Some("d1"));
        assert_eq!(state.project_report_document_id.as_deref(), Some("d2"));
    }

    #[test]
    fn apply_result_ready_completes_the_flow() {
        let mut state = ViewState::default();
        state.flow = FlowState::Evaluating;

        apply_ui_update(&mut state, UiUpdate::ResultReady(Box::new(sample_result())));
        assert_eq!(state.flow, FlowState::Completed);
        assert!(state.result.is_some());
    }

    #[test]
    fn apply_error_sets_banner_and_error_state() {
        let mut state = ViewState::default();
        state.flow = FlowState::Evaluating;

        apply_ui_update(&mut state, UiUpdate::Error("model timeout".to_string()));
        assert_eq!(state.flow, FlowState::Error);
        assert_eq!(state.error_message, "model timeout");
    }

    #[test]
    fn error_banner_does_not_clear_a_previous_result() {
        let mut state = ViewState::default();
        state.result = Some(sample_result());

        apply_ui_update(&mut state, UiUpdate::Error("boom".to_string()));
        assert!(state.result.is_some());
        assert_eq!(state.flow, FlowState::Error);
    }

    #[test]
    fn render_frame_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }

    #[test]
    fn render_frame_does_not_panic_with_a_full_state() {
        let backend = ratatui::backend::TestBackend::new(100, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.flow = FlowState::Completed;
        state.cv_path = "cv.pdf".to_string();
        state.project_report_path = "report.pdf".to_string();
        state.cv_document_id = Some("d1".to_string());
        state.project_report_document_id = Some("d2".to_string());
        state.job_id = Some("job-1".to_string());
        state.result = Some(sample_result());
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
