// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// orchestrator, or into local ViewState mutations (path editing). Upload and
// evaluate keys are gated here the way the original controls are: nothing is
// sent while a request is in flight, and evaluate is only live once an
// upload was accepted (or a previous run finished).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::UserCommand;

use super::{DocumentField, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator (upload, evaluate, quit). Returns `None` when the key press
/// was handled locally by mutating `ViewState` (path editing) or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both Press
    // and Release events for each physical keypress; ignoring non-Press
    // events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Path edit mode: capture printable characters and special keys
    if view_state.editing.is_some() {
        return handle_edit_mode(key_event, view_state);
    }

    match key_event.code {
        // Path editing entry; blocked while a request is in flight so the
        // selection a task is reading from cannot change under it.
        KeyCode::Char('c') if !view_state.flow.is_busy() => {
            start_edit(view_state, DocumentField::Cv);
            None
        }
        KeyCode::Char('p') if !view_state.flow.is_busy() => {
            start_edit(view_state, DocumentField::ProjectReport);
            None
        }

        // Upload: live whenever no request is in flight.
        KeyCode::Char('u') if !view_state.flow.is_busy() => Some(UserCommand::Upload {
            cv: view_state.cv_selection(),
            project_report: view_state.project_report_selection(),
        }),

        // Evaluate: live once an upload was accepted or a run finished.
        // Deliberately not gated on busy: re-running while a previous
        // evaluation is still polling supersedes that evaluation.
        KeyCode::Char('e') if view_state.can_evaluate() => Some(UserCommand::Evaluate),

        KeyCode::Char('q') => Some(UserCommand::Quit),

        _ => None,
    }
}

fn start_edit(view_state: &mut ViewState, field: DocumentField) {
    view_state.edit_buffer = match field {
        DocumentField::Cv => view_state.cv_path.clone(),
        DocumentField::ProjectReport => view_state.project_report_path.clone(),
    };
    view_state.editing = Some(field);
}

/// Handle key events while editing a document path.
///
/// Enter commits the buffer to the edited field, Esc discards it; both leave
/// edit mode.
fn handle_edit_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter => {
            let buffer = std::mem::take(&mut view_state.edit_buffer);
            match view_state.editing.take() {
                Some(DocumentField::Cv) => view_state.cv_path = buffer,
                Some(DocumentField::ProjectReport) => {
                    view_state.project_report_path = buffer;
                }
                None => {}
            }
            None
        }
        KeyCode::Esc => {
            view_state.editing = None;
            view_state.edit_buffer.clear();
            None
        }
        KeyCode::Backspace => {
            view_state.edit_buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.edit_buffer.push(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
