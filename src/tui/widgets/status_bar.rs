// Status bar widget: flow state indicator and job id.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::FlowState;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [state indicator] [state label] [job id when known]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = flow_indicator(state.flow);

    let mut spans = vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)),
        Span::styled(
            state.flow.label().to_string(),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(job_id) = &state.job_id {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!("job {job_id}"),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the indicator character and its color for a flow state.
pub fn flow_indicator(flow: FlowState) -> (&'static str, Color) {
    match flow {
        FlowState::Idle => ("●", Color::DarkGray),
        FlowState::Uploading | FlowState::Evaluating => ("●", Color::Yellow),
        FlowState::Uploaded => ("●", Color::Cyan),
        FlowState::Completed => ("●", Color::Green),
        FlowState::Error => ("●", Color::Red),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_states_are_yellow() {
        assert_eq!(flow_indicator(FlowState::Uploading).1, Color::Yellow);
        assert_eq!(flow_indicator(FlowState::Evaluating).1, Color::Yellow);
    }

    #[test]
    fn terminal_states_are_green_and_red() {
        assert_eq!(flow_indicator(FlowState::Completed).1, Color::Green);
        assert_eq!(flow_indicator(FlowState::Error).1, Color::Red);
    }

    #[test]
    fn render_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_a_job_id() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.flow = FlowState::Evaluating;
        state.job_id = Some("job-42".to_string());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
