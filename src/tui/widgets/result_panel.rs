// Result panel: error banner and the rendered evaluation result.
//
// Pure display formatting; nothing here mutates state. When no result is
// held, a placeholder line describes what the current flow state is waiting
// for.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::api::models::EvaluationResult;
use crate::protocol::FlowState;
use crate::tui::ViewState;

/// Format a match rate fraction for display: `0.45` renders as `"45%"`.
pub fn format_match_rate(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

/// Format a project score for display: `3.75` renders as `"3.75 / 5.00"`.
pub fn format_project_score(score: f64) -> String {
    format!("{score:.2} / 5.00")
}

/// Render the status/result panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = Vec::new();

    if !state.error_message.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(
                "Error: ",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                state.error_message.clone(),
                Style::default().fg(Color::Red),
            ),
        ]));
        lines.push(Line::default());
    }

    match &state.result {
        Some(result) => lines.extend(result_lines(result)),
        None => {
            if let Some(placeholder) = placeholder_text(state.flow) {
                lines.push(Line::from(Span::styled(
                    placeholder,
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status & Result"),
        );
    frame.render_widget(paragraph, area);
}

/// Placeholder shown while no result is available. `None` for the error
/// state: the banner already says everything.
fn placeholder_text(flow: FlowState) -> Option<&'static str> {
    match flow {
        FlowState::Idle => Some("Select documents and press 'u' to upload."),
        FlowState::Uploading => Some("Uploading documents..."),
        FlowState::Uploaded => Some("Documents uploaded. Press 'e' to start the evaluation."),
        FlowState::Evaluating => Some("Evaluating... this can take a while."),
        FlowState::Completed => None,
        FlowState::Error => None,
    }
}

/// The three result sections: CV evaluation, project evaluation, summary.
fn result_lines(result: &EvaluationResult) -> Vec<Line<'static>> {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };

    vec![
        section("CV Evaluation"),
        Line::from(format!("  Match Rate: {}", format_match_rate(result.cv_match_rate))),
        Line::from(format!("  {}", result.cv_feedback)),
        Line::default(),
        section("Project Evaluation"),
        Line::from(format!(
            "  Score: {}",
            format_project_score(result.project_score)
        )),
        Line::from(format!("  {}", result.project_feedback)),
        Line::default(),
        section("Overall Summary"),
        Line::from(format!("  {}", result.overall_summary)),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
