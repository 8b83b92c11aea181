// Documents panel: selected paths, accepted ids, and validation notices.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::{DocumentField, ViewState};

/// Render the document selection panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = vec![
        document_line("CV", &state.cv_path, state.cv_document_id.as_deref()),
        document_line(
            "Project Report",
            &state.project_report_path,
            state.project_report_document_id.as_deref(),
        ),
    ];

    if let Some(field) = state.editing {
        let label = match field {
            DocumentField::Cv => "CV",
            DocumentField::ProjectReport => "Project Report",
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {label} path: "),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(state.edit_buffer.clone()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]));
    }

    if !state.notice.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", state.notice),
            Style::default().fg(Color::Yellow),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Documents"),
    );
    frame.render_widget(paragraph, area);
}

/// One line per document: label, path or placeholder, id once accepted.
fn document_line<'a>(label: &'a str, path: &'a str, document_id: Option<&'a str>) -> Line<'a> {
    let mut spans = vec![Span::styled(
        format!("  {label}: "),
        Style::default().add_modifier(Modifier::BOLD),
    )];

    if path.is_empty() {
        spans.push(Span::styled(
            "<not selected>",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(path));
    }

    if let Some(id) = document_id {
        spans.push(Span::styled(
            format!("  [{id}]"),
            Style::default().fg(Color::Green),
        ));
    }

    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
