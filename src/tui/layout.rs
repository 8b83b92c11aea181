// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Documents (7 rows)                                |
// +--------------------------------------------------+
// | Status & Result (fill)                            |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: flow state indicator and job id.
    pub status_bar: Rect,
    /// Document selection panel: paths, accepted ids, notices.
    pub documents: Rect,
    /// Main panel: error banner and evaluation result.
    pub result: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the screen layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(7), // documents
            Constraint::Min(8),    // result
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        documents: vertical[1],
        result: vertical[2],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        for (name, rect) in [
            ("status_bar", layout.status_bar),
            ("documents", layout.documents),
            ("result", layout.result),
            ("help_bar", layout.help_bar),
        ] {
            assert!(rect.width > 0, "{name} has zero width");
            assert!(rect.height > 0, "{name} has zero height");
        }
    }

    #[test]
    fn layout_rows_are_stacked_in_order() {
        let layout = build_layout(test_area());
        assert!(layout.status_bar.y < layout.documents.y);
        assert!(layout.documents.y < layout.result.y);
        assert!(layout.result.y < layout.help_bar.y);
    }

    #[test]
    fn fixed_rows_have_fixed_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.documents.height, 7);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn result_takes_the_remaining_space() {
        let area = test_area();
        let layout = build_layout(area);
        let fixed = layout.status_bar.height + layout.documents.height + layout.help_bar.height;
        assert_eq!(layout.result.height, area.height - fixed);
    }
}
