pub mod browse;
pub mod detail;
pub mod help;
pub mod manage;
pub mod quit_confirm;
pub mod tabs;
pub mod upload;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;

use crate::model::edit::LineEditor;
use crate::theme::Theme;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Editor contents with a block cursor.
pub fn edit_spans<'a>(editor: &'a LineEditor, theme: &Theme) -> Vec<Span<'a>> {
    let (before, after) = editor.split();
    let mut rest = after.chars();
    let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
    vec![
        Span::styled(before, Style::default().fg(theme.text)),
        Span::styled(under, Style::default().fg(theme.header_fg).bg(theme.active)),
        Span::styled(rest.as_str(), Style::default().fg(theme.text)),
    ]
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}
