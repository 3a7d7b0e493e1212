use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(64, 34, area);

    let lines = vec![
        Line::from(Span::styled(" Keyboard Shortcuts ", theme.header_style())),
        Line::from(""),
        section_header("Views", theme),
        key_line("Tab / Shift+Tab", "Next / previous view", theme),
        key_line("1 / 2 / 3", "Browse / Upload / My Papers", theme),
        Line::from(""),
        section_header("Navigation", theme),
        key_line("j / \u{2193}", "Move down", theme),
        key_line("k / \u{2191}", "Move up", theme),
        key_line("PgDn / PgUp", "Page down / up", theme),
        key_line("g / G", "Go to top / bottom", theme),
        key_line("Enter", "Open details / edit field", theme),
        key_line("Esc", "Close / dismiss", theme),
        Line::from(""),
        section_header("Browse", theme),
        key_line("/", "Search (refreshes as you type)", theme),
        key_line("f", "Edit filters", theme),
        key_line("s", "Cycle sort field", theme),
        key_line("o", "Toggle sort order", theme),
        key_line("c", "Clear search and filters", theme),
        key_line("r", "Reload", theme),
        Line::from(""),
        section_header("Editing", theme),
        key_line("Tab / Shift+Tab", "Next / previous field", theme),
        key_line("Enter", "Done", theme),
        key_line("Esc", "Revert and stop editing", theme),
        key_line("Ctrl+u", "Upload the form", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("t", "Cycle theme", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q / Ctrl+c", "Quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<18}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
