use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the selected paper as a centered popup over the Browse view.
pub fn render(f: &mut Frame, app: &App) {
    let theme = &app.theme;
    let Some(paper) = app.session.papers().get(app.browse_cursor) else {
        return;
    };

    let area = f.area();
    let popup = centered_rect(area.width.saturating_sub(8).min(90), 16, area);

    let mut lines: Vec<Line> = Vec::new();
    section_header(&mut lines, "PAPER", theme);
    labeled_line(&mut lines, "Title", &paper.title, theme);
    labeled_line(&mut lines, "Authors", &paper.authors, theme);
    labeled_line(&mut lines, "Department", &paper.department, theme);
    labeled_line(&mut lines, "Journal", &paper.journal, theme);
    labeled_line(&mut lines, "Published", &paper.publication_date, theme);

    let keywords = paper.keywords_list();
    if !keywords.is_empty() {
        labeled_line(&mut lines, "Keywords", &keywords.join(", "), theme);
    }
    if let Some(id) = &paper.id {
        labeled_line(&mut lines, "ID", id.as_str(), theme);
    }
    lines.push(Line::from(""));
    match &paper.file_url {
        Some(url) => labeled_line(&mut lines, "PDF", url, theme),
        None => lines.push(Line::from(Span::styled(
            "  No PDF attached",
            Style::default().fg(theme.dim),
        ))),
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Details (Esc to close) "),
    );
    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header(lines: &mut Vec<Line>, title: &str, theme: &Theme) {
    lines.push(Line::from(Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    )));
}

fn labeled_line(lines: &mut Vec<Line>, label: &str, value: &str, theme: &Theme) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {label:<12}"), Style::default().fg(theme.dim)),
        Span::styled(value.to_string(), Style::default().fg(theme.text)),
    ]));
}
