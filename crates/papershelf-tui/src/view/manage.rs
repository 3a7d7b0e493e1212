use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::App;
use crate::view::browse::hint_line;
use crate::view::truncate;

/// Render the My Papers view: uploads accepted during this session.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let uploaded = app.session.uploaded();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" My Papers ");

    if uploaded.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "You haven't uploaded any papers yet.",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press Enter to upload your first paper.",
                Style::default().fg(theme.dim),
            )),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        f.render_widget(
            Paragraph::new(hint_line(&[("Enter", "upload"), ("q", "quit")], theme))
                .style(theme.footer_style()),
            footer_area,
        );
        return;
    }

    let header = Row::new(["Title", "Authors", "File", "Link"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }));
    let rows: Vec<Row> = uploaded
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(truncate(&p.title, 40)),
                Cell::from(truncate(&p.authors, 24)).style(Style::default().fg(theme.dim)),
                Cell::from(truncate(&p.file_name, 24)),
                Cell::from(p.file_url.clone().unwrap_or_default())
                    .style(Style::default().fg(theme.active)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(24),
            Constraint::Length(24),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default().with_selected(Some(app.manage_cursor));
    f.render_stateful_widget(table, area, &mut state);
    f.render_widget(
        Paragraph::new(hint_line(&[("j/k", "move"), ("Tab", "next view"), ("q", "quit")], theme))
            .style(theme.footer_style()),
        footer_area,
    );
}
