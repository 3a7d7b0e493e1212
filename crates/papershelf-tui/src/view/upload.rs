use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, EditTarget, UploadRow};
use crate::view::browse::hint_line;
use crate::view::{edit_spans, spinner_char};

const LABEL_WIDTH: usize = 18;

/// Render the Upload view into the given area.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect, footer_area: Rect) {
    let theme = &app.theme;
    let rows = UploadRow::all();

    let chunks = Layout::vertical([
        Constraint::Length(rows.len() as u16 + 2), // form
        Constraint::Length(3),                     // status message
        Constraint::Min(0),
    ])
    .split(area);

    let draft = app.session.draft();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = i == app.upload_cursor;
            let marker = if selected { "\u{25B6} " } else { "  " };
            let mut spans = vec![Span::styled(marker, Style::default().fg(theme.active))];

            match row {
                UploadRow::Field(field) => {
                    spans.push(label_span(field.label(), theme, selected));
                    if app.edit_target == Some(EditTarget::Draft(*field)) {
                        spans.extend(edit_spans(&app.editor, theme));
                    } else if draft.field(*field).is_empty() {
                        spans.push(Span::styled(
                            field.placeholder(),
                            Style::default().fg(theme.dim),
                        ));
                    } else {
                        spans.push(Span::styled(
                            draft.field(*field),
                            Style::default().fg(theme.text),
                        ));
                    }
                }
                UploadRow::File => {
                    spans.push(label_span("PDF File", theme, selected));
                    if app.edit_target == Some(EditTarget::File) {
                        spans.extend(edit_spans(&app.editor, theme));
                    } else {
                        match &draft.file {
                            Some(path) => spans.push(Span::styled(
                                path.display().to_string(),
                                Style::default().fg(theme.text),
                            )),
                            None => spans.push(Span::styled(
                                "path/to/paper.pdf",
                                Style::default().fg(theme.dim),
                            )),
                        }
                    }
                }
                UploadRow::Submit => {
                    let text = if app.session.upload_in_flight() {
                        format!("{} Uploading...", spinner_char(app.tick))
                    } else {
                        "[ Upload Paper ]".to_string()
                    };
                    let style = if selected {
                        theme.header_style()
                    } else {
                        Style::default()
                            .fg(theme.active)
                            .add_modifier(Modifier::BOLD)
                    };
                    spans.push(Span::styled(text, style));
                }
            }
            Line::from(spans)
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style())
            .title(" Upload Paper "),
    );
    f.render_widget(form, chunks[0]);

    if let Some(message) = app.session.message() {
        let p = Paragraph::new(Line::from(Span::styled(
            format!(" {}", message.text),
            theme.message_style(message.kind),
        )))
        .wrap(Wrap { trim: true });
        f.render_widget(p, chunks[1]);
    }

    let hints: &[(&str, &str)] = if app.edit_target.is_some() {
        &[("Enter", "done"), ("Esc", "revert"), ("Tab", "next field"), ("Ctrl+u", "upload")]
    } else {
        &[
            ("j/k", "move"),
            ("Enter", "edit"),
            ("Ctrl+u", "upload"),
            ("Tab", "next view"),
            ("q", "quit"),
        ]
    };
    f.render_widget(
        Paragraph::new(hint_line(hints, theme)).style(theme.footer_style()),
        footer_area,
    );
}

fn label_span(label: &str, theme: &crate::theme::Theme, selected: bool) -> Span<'static> {
    let style = if selected {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    Span::styled(format!("{label:<LABEL_WIDTH$}"), style)
}
