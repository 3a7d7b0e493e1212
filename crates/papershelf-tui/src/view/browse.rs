use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use papershelf_core::{FilterField, RequestState};

use crate::app::{App, EditTarget};
use crate::theme::Theme;
use crate::view::{edit_spans, spinner_char, truncate};

/// Render the Browse view into the given area.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect, footer_area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // search bar
        Constraint::Length(1), // filters + sort
        Constraint::Min(3),    // results
    ])
    .split(area);

    render_search_bar(f, chunks[0], app);
    render_filter_bar(f, chunks[1], app);
    render_results(f, chunks[2], app);
    render_footer(f, footer_area, app);
}

fn render_search_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " / ",
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    )];
    if app.edit_target == Some(EditTarget::Query) {
        spans.extend(edit_spans(&app.editor, theme));
    } else if app.session.query().is_empty() {
        spans.push(Span::styled(
            "Search papers...",
            Style::default().fg(theme.dim),
        ));
    } else {
        spans.push(Span::styled(
            app.session.query(),
            Style::default().fg(theme.text),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let filters = app.session.filters();
    let mut spans = vec![Span::raw(" ")];

    for field in FilterField::all() {
        spans.push(Span::styled(
            format!("{}: ", field.label()),
            Style::default().fg(theme.dim),
        ));
        if app.edit_target == Some(EditTarget::Filter(*field)) {
            spans.extend(edit_spans(&app.editor, theme));
        } else {
            let value = filters.get(*field);
            if value.is_empty() {
                spans.push(Span::styled("any", Style::default().fg(theme.dim)));
            } else {
                spans.push(Span::styled(
                    value.to_string(),
                    Style::default().fg(theme.active),
                ));
            }
        }
        spans.push(Span::raw("  "));
    }

    spans.push(Span::styled("Sort: ", Style::default().fg(theme.dim)));
    spans.push(Span::styled(
        format!(
            "{} ({})",
            filters.sort_field.label(),
            filters.sort_order.label()
        ),
        Style::default().fg(theme.text),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_results(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let papers = app.session.papers();
    let state = app.session.fetch().state();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" {} results ", papers.len()));

    if papers.is_empty() {
        let (text, color) = match state {
            RequestState::Failed { reason } => (format!("Failed to load papers: {reason}"), theme.error),
            RequestState::Loading | RequestState::Idle => {
                (format!("{} Loading papers...", spinner_char(app.tick)), theme.loading)
            }
            RequestState::Succeeded => ("No papers found".to_string(), theme.dim),
        };
        let p = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let wide = area.width >= 100;
    let title_width = if wide {
        (area.width as usize).saturating_sub(70)
    } else {
        (area.width as usize).saturating_sub(30)
    };

    let header_cells: &[&str] = if wide {
        &["#", "Title", "Authors", "Department", "Journal", "Year"]
    } else {
        &["#", "Title", "Authors", "Year"]
    };
    let header = Row::new(header_cells.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
    }))
    .height(1);

    let rows: Vec<Row> = papers
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let num = Cell::from(format!("{}", i + 1)).style(Style::default().fg(theme.dim));
            let title = Cell::from(truncate(&p.title, title_width));
            let authors = Cell::from(truncate(&p.authors, 20)).style(Style::default().fg(theme.dim));
            let year = Cell::from(p.publication_year());
            if wide {
                Row::new(vec![
                    num,
                    title,
                    authors,
                    Cell::from(truncate(&p.department, 16)),
                    Cell::from(truncate(&p.journal, 18)),
                    year,
                ])
            } else {
                Row::new(vec![num, title, authors, year])
            }
        })
        .collect();

    let widths: Vec<Constraint> = if wide {
        vec![
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(20),
            Constraint::Length(16),
            Constraint::Length(18),
            Constraint::Length(6),
        ]
    } else {
        vec![
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(20),
            Constraint::Length(6),
        ]
    };

    let loading_title = if state.is_loading() {
        format!(" {} refreshing ", spinner_char(app.tick))
    } else {
        String::new()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title_bottom(Line::from(Span::styled(
            loading_title,
            Style::default().fg(theme.loading),
        ))))
        .row_highlight_style(theme.highlight_style());

    let mut table_state = TableState::default().with_selected(Some(app.browse_cursor));
    f.render_stateful_widget(table, area, &mut table_state);
    app.visible_rows = (area.height as usize).saturating_sub(3);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let hints: &[(&str, &str)] = if app.edit_target.is_some() {
        &[("Enter", "done"), ("Esc", "revert"), ("Tab", "next field")]
    } else {
        &[
            ("/", "search"),
            ("f", "filter"),
            ("s", "sort"),
            ("o", "order"),
            ("c", "clear"),
            ("Enter", "details"),
            ("?", "help"),
            ("q", "quit"),
        ]
    };
    f.render_widget(Paragraph::new(hint_line(hints, theme)).style(theme.footer_style()), area);
}

/// Key hint line shared by the view footers.
pub(crate) fn hint_line(hints: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (key, desc) in hints {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(":{desc} "), Style::default().fg(theme.footer_fg)));
    }
    Line::from(spans)
}
