use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;

use papershelf_core::View;

use crate::app::App;

/// Render the view switcher across the top row.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let titles: Vec<Line> = View::all()
        .iter()
        .map(|v| {
            Line::from(vec![
                Span::styled(format!("{}", v.index() + 1), Style::default().fg(theme.dim)),
                Span::raw(" "),
                Span::raw(v.label()),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.session.view().index())
        .style(Style::default().fg(theme.text))
        .highlight_style(theme.header_style().add_modifier(Modifier::BOLD))
        .divider(Span::styled("|", Style::default().fg(theme.border)));
    f.render_widget(tabs, area);
}
