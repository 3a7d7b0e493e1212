mod backend;
mod update;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tokio::sync::mpsc;

use papershelf_core::{DraftField, FetchRequest, FilterField, RowKey, Session, View};

use crate::model::edit::LineEditor;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;
use crate::view::spinner_char;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Which piece of state the line editor is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Query,
    Filter(FilterField),
    Draft(DraftField),
    File,
}

/// Rows of the upload form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRow {
    Field(DraftField),
    File,
    Submit,
}

impl UploadRow {
    pub fn all() -> Vec<UploadRow> {
        DraftField::all()
            .iter()
            .map(|f| UploadRow::Field(*f))
            .chain([UploadRow::File, UploadRow::Submit])
            .collect()
    }
}

/// Main application state.
pub struct App {
    pub session: Session,
    pub theme: Theme,
    pub theme_name: String,
    pub catalog_url: String,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    pub detail_open: bool,
    pub visible_rows: usize,

    pub input_mode: InputMode,
    pub editor: LineEditor,
    pub edit_target: Option<EditTarget>,
    /// Value of the edited slot before editing started, restored on cancel.
    pub edit_original: String,

    pub browse_cursor: usize,
    pub upload_cursor: usize,
    pub manage_cursor: usize,

    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(session: Session, theme_name: &str) -> Self {
        Self {
            session,
            theme: Theme::by_name(theme_name),
            theme_name: theme_name.to_string(),
            catalog_url: String::new(),
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            detail_open: false,
            visible_rows: 20,
            input_mode: InputMode::Normal,
            editor: LineEditor::default(),
            edit_target: None,
            edit_original: String::new(),
            browse_cursor: 0,
            upload_cursor: 0,
            manage_cursor: 0,
            backend_cmd_tx: None,
        }
    }

    /// Issue the first read for the current input.
    pub fn start(&mut self) {
        let request = self.session.reload();
        self.dispatch(request);
    }

    /// Hand an issued read to the backend, if there is one.
    pub(crate) fn dispatch(&mut self, request: Option<FetchRequest>) {
        let Some(request) = request else {
            return;
        };
        self.send(BackendCommand::Fetch(request));
    }

    pub(crate) fn send(&mut self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(cmd).is_err()
        {
            tracing::error!("backend channel closed");
        }
    }

    /// Key of the row under the browse cursor.
    pub fn selected_key(&self) -> Option<RowKey> {
        self.session
            .papers()
            .get(self.browse_cursor)
            .map(|p| p.row_key(self.browse_cursor))
    }

    /// After the list changed, put the cursor back on the same paper if it
    /// has a stable id and is still present; otherwise start from the top.
    pub(crate) fn restore_selection(&mut self, previous: Option<RowKey>) {
        let papers = self.session.papers();
        self.browse_cursor = previous
            .filter(RowKey::is_stable)
            .and_then(|key| {
                papers
                    .iter()
                    .enumerate()
                    .position(|(i, p)| p.row_key(i) == key)
            })
            .unwrap_or(0);
        if papers.is_empty() {
            self.detail_open = false;
        }
    }

    /// Cycle theme: hacker -> modern -> hacker.
    pub(crate) fn cycle_theme(&mut self) {
        let name = match self.theme_name.as_str() {
            "hacker" => "modern",
            _ => "hacker",
        };
        self.theme_name = name.to_string();
        self.theme = Theme::by_name(name);
    }

    /// Current value of whatever `target` points at.
    pub(crate) fn target_value(&self, target: EditTarget) -> String {
        match target {
            EditTarget::Query => self.session.query().to_string(),
            EditTarget::Filter(field) => self.session.filters().get(field).to_string(),
            EditTarget::Draft(field) => self.session.draft().field(field).to_string(),
            EditTarget::File => self
                .session
                .draft()
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    fn build_status_line(&self) -> Line<'static> {
        let theme = &self.theme;
        let state = self.session.fetch().state();
        let mut spans = vec![Span::styled(
            format!(" {} ", self.catalog_url),
            Style::default().fg(theme.dim),
        )];
        if self.session.is_loading() {
            spans.push(Span::styled(
                format!("{} ", spinner_char(self.tick)),
                Style::default().fg(theme.spinner),
            ));
        }
        spans.push(Span::styled(
            match state {
                papershelf_core::RequestState::Idle => "idle".to_string(),
                papershelf_core::RequestState::Loading => "loading".to_string(),
                papershelf_core::RequestState::Succeeded => {
                    format!("{} papers", self.session.papers().len())
                }
                papershelf_core::RequestState::Failed { .. } => "failed".to_string(),
            },
            Style::default().fg(theme.request_color(state)),
        ));
        Line::from(spans).alignment(Alignment::Right)
    }

    /// Render the current view.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        let chunks = Layout::vertical([
            Constraint::Length(1), // tabs
            Constraint::Min(3),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);
        let footer_area: Rect = chunks[2];

        crate::view::tabs::render(f, chunks[0], self);
        f.render_widget(Paragraph::new(self.build_status_line()), chunks[0]);

        match self.session.view() {
            View::Browse => crate::view::browse::render_in(f, self, chunks[1], footer_area),
            View::Upload => crate::view::upload::render_in(f, self, chunks[1], footer_area),
            View::Manage => crate::view::manage::render_in(f, self, chunks[1], footer_area),
        }

        if self.detail_open && self.session.view() == View::Browse {
            crate::view::detail::render(f, self);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}
