use std::path::PathBuf;

use papershelf_core::{FilterField, View};

use super::{App, EditTarget, InputMode, UploadRow};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(7);
                return false;
            }
            _ => {}
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack | Action::EditCancel => self.confirm_quit = false,
                _ => {}
            }
            return false;
        }

        if action == Action::Quit {
            return self.request_quit();
        }

        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack) {
                self.show_help = false;
            }
            return false;
        }

        if self.input_mode == InputMode::Editing {
            self.update_editing(action);
            return false;
        }

        if self.detail_open {
            match action {
                Action::NavigateBack | Action::DrillIn => self.detail_open = false,
                Action::MoveDown | Action::MoveUp => self.move_browse(action),
                _ => {}
            }
            return false;
        }

        match action {
            Action::NextTab => self.switch_view(self.session.view().next()),
            Action::PrevTab => self.switch_view(self.session.view().prev()),
            Action::SelectTab(i) => {
                if let Some(view) = View::from_index(i) {
                    self.switch_view(view);
                }
            }
            Action::ToggleHelp => self.show_help = true,
            Action::CycleTheme => self.cycle_theme(),
            _ => match self.session.view() {
                View::Browse => self.update_browse(action),
                View::Upload => self.update_upload(action),
                View::Manage => self.update_manage(action),
            },
        }
        false
    }

    /// Quit immediately unless an upload is still in flight.
    fn request_quit(&mut self) -> bool {
        if self.session.upload_in_flight() {
            self.confirm_quit = true;
            false
        } else {
            self.should_quit = true;
            true
        }
    }

    pub(crate) fn switch_view(&mut self, view: View) {
        self.detail_open = false;
        let request = self.session.select_view(view);
        self.dispatch(request);
    }

    fn update_browse(&mut self, action: Action) {
        match action {
            Action::MoveUp
            | Action::MoveDown
            | Action::PageUp
            | Action::PageDown
            | Action::GoTop
            | Action::GoBottom => self.move_browse(action),
            Action::DrillIn => {
                if !self.session.papers().is_empty() {
                    self.detail_open = true;
                }
            }
            Action::StartSearch => self.begin_edit(EditTarget::Query),
            Action::StartFilter => self.begin_edit(EditTarget::Filter(FilterField::Department)),
            Action::CycleSortField => {
                let next = self.session.filters().sort_field.next();
                let request = self.session.set_sort_field(next);
                self.dispatch(request);
            }
            Action::ToggleSortOrder => {
                let next = self.session.filters().sort_order.toggle();
                let request = self.session.set_sort_order(next);
                self.dispatch(request);
            }
            Action::ClearFilters => {
                let request = self.session.clear_filters();
                self.dispatch(request);
            }
            Action::Reload => {
                let request = self.session.reload();
                self.dispatch(request);
            }
            _ => {}
        }
    }

    fn update_upload(&mut self, action: Action) {
        let rows = UploadRow::all();
        match action {
            Action::MoveUp
            | Action::MoveDown
            | Action::PageUp
            | Action::PageDown
            | Action::GoTop
            | Action::GoBottom => {
                self.upload_cursor = step(self.upload_cursor, rows.len(), action, rows.len());
            }
            Action::DrillIn => match rows.get(self.upload_cursor) {
                Some(UploadRow::Field(field)) => self.begin_edit(EditTarget::Draft(*field)),
                Some(UploadRow::File) => self.begin_edit(EditTarget::File),
                Some(UploadRow::Submit) => self.submit_upload(),
                None => {}
            },
            Action::Submit => self.submit_upload(),
            Action::NavigateBack => self.session.dismiss_message(),
            _ => {}
        }
    }

    fn update_manage(&mut self, action: Action) {
        let len = self.session.uploaded().len();
        match action {
            Action::MoveUp
            | Action::MoveDown
            | Action::PageUp
            | Action::PageDown
            | Action::GoTop
            | Action::GoBottom => {
                self.manage_cursor = step(self.manage_cursor, len, action, self.visible_rows);
            }
            Action::DrillIn if len == 0 => self.switch_view(View::Upload),
            _ => {}
        }
    }

    fn move_browse(&mut self, action: Action) {
        let len = self.session.papers().len();
        self.browse_cursor = step(self.browse_cursor, len, action, self.visible_rows);
    }

    /// Validate the draft and hand it to the backend. Local validation
    /// failures stay in the form as a status message.
    pub(crate) fn submit_upload(&mut self) {
        if self.session.upload_in_flight() {
            return;
        }
        match self.session.begin_upload() {
            Ok(submission) => self.send(BackendCommand::Upload(submission)),
            Err(e) => tracing::debug!(error = %e, "upload rejected before sending"),
        }
    }

    // ── line editing ────────────────────────────────────────────────

    pub(crate) fn begin_edit(&mut self, target: EditTarget) {
        self.edit_original = self.target_value(target);
        self.editor.set(&self.edit_original);
        self.edit_target = Some(target);
        self.input_mode = InputMode::Editing;
    }

    fn update_editing(&mut self, action: Action) {
        let Some(target) = self.edit_target else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match action {
            Action::EditInput(c) => {
                self.editor.insert(c);
                self.sync_edit(target);
            }
            Action::EditBackspace => {
                self.editor.backspace();
                self.sync_edit(target);
            }
            Action::EditDelete => {
                self.editor.delete();
                self.sync_edit(target);
            }
            Action::CursorLeft => self.editor.left(),
            Action::CursorRight => self.editor.right(),
            Action::CursorHome => self.editor.home(),
            Action::CursorEnd => self.editor.end(),
            Action::EditConfirm => self.finish_edit(target),
            Action::EditCancel => {
                let original = self.edit_original.clone();
                self.editor.set(&original);
                self.sync_edit(target);
                self.end_edit();
            }
            Action::NextField | Action::PrevField => {
                self.finish_edit(target);
                let next = self.adjacent_target(target, action == Action::NextField);
                self.begin_edit(next);
            }
            Action::Submit => {
                if matches!(target, EditTarget::Draft(_) | EditTarget::File) {
                    self.finish_edit(target);
                    self.submit_upload();
                }
            }
            _ => {}
        }
    }

    /// Push the editor contents into the bound state. Read inputs refresh
    /// on every keystroke; the file path is only taken on confirm.
    fn sync_edit(&mut self, target: EditTarget) {
        let text = self.editor.as_str().to_string();
        match target {
            EditTarget::Query => {
                let request = self.session.set_query(text);
                self.dispatch(request);
            }
            EditTarget::Filter(field) => {
                let request = self.session.set_filter(field, text);
                self.dispatch(request);
            }
            EditTarget::Draft(field) => self.session.draft_mut().set_field(field, text),
            EditTarget::File => {}
        }
    }

    fn finish_edit(&mut self, target: EditTarget) {
        if target == EditTarget::File && self.editor.as_str() != self.edit_original {
            let raw = self.editor.as_str().trim();
            let path = (!raw.is_empty()).then(|| expand_home(raw));
            self.session.choose_file(path);
        }
        self.end_edit();
    }

    fn end_edit(&mut self) {
        self.edit_target = None;
        self.input_mode = InputMode::Normal;
    }

    /// The target Tab / Shift-Tab moves to from `target`.
    fn adjacent_target(&mut self, target: EditTarget, forward: bool) -> EditTarget {
        match target {
            EditTarget::Query | EditTarget::Filter(_) => {
                let mut ring = vec![EditTarget::Query];
                ring.extend(FilterField::all().iter().map(|f| EditTarget::Filter(*f)));
                let pos = ring.iter().position(|t| *t == target).unwrap_or(0);
                ring[rotate(pos, ring.len(), forward)]
            }
            EditTarget::Draft(_) | EditTarget::File => {
                // Every row but Submit is editable.
                let editable: Vec<UploadRow> = UploadRow::all()
                    .into_iter()
                    .filter(|r| *r != UploadRow::Submit)
                    .collect();
                self.upload_cursor = rotate(
                    self.upload_cursor.min(editable.len() - 1),
                    editable.len(),
                    forward,
                );
                match editable[self.upload_cursor] {
                    UploadRow::Field(field) => EditTarget::Draft(field),
                    _ => EditTarget::File,
                }
            }
        }
    }
}

fn rotate(pos: usize, len: usize, forward: bool) -> usize {
    if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    }
}

/// Move a list cursor for a navigation action, clamped to `len`.
fn step(cursor: usize, len: usize, action: Action, page: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    let page = page.max(1);
    match action {
        Action::MoveDown => (cursor + 1).min(last),
        Action::MoveUp => cursor.saturating_sub(1),
        Action::PageDown => (cursor + page).min(last),
        Action::PageUp => cursor.saturating_sub(page),
        Action::GoTop => 0,
        Action::GoBottom => last,
        _ => cursor.min(last),
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}
