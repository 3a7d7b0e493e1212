use papershelf_core::Reconciled;

use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::FetchComplete { ticket, outcome } => {
                let previous = self.selected_key();
                if self.session.complete_fetch(ticket, outcome) == Reconciled::Applied {
                    self.restore_selection(previous);
                }
            }
            BackendEvent::UploadComplete {
                submission,
                outcome,
            } => {
                let accepted = outcome.is_ok();
                let request = self.session.finish_upload(&submission, outcome);
                if accepted {
                    self.upload_cursor = 0;
                    self.manage_cursor = self.session.uploaded().len().saturating_sub(1);
                }
                self.dispatch(request);
            }
        }
    }
}
