//! Single state container for the client.
//!
//! All mutation goes through named methods. Input changes are funnelled
//! through [`Session::apply`], which yields at most one [`FetchRequest`]
//! per call: only when something actually changed and the Browse view is
//! active afterwards. The caller executes the request and hands the outcome
//! back with [`Session::complete_fetch`].

use crate::catalog::CatalogError;
use crate::fetch::{FetchCoordinator, FetchRequest, ReconcilePolicy, Reconciled, RequestTicket};
use crate::model::PaperRecord;
use crate::query::{FilterField, FilterSet, QueryDescriptor, SortField, SortOrder};
use crate::upload::{
    UPLOAD_SUCCESS_MESSAGE, UploadDraft, UploadError, UploadReceipt, UploadSubmission,
    UploadedPaper,
};
use crate::view::View;

/// One user-driven change to the read inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputChange {
    View(View),
    Query(String),
    Filter(FilterField, String),
    SortField(SortField),
    SortOrder(SortOrder),
    /// Reset filters, sort and free text.
    ClearAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Status line shown in the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    view: View,
    query: String,
    filters: FilterSet,
    fetch: FetchCoordinator,
    draft: UploadDraft,
    upload_in_flight: bool,
    message: Option<StatusMessage>,
    uploaded: Vec<UploadedPaper>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReconcilePolicy) -> Self {
        Self {
            fetch: FetchCoordinator::with_policy(policy),
            ..Self::default()
        }
    }

    // ── read-only accessors ─────────────────────────────────────────

    pub fn view(&self) -> View {
        self.view
    }

    /// Raw free text as typed (untrimmed).
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn fetch(&self) -> &FetchCoordinator {
        &self.fetch
    }

    pub fn papers(&self) -> &[PaperRecord] {
        self.fetch.papers()
    }

    pub fn draft(&self) -> &UploadDraft {
        &self.draft
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn uploaded(&self) -> &[UploadedPaper] {
        &self.uploaded
    }

    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading() || self.upload_in_flight
    }

    /// Descriptor for the current input.
    pub fn descriptor(&self) -> QueryDescriptor {
        QueryDescriptor::build(&self.query, &self.filters)
    }

    // ── read inputs ─────────────────────────────────────────────────

    /// Apply a batch of input changes and decide whether a refresh is due.
    pub fn apply(&mut self, changes: impl IntoIterator<Item = InputChange>) -> Option<FetchRequest> {
        let mut changed = false;
        for change in changes {
            changed |= self.apply_one(change);
        }
        if changed {
            self.reload()
        } else {
            None
        }
    }

    fn apply_one(&mut self, change: InputChange) -> bool {
        match change {
            InputChange::View(view) => {
                let changed = self.view != view;
                self.view = view;
                changed
            }
            InputChange::Query(query) => {
                let changed = self.query != query;
                self.query = query;
                changed
            }
            InputChange::Filter(field, value) => self.filters.set(field, value),
            InputChange::SortField(field) => {
                let changed = self.filters.sort_field != field;
                self.filters.sort_field = field;
                changed
            }
            InputChange::SortOrder(order) => {
                let changed = self.filters.sort_order != order;
                self.filters.sort_order = order;
                changed
            }
            InputChange::ClearAll => {
                let changed = !self.query.is_empty() || self.filters != FilterSet::default();
                self.query.clear();
                self.filters.clear();
                changed
            }
        }
    }

    pub fn select_view(&mut self, view: View) -> Option<FetchRequest> {
        self.apply([InputChange::View(view)])
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> Option<FetchRequest> {
        self.apply([InputChange::Query(query.into())])
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) -> Option<FetchRequest> {
        self.apply([InputChange::Filter(field, value.into())])
    }

    pub fn set_sort_field(&mut self, field: SortField) -> Option<FetchRequest> {
        self.apply([InputChange::SortField(field)])
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> Option<FetchRequest> {
        self.apply([InputChange::SortOrder(order)])
    }

    pub fn clear_filters(&mut self) -> Option<FetchRequest> {
        self.apply([InputChange::ClearAll])
    }

    /// Re-issue the current read regardless of whether input changed.
    /// Used for the initial load and explicit reloads; still gated on Browse.
    pub fn reload(&mut self) -> Option<FetchRequest> {
        if self.view != View::Browse {
            return None;
        }
        let descriptor = self.descriptor();
        Some(self.fetch.begin(descriptor))
    }

    pub fn complete_fetch(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<PaperRecord>, CatalogError>,
    ) -> Reconciled {
        self.fetch.complete(ticket, outcome)
    }

    // ── upload flow ─────────────────────────────────────────────────

    pub fn draft_mut(&mut self) -> &mut UploadDraft {
        &mut self.draft
    }

    /// Select (or clear) the file to upload. Clears the status message.
    pub fn choose_file(&mut self, path: Option<std::path::PathBuf>) {
        match path {
            Some(p) => self.draft.set_file(p),
            None => self.draft.clear_file(),
        }
        self.message = None;
    }

    /// Validate the draft and mark an upload as in flight. Local validation
    /// failures never leave this method as a submission.
    pub fn begin_upload(&mut self) -> Result<UploadSubmission, UploadError> {
        match self.draft.to_submission() {
            Ok(submission) => {
                self.upload_in_flight = true;
                self.message = None;
                Ok(submission)
            }
            Err(e) => {
                self.message = Some(StatusMessage::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Reconcile the outcome of an upload. On success the draft is reset
    /// and, if Browse is active, a refresh of the current input is issued.
    /// On failure the draft is kept as is.
    pub fn finish_upload(
        &mut self,
        submission: &UploadSubmission,
        outcome: Result<UploadReceipt, CatalogError>,
    ) -> Option<FetchRequest> {
        self.upload_in_flight = false;
        match outcome {
            Ok(receipt) => {
                tracing::info!(
                    title = %submission.title,
                    file_url = receipt.file_url.as_deref().unwrap_or(""),
                    "upload accepted"
                );
                self.uploaded.push(UploadedPaper {
                    title: submission.title.clone(),
                    authors: submission.authors.clone(),
                    file_name: submission.file_name(),
                    file_url: receipt.file_url,
                });
                self.draft.reset();
                self.message = Some(StatusMessage::success(UPLOAD_SUCCESS_MESSAGE));
                self.reload()
            }
            Err(e) => {
                let err = UploadError::from(e);
                tracing::warn!(error = %err, "upload failed");
                self.message = Some(StatusMessage::error(err.user_message()));
                None
            }
        }
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }
}
