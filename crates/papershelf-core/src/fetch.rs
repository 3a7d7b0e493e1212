//! Read-request lifecycle: issue, await, reconcile.
//!
//! Requests are never cancelled. Every issued request carries a
//! [`RequestTicket`]; how completions that arrive out of order are treated
//! depends on the [`ReconcilePolicy`].

use crate::catalog::{CatalogBackend, CatalogError};
use crate::model::PaperRecord;
use crate::query::QueryDescriptor;

/// Monotonically increasing tag of an issued read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// A read that has been issued and must be executed by the caller, then
/// handed back through [`FetchCoordinator::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: RequestTicket,
    pub descriptor: QueryDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed {
        reason: String,
    },
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RequestState::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Apply a completion only if it belongs to the most recently issued
    /// request; older completions are dropped.
    #[default]
    LatestIssued,
    /// Apply every completion; whichever arrives last wins, even if it was
    /// issued earlier.
    LastArrival,
}

/// What `complete` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Applied,
    Discarded,
}

/// Owner of the read state and the visible result list.
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    state: RequestState,
    papers: Vec<PaperRecord>,
    policy: ReconcilePolicy,
    last_issued: u64,
    outstanding: usize,
}

impl FetchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ReconcilePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Records currently shown. Always empty while the state is Failed;
    /// while Loading, the last reconciled list stays visible.
    pub fn papers(&self) -> &[PaperRecord] {
        &self.papers
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Number of issued requests that have not completed yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn latest_ticket(&self) -> Option<RequestTicket> {
        (self.last_issued > 0).then_some(RequestTicket(self.last_issued))
    }

    /// Issue a new read and enter Loading.
    pub fn begin(&mut self, descriptor: QueryDescriptor) -> FetchRequest {
        self.last_issued += 1;
        self.outstanding += 1;
        self.state = RequestState::Loading;
        let ticket = RequestTicket(self.last_issued);
        tracing::debug!(
            seq = ticket.seq(),
            endpoint = %descriptor.endpoint(),
            query = %descriptor.query,
            "issuing catalog read"
        );
        FetchRequest { ticket, descriptor }
    }

    /// Reconcile the outcome of a previously issued read.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<Vec<PaperRecord>, CatalogError>,
    ) -> Reconciled {
        self.outstanding = self.outstanding.saturating_sub(1);

        if self.policy == ReconcilePolicy::LatestIssued && ticket.seq() != self.last_issued {
            tracing::debug!(
                seq = ticket.seq(),
                latest = self.last_issued,
                "discarding stale catalog read"
            );
            return Reconciled::Discarded;
        }

        match outcome {
            Ok(papers) => {
                tracing::debug!(seq = ticket.seq(), count = papers.len(), "catalog read complete");
                self.papers = papers;
                self.state = RequestState::Succeeded;
            }
            Err(e) => {
                tracing::warn!(seq = ticket.seq(), error = %e, "catalog read failed");
                self.papers.clear();
                self.state = RequestState::Failed {
                    reason: e.to_string(),
                };
            }
        }
        Reconciled::Applied
    }

    /// Issue, await and reconcile a single read.
    pub async fn refresh(
        &mut self,
        backend: &dyn CatalogBackend,
        descriptor: QueryDescriptor,
    ) -> &RequestState {
        let request = self.begin(descriptor);
        let outcome = backend.fetch(&request.descriptor).await;
        self.complete(request.ticket, outcome);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::catalog::mock::{MockCatalog, MockRead};
    use crate::model::PaperId;
    use crate::query::FilterSet;

    fn paper(id: &str) -> PaperRecord {
        PaperRecord {
            id: Some(PaperId::new(id)),
            title: format!("Paper {id}"),
            ..Default::default()
        }
    }

    fn descriptor(q: &str) -> QueryDescriptor {
        QueryDescriptor::build(q, &FilterSet::default())
    }

    #[test]
    fn begin_enters_loading() {
        let mut fc = FetchCoordinator::new();
        assert_eq!(fc.state(), &RequestState::Idle);
        let req = fc.begin(descriptor("x"));
        assert!(fc.is_loading());
        assert_eq!(req.ticket.seq(), 1);
        assert_eq!(fc.outstanding(), 1);
    }

    #[test]
    fn success_replaces_list() {
        let mut fc = FetchCoordinator::new();
        let a = fc.begin(descriptor("a"));
        fc.complete(a.ticket, Ok(vec![paper("1"), paper("2")]));
        assert_eq!(fc.papers().len(), 2);

        let b = fc.begin(descriptor("b"));
        // Previous list stays visible while loading.
        assert_eq!(fc.papers().len(), 2);
        fc.complete(b.ticket, Ok(vec![paper("3")]));
        assert_eq!(fc.state(), &RequestState::Succeeded);
        assert_eq!(fc.papers(), &[paper("3")]);
    }

    #[test]
    fn failure_clears_list() {
        let mut fc = FetchCoordinator::new();
        let a = fc.begin(descriptor("a"));
        fc.complete(a.ticket, Ok(vec![paper("1")]));

        let b = fc.begin(descriptor("b"));
        fc.complete(b.ticket, Err(CatalogError::Rejected { message: None }));
        assert!(fc.state().is_failed());
        assert!(fc.papers().is_empty());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut fc = FetchCoordinator::new();
        let first = fc.begin(descriptor("n"));
        let second = fc.begin(descriptor("ne"));

        assert_eq!(
            fc.complete(second.ticket, Ok(vec![paper("new")])),
            Reconciled::Applied
        );
        assert_eq!(
            fc.complete(first.ticket, Ok(vec![paper("old")])),
            Reconciled::Discarded
        );
        assert_eq!(fc.papers(), &[paper("new")]);
        assert_eq!(fc.state(), &RequestState::Succeeded);
        assert_eq!(fc.outstanding(), 0);
    }

    #[test]
    fn stale_completion_keeps_loading() {
        let mut fc = FetchCoordinator::new();
        let first = fc.begin(descriptor("n"));
        let _second = fc.begin(descriptor("ne"));

        fc.complete(first.ticket, Err(CatalogError::Transport("boom".into())));
        assert!(fc.is_loading());
        assert!(fc.papers().is_empty());
    }

    #[test]
    fn last_arrival_reproduces_race() {
        let mut fc = FetchCoordinator::with_policy(ReconcilePolicy::LastArrival);
        let first = fc.begin(descriptor("n"));
        let second = fc.begin(descriptor("ne"));

        fc.complete(second.ticket, Ok(vec![paper("new")]));
        assert_eq!(
            fc.complete(first.ticket, Ok(vec![paper("old")])),
            Reconciled::Applied
        );
        assert_eq!(fc.papers(), &[paper("old")]);
    }

    #[test]
    fn failed_never_shows_results() {
        let mut fc = FetchCoordinator::with_policy(ReconcilePolicy::LastArrival);
        let outcomes: Vec<Result<Vec<PaperRecord>, CatalogError>> = vec![
            Ok(vec![paper("1")]),
            Err(CatalogError::Rejected { message: None }),
            Ok(vec![paper("2"), paper("3")]),
            Err(CatalogError::Status {
                status: 500,
                detail: None,
            }),
        ];
        for outcome in outcomes {
            let req = fc.begin(descriptor("x"));
            fc.complete(req.ticket, outcome);
            if fc.state().is_failed() {
                assert!(fc.papers().is_empty());
            }
        }
    }

    #[tokio::test]
    async fn refresh_applies_success_flag_failure() {
        let catalog = MockCatalog::new(MockRead::Rejected(None));
        let mut fc = FetchCoordinator::new();
        let state = fc.refresh(&catalog, descriptor("neural")).await.clone();
        assert!(state.is_failed());
        assert!(fc.papers().is_empty());
        assert_eq!(catalog.fetch_count(), 1);
    }

    #[tokio::test]
    async fn refresh_records_descriptor() {
        let catalog = MockCatalog::new(MockRead::Papers(vec![paper("1")]));
        let mut fc = FetchCoordinator::new();
        fc.refresh(&catalog, descriptor("neural")).await;
        assert_eq!(fc.papers(), &[paper("1")]);
        assert_eq!(catalog.descriptors(), vec![descriptor("neural")]);
    }

    #[tokio::test]
    async fn recovery_after_unreachable() {
        let catalog = MockCatalog::with_sequence(vec![
            MockRead::Unreachable,
            MockRead::Papers(vec![paper("1")]),
        ]);
        let mut fc = FetchCoordinator::new();

        fc.refresh(&catalog, descriptor("a")).await;
        assert!(fc.state().is_failed());

        fc.refresh(&catalog, descriptor("a")).await;
        assert_eq!(fc.state(), &RequestState::Succeeded);
        assert_eq!(fc.papers(), &[paper("1")]);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_reads_resolve_to_latest() {
        let slow = MockCatalog::new(MockRead::Papers(vec![paper("old")]))
            .with_delay(Duration::from_millis(200));
        let fast = MockCatalog::new(MockRead::Papers(vec![paper("new")]));

        let mut fc = FetchCoordinator::new();
        let first = fc.begin(descriptor("n"));
        let second = fc.begin(descriptor("ne"));

        let (old, new) = tokio::join!(
            slow.fetch(&first.descriptor),
            fast.fetch(&second.descriptor)
        );
        // `new` resolves first in wall time; apply in arrival order.
        fc.complete(second.ticket, new);
        fc.complete(first.ticket, old);

        assert_eq!(fc.papers(), &[paper("new")]);
    }
}
