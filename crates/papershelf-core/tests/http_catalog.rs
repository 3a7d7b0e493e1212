//! End-to-end tests for [`HttpCatalog`] against a local axum server.
//!
//! Each test binds its own server on an ephemeral port so no external
//! service is contacted.

use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, RawQuery, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use papershelf_core::catalog::CatalogBackend;
use papershelf_core::{
    CatalogError, ClientConfig, DraftField, FilterField, FilterSet, HttpCatalog, PaperId,
    QueryDescriptor, ReconcilePolicy, RequestState, Session, UploadDraft,
};

/// Everything the fixture server saw.
#[derive(Default)]
struct Seen {
    paths: Vec<String>,
    queries: Vec<Option<String>>,
    upload_fields: Vec<(String, String)>,
    upload_file: Option<(String, String, usize)>,
}

type Shared = Arc<Mutex<Seen>>;

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn catalog(base: &str) -> HttpCatalog {
    let config = ClientConfig {
        base_url: base.to_string(),
        request_timeout: None,
    };
    HttpCatalog::new(&config).unwrap()
}

fn catalog_app(seen: Shared) -> Router {
    async fn papers(State(seen): State<Shared>, RawQuery(q): RawQuery) -> Json<Value> {
        let mut s = seen.lock().unwrap();
        s.paths.push("/papers".into());
        s.queries.push(q);
        Json(json!({
            "success": true,
            "count": 2,
            "papers": [
                {"id": 2, "title": "Newer", "authors": "B", "department": "CS",
                 "journal": "J", "publication_date": "2021-01-01", "keywords": "x",
                 "file_url": "https://files/2.pdf"},
                {"id": 1, "title": "Older", "authors": "A", "department": "CS",
                 "journal": "J", "publication_date": "2019-01-01", "keywords": null,
                 "file_url": null}
            ]
        }))
    }

    async fn search(State(seen): State<Shared>, RawQuery(q): RawQuery) -> Json<Value> {
        let mut s = seen.lock().unwrap();
        s.paths.push("/search".into());
        s.queries.push(q);
        Json(json!({
            "success": true,
            "count": 1,
            "papers": [{"id": "abc", "title": "Neural Fields", "publication_date": "2020"}]
        }))
    }

    async fn upload(State(seen): State<Shared>, mut multipart: Multipart) -> Json<Value> {
        let mut fields = Vec::new();
        let mut file = None;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or("").to_string();
            if name == "file" {
                let filename = field.file_name().unwrap_or("").to_string();
                let mime = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.unwrap();
                file = Some((filename, mime, data.len()));
            } else {
                fields.push((name, field.text().await.unwrap()));
            }
        }
        let mut s = seen.lock().unwrap();
        s.upload_fields = fields;
        s.upload_file = file;
        Json(json!({"message": "Upload successful", "file_url": "https://files/new.pdf"}))
    }

    Router::new()
        .route("/papers", get(papers))
        .route("/search", get(search))
        .route("/upload", post(upload))
        .with_state(seen)
}

fn failing_app() -> Router {
    Router::new()
        .route(
            "/search",
            get(|| async { Json(json!({"success": false, "error": "relation missing", "papers": [{"id": 9}]})) }),
        )
        .route("/papers", get(|| async { Json(json!({"papers": []})) }))
        .route(
            "/upload",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": "journal: field required"})),
                )
            }),
        )
}

/// Error statuses and unparseable bodies on the read endpoints.
fn broken_app() -> Router {
    Router::new()
        .route(
            "/search",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "search index unavailable"})),
                )
            }),
        )
        .route("/papers", get(|| async { "<html>maintenance</html>" }))
}

fn pdf_draft(dir: &tempfile::TempDir) -> UploadDraft {
    let path = dir.path().join("paper.pdf");
    std::fs::write(&path, b"%PDF-1.4\n%fake\n").unwrap();
    let mut draft = UploadDraft::default();
    for f in DraftField::all() {
        draft.set_field(*f, format!("{} value", f.form_name()));
    }
    draft.set_file(path);
    draft
}

#[tokio::test]
async fn listing_sends_no_parameters() {
    let seen = Shared::default();
    let base = spawn(catalog_app(seen.clone())).await;
    let c = catalog(&base);

    let papers = c.fetch(&QueryDescriptor::listing()).await.unwrap();
    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0].id, Some(PaperId::new("2")));
    assert_eq!(papers[1].keywords, None);

    let s = seen.lock().unwrap();
    assert_eq!(s.paths, vec!["/papers"]);
    assert_eq!(s.queries, vec![None]);
}

#[tokio::test]
async fn search_sends_canonical_query_string() {
    let seen = Shared::default();
    let base = spawn(catalog_app(seen.clone())).await;
    let c = catalog(&base);

    let filters = FilterSet {
        department: "Physics".into(),
        year: "2020".into(),
        ..Default::default()
    };
    let papers = c.fetch(&QueryDescriptor::build("", &filters)).await.unwrap();
    assert_eq!(papers[0].id, Some(PaperId::new("abc")));

    let s = seen.lock().unwrap();
    assert_eq!(s.paths, vec!["/search"]);
    assert_eq!(
        s.queries[0].as_deref(),
        Some("department=Physics&year=2020&sort_by=publication_date&sort_order=desc&limit=50")
    );
}

#[tokio::test]
async fn success_false_is_failure_despite_200() {
    let base = spawn(failing_app()).await;
    let c = catalog(&base);

    let err = c
        .fetch(&QueryDescriptor::build("neural", &FilterSet::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Rejected { .. }));
    assert_eq!(err.detail(), Some("relation missing"));

    let err = c.fetch(&QueryDescriptor::listing()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Rejected { message: None }));
}

#[tokio::test]
async fn error_status_on_read_carries_detail() {
    let base = spawn(broken_app()).await;
    let c = catalog(&base);

    let err = c
        .fetch(&QueryDescriptor::build("neural", &FilterSet::default()))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        CatalogError::Status { status: 500, detail: Some(d) } if d == "search index unavailable"
    ));
    assert!(err.is_application());
}

#[tokio::test]
async fn non_json_body_on_read_is_transport_failure() {
    let base = spawn(broken_app()).await;
    let c = catalog(&base);

    let err = c.fetch(&QueryDescriptor::listing()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Http(_)));
    assert!(!err.is_application());
}

#[tokio::test]
async fn session_fails_read_on_error_status_and_bad_body() {
    let seen = Shared::default();
    let good = catalog(&spawn(catalog_app(seen)).await);
    let bad = catalog(&spawn(broken_app()).await);
    let mut session = Session::with_policy(ReconcilePolicy::LatestIssued);

    let req = session.reload().unwrap();
    let outcome = good.fetch(&req.descriptor).await;
    session.complete_fetch(req.ticket, outcome);
    assert_eq!(session.papers().len(), 2);

    let req = session.set_query("neural").unwrap();
    let outcome = bad.fetch(&req.descriptor).await;
    session.complete_fetch(req.ticket, outcome);
    assert!(session.fetch().state().is_failed());
    assert!(session.papers().is_empty());

    let req = session.clear_filters().unwrap();
    let outcome = bad.fetch(&req.descriptor).await;
    session.complete_fetch(req.ticket, outcome);
    assert!(session.fetch().state().is_failed());
    assert!(session.papers().is_empty());
}

#[tokio::test]
async fn null_papers_read_succeeds_empty() {
    let app = Router::new().route(
        "/papers",
        get(|| async { Json(json!({"success": true, "count": 0, "papers": null})) }),
    );
    let c = catalog(&spawn(app).await);
    let mut session = Session::new();

    let req = session.reload().unwrap();
    let outcome = c.fetch(&req.descriptor).await;
    session.complete_fetch(req.ticket, outcome);
    assert_eq!(session.fetch().state(), &RequestState::Succeeded);
    assert!(session.papers().is_empty());
}

#[tokio::test]
async fn session_clears_results_on_failed_read() {
    let base = spawn(failing_app()).await;
    let c = catalog(&base);
    let mut session = Session::with_policy(ReconcilePolicy::LatestIssued);

    let req = session.set_filter(FilterField::Journal, "Nature").unwrap();
    let outcome = c.fetch(&req.descriptor).await;
    session.complete_fetch(req.ticket, outcome);

    assert!(session.fetch().state().is_failed());
    assert!(session.papers().is_empty());
}

#[tokio::test]
async fn upload_sends_all_parts() {
    let seen = Shared::default();
    let base = spawn(catalog_app(seen.clone())).await;
    let c = catalog(&base);
    let dir = tempfile::tempdir().unwrap();

    let submission = pdf_draft(&dir).to_submission().unwrap();
    let receipt = c.upload(submission).await.unwrap();
    assert_eq!(receipt.file_url.as_deref(), Some("https://files/new.pdf"));

    let s = seen.lock().unwrap();
    let names: Vec<&str> = s.upload_fields.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec!["title", "authors", "department", "publication_date", "journal", "keywords"]
    );
    assert_eq!(s.upload_fields[0].1, "title value");
    let (filename, mime, len) = s.upload_file.clone().unwrap();
    assert_eq!(filename, "paper.pdf");
    assert_eq!(mime, "application/pdf");
    assert_eq!(len, 15);
}

#[tokio::test]
async fn upload_failure_surfaces_detail() {
    let base = spawn(failing_app()).await;
    let c = catalog(&base);
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new();
    *session.draft_mut() = pdf_draft(&dir);
    let before = session.draft().clone();

    let submission = session.begin_upload().unwrap();
    let outcome = c.upload(submission.clone()).await;
    assert!(matches!(
        outcome,
        Err(CatalogError::Status { status: 422, .. })
    ));
    session.finish_upload(&submission, outcome);

    assert_eq!(
        session.message().unwrap().text,
        "Upload failed: journal: field required"
    );
    assert_eq!(session.draft(), &before);
}

#[tokio::test]
async fn unreadable_file_is_transport_failure() {
    let seen = Shared::default();
    let base = spawn(catalog_app(seen.clone())).await;
    let c = catalog(&base);

    let mut draft = pdf_draft(&tempfile::tempdir().unwrap());
    draft.set_file("/definitely/not/here.pdf");
    let err = c.upload(draft.to_submission().unwrap()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(_)));
    assert!(seen.lock().unwrap().upload_file.is_none());
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = catalog(&format!("http://{addr}"));
    let err = c.fetch(&QueryDescriptor::listing()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Http(_)));
    assert!(!err.is_application());
}
