//! Catalog service contract and its implementations.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{PaperRecord, null_as_default};
use crate::query::QueryDescriptor;
use crate::upload::{UploadReceipt, UploadSubmission};

pub use http::HttpCatalog;

pub type CatalogFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'a>>;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport or decoding failure reported by the HTTP client.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Transport(String),
    /// Non-success HTTP status.
    #[error("HTTP {status}")]
    Status { status: u16, detail: Option<String> },
    /// The call went through but the payload signals failure (or lacks the
    /// success indicator).
    #[error("catalog rejected the request: {}", .message.as_deref().unwrap_or("no detail"))]
    Rejected { message: Option<String> },
}

impl CatalogError {
    /// Server-provided explanation, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CatalogError::Status { detail, .. } => detail.as_deref(),
            CatalogError::Rejected { message } => message.as_deref(),
            _ => None,
        }
    }

    /// True for application-level failures (as opposed to transport ones).
    pub fn is_application(&self) -> bool {
        matches!(
            self,
            CatalogError::Status { .. } | CatalogError::Rejected { .. }
        )
    }
}

/// Body of a read endpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub papers: Vec<PaperRecord>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ReadResponse {
    /// Accept the payload only when it carries an explicit success flag.
    pub fn into_papers(self) -> Result<Vec<PaperRecord>, CatalogError> {
        if self.success {
            Ok(self.papers)
        } else {
            Err(CatalogError::Rejected {
                message: self.error,
            })
        }
    }
}

/// Body of an upload response. Failures carry `detail`; an accepted
/// upload is acknowledged with `success: true` or the stored `file_url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl UploadResponse {
    pub fn into_receipt(self) -> Result<UploadReceipt, CatalogError> {
        let acknowledged = match self.success {
            Some(flag) => flag,
            None => self.file_url.is_some(),
        };
        if acknowledged {
            Ok(UploadReceipt {
                message: self.message,
                file_url: self.file_url,
            })
        } else {
            Err(CatalogError::Rejected {
                message: self.detail,
            })
        }
    }
}

/// A remote catalog that can list, search and accept new records.
pub trait CatalogBackend: Send + Sync {
    /// Short name for logs (usually the service location).
    fn name(&self) -> &str;

    /// Execute a read against the endpoint selected by the descriptor.
    fn fetch<'a>(&'a self, descriptor: &'a QueryDescriptor) -> CatalogFuture<'a, Vec<PaperRecord>>;

    /// Submit a new record with its file as one multipart request.
    fn upload<'a>(&'a self, submission: UploadSubmission) -> CatalogFuture<'a, UploadReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_without_success_flag_is_rejected() {
        let body: ReadResponse =
            serde_json::from_str(r#"{"papers": [{"title": "x"}]}"#).unwrap();
        assert!(matches!(
            body.into_papers(),
            Err(CatalogError::Rejected { message: None })
        ));
    }

    #[test]
    fn read_failure_carries_server_error() {
        let body: ReadResponse =
            serde_json::from_str(r#"{"success": false, "error": "db down", "papers": []}"#)
                .unwrap();
        let err = body.into_papers().unwrap_err();
        assert_eq!(err.detail(), Some("db down"));
        assert!(err.is_application());
    }

    #[test]
    fn read_success_yields_papers() {
        let body: ReadResponse = serde_json::from_str(
            r#"{"success": true, "count": 2, "papers": [{"id": 1}, {"id": 2}]}"#,
        )
        .unwrap();
        assert_eq!(body.count, Some(2));
        assert_eq!(body.into_papers().unwrap().len(), 2);
    }

    #[test]
    fn null_papers_is_an_empty_success() {
        let body: ReadResponse =
            serde_json::from_str(r#"{"success": true, "papers": null}"#).unwrap();
        assert!(body.into_papers().unwrap().is_empty());
    }

    #[test]
    fn record_with_null_column_is_kept() {
        let body: ReadResponse = serde_json::from_str(
            r#"{"success": true, "papers": [
                {"id": 1, "title": "A", "department": null},
                {"id": 2, "title": "B", "department": "CS"}
            ]}"#,
        )
        .unwrap();
        let papers = body.into_papers().unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title, "A");
        assert!(papers[0].department.is_empty());
    }

    #[test]
    fn upload_acknowledged_by_file_url() {
        let body: UploadResponse = serde_json::from_str(
            r#"{"message": "Upload successful", "file_url": "https://x/y.pdf"}"#,
        )
        .unwrap();
        let receipt = body.into_receipt().unwrap();
        assert_eq!(receipt.file_url.as_deref(), Some("https://x/y.pdf"));
    }

    #[test]
    fn upload_without_acknowledgement_is_rejected() {
        let body: UploadResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(body.into_receipt().is_err());

        let body: UploadResponse =
            serde_json::from_str(r#"{"success": false, "file_url": "https://x/y.pdf"}"#).unwrap();
        assert!(body.into_receipt().is_err());
    }
}
