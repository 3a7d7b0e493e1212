//! Mock catalog for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{CatalogBackend, CatalogError, CatalogFuture};
use crate::model::PaperRecord;
use crate::query::QueryDescriptor;
use crate::upload::{UploadReceipt, UploadSubmission};

/// A configurable read response for [`MockCatalog`].
#[derive(Clone, Debug)]
pub enum MockRead {
    Papers(Vec<PaperRecord>),
    /// HTTP 200 with `success: false`.
    Rejected(Option<String>),
    /// Simulate an unreachable server.
    Unreachable,
}

/// A configurable upload response for [`MockCatalog`].
#[derive(Clone, Debug)]
pub enum MockUpload {
    Accepted { file_url: Option<String> },
    Status { status: u16, detail: Option<String> },
    Unreachable,
}

/// A hand-rolled mock implementing [`CatalogBackend`] for tests.
///
/// Reads come from a sequence (the last entry repeats once it is
/// exhausted) with optional per-call latency. Every descriptor and
/// submission is recorded.
pub struct MockCatalog {
    reads: Mutex<Vec<MockRead>>,
    fallback: MockRead,
    upload: MockUpload,
    delay: Option<Duration>,
    fetch_count: AtomicUsize,
    descriptors: Mutex<Vec<QueryDescriptor>>,
    submissions: Mutex<Vec<UploadSubmission>>,
}

impl MockCatalog {
    /// Create a mock that always answers reads with `read`.
    pub fn new(read: MockRead) -> Self {
        Self {
            reads: Mutex::new(Vec::new()),
            fallback: read,
            upload: MockUpload::Accepted { file_url: None },
            delay: None,
            fetch_count: AtomicUsize::new(0),
            descriptors: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Answer reads in order, repeating the last one.
    pub fn with_sequence(mut reads: Vec<MockRead>) -> Self {
        assert!(!reads.is_empty(), "sequence must have at least one response");
        reads.reverse();
        let mut mock = Self::new(reads[0].clone());
        mock.reads = Mutex::new(reads);
        mock
    }

    pub fn with_upload(mut self, upload: MockUpload) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn descriptors(&self) -> Vec<QueryDescriptor> {
        self.descriptors.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<UploadSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    fn next_read(&self) -> MockRead {
        self.reads
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl CatalogBackend for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch<'a>(&'a self, descriptor: &'a QueryDescriptor) -> CatalogFuture<'a, Vec<PaperRecord>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.descriptors.lock().unwrap().push(descriptor.clone());
        let read = self.next_read();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            match read {
                MockRead::Papers(papers) => Ok(papers),
                MockRead::Rejected(message) => Err(CatalogError::Rejected { message }),
                MockRead::Unreachable => Err(CatalogError::Transport("connection refused".into())),
            }
        })
    }

    fn upload<'a>(&'a self, submission: UploadSubmission) -> CatalogFuture<'a, UploadReceipt> {
        self.submissions.lock().unwrap().push(submission);
        let upload = self.upload.clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            match upload {
                MockUpload::Accepted { file_url } => Ok(UploadReceipt {
                    message: Some("Upload successful".into()),
                    file_url,
                }),
                MockUpload::Status { status, detail } => {
                    Err(CatalogError::Status { status, detail })
                }
                MockUpload::Unreachable => Err(CatalogError::Transport("connection refused".into())),
            }
        })
    }
}
