//! [`CatalogBackend`] over HTTP with reqwest.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::{CatalogBackend, CatalogError, CatalogFuture, ReadResponse, UploadResponse};
use crate::ClientConfig;
use crate::model::PaperRecord;
use crate::query::{Endpoint, QueryDescriptor};
use crate::upload::{UploadReceipt, UploadSubmission};

const USER_AGENT: &str = concat!("papershelf/", env!("CARGO_PKG_VERSION"));

/// Catalog reached over HTTP.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpCatalog {
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &ClientConfig, client: reqwest::Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            timeout: config.request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a read. The listing endpoint never gets a query string.
    pub fn read_url(&self, descriptor: &QueryDescriptor) -> String {
        let endpoint = descriptor.endpoint();
        match endpoint {
            Endpoint::Listing => format!("{}{}", self.base_url, endpoint.path()),
            Endpoint::Search => format!(
                "{}{}?{}",
                self.base_url,
                endpoint.path(),
                descriptor.query_string()
            ),
        }
    }

    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    fn apply_timeout(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.timeout {
            Some(t) => req.timeout(t),
            None => req,
        }
    }

    async fn read(&self, descriptor: &QueryDescriptor) -> Result<Vec<PaperRecord>, CatalogError> {
        let url = self.read_url(descriptor);
        tracing::debug!(endpoint = %descriptor.endpoint(), %url, "catalog read");

        let resp = self.apply_timeout(self.client.get(&url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| error_text(&v));
            return Err(CatalogError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ReadResponse = resp.json().await?;
        body.into_papers()
    }

    async fn send_upload(&self, submission: UploadSubmission) -> Result<UploadReceipt, CatalogError> {
        let bytes = tokio::fs::read(&submission.file).await.map_err(|e| {
            CatalogError::Transport(format!(
                "could not read {}: {}",
                submission.file.display(),
                e
            ))
        })?;

        let mut form = Form::new();
        for (field, value) in submission.fields() {
            form = form.text(field.form_name(), value.to_string());
        }
        let part = Part::bytes(bytes)
            .file_name(submission.file_name())
            .mime_str("application/pdf")?;
        form = form.part("file", part);

        let url = self.upload_url();
        tracing::debug!(%url, file = %submission.file.display(), "catalog upload");

        let resp = self
            .apply_timeout(self.client.post(&url).multipart(form))
            .send()
            .await?;
        let status = resp.status();

        if !status.is_success() {
            let detail = resp
                .json::<UploadResponse>()
                .await
                .ok()
                .and_then(|b| b.detail);
            return Err(CatalogError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let body: UploadResponse = resp.json().await?;
        body.into_receipt()
    }
}

/// Pull a human-readable message out of an error body (`detail` or `error`).
fn error_text(body: &serde_json::Value) -> Option<String> {
    body["detail"]
        .as_str()
        .or_else(|| body["error"].as_str())
        .map(str::to_string)
}

impl CatalogBackend for HttpCatalog {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch<'a>(&'a self, descriptor: &'a QueryDescriptor) -> CatalogFuture<'a, Vec<PaperRecord>> {
        Box::pin(self.read(descriptor))
    }

    fn upload<'a>(&'a self, submission: UploadSubmission) -> CatalogFuture<'a, UploadReceipt> {
        Box::pin(self.send_upload(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FilterSet;

    fn catalog(base: &str) -> HttpCatalog {
        let config = ClientConfig {
            base_url: base.to_string(),
            request_timeout: None,
        };
        HttpCatalog::with_client(&config, reqwest::Client::new())
    }

    #[test]
    fn listing_url_has_no_query() {
        let c = catalog("http://localhost:8000/");
        assert_eq!(
            c.read_url(&QueryDescriptor::listing()),
            "http://localhost:8000/papers"
        );
    }

    #[test]
    fn search_url_carries_params() {
        let c = catalog("http://localhost:8000");
        let d = QueryDescriptor::build("neural", &FilterSet::default());
        assert_eq!(
            c.read_url(&d),
            "http://localhost:8000/search?q=neural&sort_by=publication_date&sort_order=desc&limit=50"
        );
    }

    #[test]
    fn error_text_prefers_detail() {
        let v = serde_json::json!({"detail": "bad form", "error": "other"});
        assert_eq!(error_text(&v).as_deref(), Some("bad form"));
        let v = serde_json::json!({"error": "db down"});
        assert_eq!(error_text(&v).as_deref(), Some("db down"));
        assert!(error_text(&serde_json::json!({})).is_none());
    }
}
