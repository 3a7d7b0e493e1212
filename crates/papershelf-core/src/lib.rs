use std::time::Duration;

use thiserror::Error;

pub mod catalog;
pub mod config_file;
pub mod fetch;
pub mod model;
pub mod query;
pub mod session;
pub mod upload;
pub mod view;

// Re-export for convenience
pub use catalog::{CatalogBackend, CatalogError, HttpCatalog};
pub use fetch::{FetchCoordinator, FetchRequest, ReconcilePolicy, Reconciled, RequestState, RequestTicket};
pub use model::{PaperId, PaperRecord, RowKey};
pub use query::{Endpoint, FilterField, FilterSet, QueryDescriptor, RESULT_LIMIT, SortField, SortOrder};
pub use session::{InputChange, MessageKind, Session, StatusMessage};
pub use upload::{DraftField, UploadDraft, UploadError, UploadReceipt, UploadSubmission};
pub use view::View;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable naming the catalog service location.
pub const URL_ENV: &str = "PAPERSHELF_URL";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("catalog URL is empty")]
    EmptyUrl,
    #[error("catalog URL must start with http:// or https://: {0}")]
    UnsupportedScheme(String),
}

/// Where and how to reach the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Resolve the client configuration: explicit value > environment >
    /// config file > default.
    pub fn resolve(
        cli_url: Option<String>,
        env_url: Option<String>,
        file: &config_file::ConfigFile,
    ) -> Result<Self, ConfigError> {
        let catalog = file.catalog.clone().unwrap_or_default();
        let base_url = cli_url
            .or(env_url)
            .or(catalog.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            request_timeout: catalog
                .request_timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
        })
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::UnsupportedScheme(url.to_string()));
    }
    Ok(url.to_string())
}
