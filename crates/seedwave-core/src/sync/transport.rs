//! Network transport for tracked resources.
//!
//! The cache never talks HTTP itself; it asks a [`Transport`] for the latest
//! value of a key. [`HttpTransport`] resolves keys to API paths and issues
//! plain JSON GET requests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::SyncError;
use crate::sync::resources::Endpoint;

/// Default per-request timeout. This is the effective upper bound on how
/// long a single key can hold a sync batch open.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the current value of a resource key.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<serde_json::Value, SyncError>;
}

/// JSON-over-HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    urls: HashMap<String, Url>,
}

impl HttpTransport {
    /// Build a transport for `endpoints` rooted at `base_url`.
    ///
    /// Endpoint paths are appended to the base URL verbatim, so a base with a
    /// path prefix (`https://host/portal`) keeps it.
    pub fn new(
        base_url: &str,
        endpoints: &[Endpoint],
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let base = base_url.trim_end_matches('/');
        let mut urls = HashMap::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let path = endpoint.path.trim_start_matches('/');
            let url = Url::parse(&format!("{base}/{path}"))?;
            urls.insert(endpoint.key.clone(), url);
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, urls })
    }

    /// Resolved URL for `key`.
    pub fn url_for(&self, key: &str) -> Option<&Url> {
        self.urls.get(key)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, key: &str) -> Result<serde_json::Value, SyncError> {
        let url = self
            .urls
            .get(key)
            .ok_or_else(|| SyncError::UnknownResource(key.to_string()))?;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                key: key.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
