//! HTTP client for a Prismic-style content API
//!
//! The API root lists the repository refs; every search is pinned to the
//! master ref. Searches go to `<endpoint>/documents/search`, and cursors
//! (`next_page`) are complete URLs fetched as-is.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

use super::{ContentStore, Cursor, Document, Query, SearchResponse};
use crate::config::StoreConfig;
use crate::error::{BlogError, Result};

/// User-Agent string for content API requests
const USER_AGENT: &str = concat!("prismic-blog/", env!("CARGO_PKG_VERSION"));

/// Retry schedule for transient failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based), doubling each time
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(1u32 << attempt.min(16))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// Content store talking to the remote API over HTTP
pub struct PrismicStore {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
    retry: RetryPolicy,
    master_ref: OnceCell<String>,
}

impl PrismicStore {
    /// Build a store from the `store:` section of the site config
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(BlogError::config(
                "store.endpoint is not set (e.g. https://<repo>.cdn.prismic.io/api/v2)",
            ));
        }
        let endpoint = Url::parse(config.endpoint.trim_end_matches('/')).map_err(|e| {
            BlogError::config(format!("invalid store.endpoint {}: {}", config.endpoint, e))
        })?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BlogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            access_token: config
                .access_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff: Duration::from_millis(config.retry_backoff_ms),
            },
            master_ref: OnceCell::new(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/documents/search", self.endpoint.as_str().trim_end_matches('/'))
    }

    /// Resolve (once) the master ref every search is pinned to
    async fn master_ref(&self) -> Result<&str> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let url = self.endpoint.to_string();
                let root: ApiRoot = self
                    .get_json(&url, || {
                        let request = self.client.get(url.as_str());
                        match &self.access_token {
                            Some(token) => request.query(&[("access_token", token)]),
                            None => request,
                        }
                    })
                    .await?;

                let master = root
                    .refs
                    .into_iter()
                    .find(|r| r.is_master_ref)
                    .ok_or_else(|| BlogError::malformed(format!("{url}: no master ref")))?;
                tracing::debug!("Resolved master ref {}", master.reference);
                Ok::<_, BlogError>(master.reference)
            })
            .await?;
        Ok(reference.as_str())
    }

    async fn search(&self, query: &Query) -> Result<SearchResponse> {
        let reference = self.master_ref().await?.to_string();
        let url = self.search_url();
        let q = query.to_q();

        tracing::debug!("Searching {} (page {}, size {})", q, query.page, query.page_size);

        self.get_json(&url, || {
            let mut params: Vec<(&str, String)> = vec![
                ("ref", reference.clone()),
                ("q", q.clone()),
                ("pageSize", query.page_size.to_string()),
                ("page", query.page.to_string()),
            ];
            if let Some(token) = &self.access_token {
                params.push(("access_token", token.clone()));
            }
            self.client.get(url.as_str()).query(&params)
        })
        .await
    }

    /// Send a GET with the retry policy applied and decode the JSON body
    async fn get_json<T, F>(&self, url: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            match self.try_get_json(url, build()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(
                        "Request failed ({}), retry {} in {:?}",
                        e,
                        attempt + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| BlogError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlogError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BlogError::Network(format!("{url}: failed to read body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| BlogError::malformed(format!("{url}: {e}")))
    }
}

#[async_trait]
impl ContentStore for PrismicStore {
    async fn query(&self, query: &Query) -> Result<SearchResponse> {
        self.search(query).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Document> {
        self.search(&Query::by_uid(doc_type, uid))
            .await?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BlogError::not_found(doc_type, uid))
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<SearchResponse> {
        let url = cursor.as_str();
        tracing::debug!("Following cursor {}", url);
        self.get_json(url, || self.client.get(url)).await
    }
}
