//! Concurrency-capped client for the external market API.
//!
//! Every outbound request, including pages fanned out by a paginated fetch
//! and items of a batch, acquires a permit from one shared semaphore. The
//! API enforces an error budget rather than a token bucket, so bounding the
//! number of requests in flight is the whole policy.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use url::Url;

use crate::error::FetchError;
use crate::port::{HttpRequest, HttpResponse, HttpTransport};

/// Response header carrying the total page count.
pub const PAGES_HEADER: &str = "x-pages";
/// Response header carrying the server-side cache expiry.
pub const EXPIRES_HEADER: &str = "expires";

/// Upper bound on the page count taken from [`PAGES_HEADER`].
pub const MAX_PAGES: u32 = 1_000;

/// Default ceiling on simultaneous outbound requests.
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;
/// Default worker count for batch fetches.
pub const DEFAULT_BATCH_WORKERS: usize = 50;
/// Default batch progress cadence.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;

/// Result of a paginated fetch.
///
/// Pages that failed are dropped from `items` and listed in `failed_pages`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub failed_pages: Vec<u32>,
    /// Expiry advertised by the first page, if any.
    pub expires_at: Option<DateTime<Utc>>,
}

impl<T> Paginated<T> {
    /// True when every page contributed its items.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }
}

/// Rate-limited fetcher shared by every cache.
///
/// Cloning is cheap and clones share the same semaphore.
#[derive(Clone)]
pub struct RateLimitedFetcher {
    transport: Arc<dyn HttpTransport>,
    permits: Arc<Semaphore>,
    base_url: Url,
    datasource: Option<String>,
    access_token: Option<String>,
    max_concurrency: usize,
    pub(super) batch_workers: usize,
    pub(super) progress_interval: usize,
}

impl RateLimitedFetcher {
    /// Create a fetcher with default limits.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: Url) -> Self {
        Self {
            transport,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENCY)),
            base_url,
            datasource: None,
            access_token: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            batch_workers: DEFAULT_BATCH_WORKERS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Replace the concurrency ceiling. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        let limit = limit.max(1);
        self.permits = Arc::new(Semaphore::new(limit));
        self.max_concurrency = limit;
        self
    }

    #[must_use]
    pub fn with_batch_workers(mut self, workers: usize) -> Self {
        self.batch_workers = workers.max(1);
        self
    }

    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    #[must_use]
    pub fn with_datasource(mut self, datasource: Option<String>) -> Self {
        self.datasource = datasource;
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    #[must_use]
    pub const fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Permits not currently held by an in-flight request.
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Fetch and decode a single resource.
    pub async fn fetch_json<T>(&self, path: &str) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, None)?;
        let response = self.execute(url).await?;
        decode(&response.body)
    }

    /// Fetch a resource, treating an empty body (`[]`, `{}`, `null`) as absent.
    pub async fn fetch_optional<T>(&self, path: &str) -> Result<Option<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, None)?;
        let response = self.execute(url).await?;
        if is_empty_payload(&response.body) {
            return Ok(None);
        }
        decode(&response.body).map(Some)
    }

    /// Fetch every page of a paginated list.
    ///
    /// Page 1 is fetched first to learn the page count; a status error there
    /// is returned to the caller. The remaining pages run concurrently and
    /// are merged in completion order. A failing page is logged and dropped.
    pub async fn fetch_paginated<T>(&self, path: &str) -> Result<Paginated<T>, FetchError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let first = self.execute(self.endpoint(path, Some(1))?).await?;
        let advertised = first
            .header(PAGES_HEADER)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        if advertised > MAX_PAGES {
            warn!(path, advertised, max = MAX_PAGES, "Clamping page count");
        }
        let total_pages = advertised.min(MAX_PAGES);
        let expires_at = parse_expires(&first);

        let mut items = Vec::new();
        let mut failed: BTreeSet<u32> = BTreeSet::new();

        match decode::<Vec<T>>(&first.body) {
            Ok(page) => items.extend(page),
            Err(err) => {
                warn!(path, page = 1, error = %err, "Dropping undecodable page");
                failed.insert(1);
            }
        }

        let mut pending: BTreeSet<u32> = (2..=total_pages).collect();
        let mut tasks = JoinSet::new();
        for page in pending.iter().copied() {
            let fetcher = self.clone();
            let url = self.endpoint(path, Some(page))?;
            tasks.spawn(async move {
                let result = match fetcher.execute(url).await {
                    Ok(response) => decode::<Vec<T>>(&response.body),
                    Err(err) => Err(err),
                };
                (page, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page, Ok(page_items))) => {
                    pending.remove(&page);
                    items.extend(page_items);
                }
                Ok((page, Err(err))) => {
                    pending.remove(&page);
                    warn!(path, page, error = %err, "Dropping failed page");
                    failed.insert(page);
                }
                Err(err) => warn!(path, error = %err, "Page task aborted"),
            }
        }
        // Pages whose task died without reporting.
        failed.extend(pending);

        debug!(
            path,
            total_pages,
            failed = failed.len(),
            items = items.len(),
            "Paginated fetch finished"
        );

        Ok(Paginated {
            items,
            total_pages,
            failed_pages: failed.into_iter().collect(),
            expires_at,
        })
    }

    /// Issue one request under a semaphore permit. Non-success statuses
    /// become [`FetchError::Status`].
    pub(super) async fn execute(&self, url: Url) -> Result<HttpResponse, FetchError> {
        let response = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| FetchError::RateLimiterClosed)?;
            let request = HttpRequest::get(url).with_bearer(self.access_token.clone());
            self.transport.get(request).await?
        };

        if response.is_success() {
            Ok(response)
        } else {
            Err(FetchError::Status {
                status: response.status,
                body: response.body,
            })
        }
    }

    /// Resolve `path` against the base URL and add the shared query
    /// parameters.
    pub(super) fn endpoint(&self, path: &str, page: Option<u32>) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(datasource) = &self.datasource {
                query.append_pair("datasource", datasource);
            }
            if let Some(page) = page {
                query.append_pair("page", &page.to_string());
            }
        }
        // An empty query string is left behind when nothing was appended.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|err| FetchError::Decode(err.to_string()))
}

pub(super) fn is_empty_payload(body: &str) -> bool {
    matches!(body.trim(), "" | "[]" | "{}" | "null")
}

fn parse_expires(response: &HttpResponse) -> Option<DateTime<Utc>> {
    let raw = response.header(EXPIRES_HEADER)?;
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
