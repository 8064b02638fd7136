use super::errors::TrackerError;
use super::types::{RawIssue, SearchPage};
use super::IssueSource;
use crate::config::TrackerConfig;
use crate::observability::TrackerApiMetrics;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::Url;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rate-limited Jira REST client
///
/// Searches are paged with `startAt`/`maxResults` until the reported total
/// is reached. There is deliberately no retry: a failed page fails the
/// whole search.
#[derive(Debug)]
pub struct JiraClient {
    http: reqwest::Client,
    search_url: Url,
    username: Option<String>,
    api_token: Option<String>,
    page_size: u32,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    metrics: Arc<TrackerApiMetrics>,
}

impl JiraClient {
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let search_url = search_url(&config.base_url)?;

        let per_second = NonZeroU32::new(config.rate_limit.requests_per_second).ok_or_else(|| {
            TrackerError::InvalidRateLimit {
                message: "requests_per_second must be greater than zero".to_string(),
            }
        })?;
        let burst = NonZeroU32::new(config.rate_limit.burst_capacity).ok_or_else(|| {
            TrackerError::InvalidRateLimit {
                message: "burst_capacity must be greater than zero".to_string(),
            }
        })?;
        let quota = Quota::per_second(per_second).allow_burst(burst);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            search_url,
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            page_size: config.page_size.max(1),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            metrics: Arc::new(TrackerApiMetrics::new()),
        })
    }

    pub fn metrics(&self) -> Arc<TrackerApiMetrics> {
        Arc::clone(&self.metrics)
    }

    async fn fetch_page(&self, jql: &str, start_at: u64) -> Result<SearchPage, TrackerError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        debug!(jql, start_at, "Requesting search page");
        self.metrics.record_request();

        let mut request = self.http.get(self.search_url.clone()).query(&[
            ("jql", jql.to_string()),
            ("startAt", start_at.to_string()),
            ("maxResults", self.page_size.to_string()),
        ]);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.api_token.as_ref());
        }

        let response = request.send().await.map_err(|e| {
            self.metrics.record_error();
            TrackerError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            self.metrics.record_error();
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::from_status(status.as_u16(), &body));
        }

        response.json::<SearchPage>().await.map_err(|e| {
            self.metrics.record_error();
            TrackerError::InvalidResponse {
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn search(&self, jql: &str) -> Result<Vec<RawIssue>, TrackerError> {
        let mut issues = Vec::new();
        let mut start_at = 0u64;

        loop {
            let page = self.fetch_page(jql, start_at).await?;
            let fetched = page.issues.len() as u64;
            self.metrics.record_page(fetched);

            if start_at == 0 && page.max_results > 0 && page.max_results < u64::from(self.page_size) {
                warn!(
                    requested = self.page_size,
                    granted = page.max_results,
                    "Tracker capped the search page size"
                );
            }
            issues.extend(page.issues);

            // The echoed startAt is optional, so advance from the offset we asked for
            start_at += fetched;
            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        info!(jql, count = issues.len(), "Search completed");
        Ok(issues)
    }
}

fn search_url(base_url: &str) -> Result<Url, TrackerError> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|url| url.join("search"))
        .map_err(|_| TrackerError::InvalidBaseUrl {
            url: base_url.to_string(),
        })
}
