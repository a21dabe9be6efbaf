//! Portal access with retry.
//!
//! [`Portal`] is the seam the report parser talks through; [`PortalClient`]
//! implements it over the HTTP client and retries transient failures with
//! exponential backoff.

use std::time::Duration;

use cers_api::types::{CandidateResult, CommitteeResult, DetailRow, ReportResult};
use cers_api::{CandidateSearch, Client, CommitteeSearch, DataTableQuery, FilerId};
use rand::Rng;

use crate::error::CersError;
use crate::report::Report;

/// Report-level requests the parser needs.
#[allow(async_fn_in_trait)]
pub trait Portal {
    /// The rendered report page, which carries the summary table.
    async fn report_page(&self, report: &Report) -> Result<String, CersError>;

    /// Opens the report and reads the named detail lists in order, on one
    /// session.
    async fn detail_lists(
        &self,
        report: &Report,
        lists: &[&str],
    ) -> Result<Vec<(String, Vec<DetailRow>)>, CersError>;

    /// One schedule download, or `None` when the portal has no file for it.
    async fn schedule(
        &self,
        report: &Report,
        schedule_code: &str,
    ) -> Result<Option<String>, CersError>;
}

/// Backoff settings for retried requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryConfig {
    /// Reads `CERS_RETRY_MAX`, `CERS_RETRY_BASE_MS` and `CERS_RETRY_MAX_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: env_usize("CERS_RETRY_MAX", defaults.max_retries),
            base_delay_ms: env_u64("CERS_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: env_u64("CERS_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }

    /// No retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = (attempt.saturating_sub(1)).min(30) as u32;
        let exp = 1u64 << shift;
        let base = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0.8..1.2);
        Duration::from_millis((base as f64 * jitter) as u64)
    }
}

/// Portal client that retries network errors, HTTP 429 and 5xx responses.
pub struct PortalClient {
    inner: Client,
    retry: RetryConfig,
}

impl PortalClient {
    /// Production portal, retry settings from the environment.
    pub fn new() -> Self {
        Self::from_client(Client::new())
    }

    /// Custom base URL. Used for testing and `CERS_BASE_URL`.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::from_client(Client::with_base_url(base_url))
    }

    fn from_client(inner: Client) -> Self {
        Self {
            inner,
            retry: RetryConfig::from_env(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn with_retry<T, F, Fut>(&self, label: &str, mut f: F) -> Result<T, CersError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, CersError>>,
    {
        let mut attempt = 0usize;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt > self.retry.max_retries || !is_retryable(&err) {
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s",
                        label,
                        attempt,
                        self.retry.max_retries,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Runs a candidate search and returns every row.
    pub async fn search_candidates(
        &self,
        search: &CandidateSearch,
    ) -> Result<Vec<CandidateResult>, CersError> {
        let page = DataTableQuery::candidates();
        let resp = self
            .with_retry("candidate search", || async {
                Ok(self.inner.search_candidates(search, &page).await?)
            })
            .await?;
        Ok(resp.data)
    }

    /// Runs a committee search and returns every row.
    pub async fn search_committees(
        &self,
        search: &CommitteeSearch,
    ) -> Result<Vec<CommitteeResult>, CersError> {
        let page = DataTableQuery::committees();
        let resp = self
            .with_retry("committee search", || async {
                Ok(self.inner.search_committees(search, &page).await?)
            })
            .await?;
        Ok(resp.data)
    }

    /// Lists a filer's reports.
    pub async fn list_reports(&self, filer: FilerId) -> Result<Vec<ReportResult>, CersError> {
        let page = DataTableQuery::reports();
        let resp = self
            .with_retry("report list", || async {
                Ok(self.inner.list_reports(filer, &page).await?)
            })
            .await?;
        Ok(resp.data)
    }
}

impl Default for PortalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Portal for PortalClient {
    async fn report_page(&self, report: &Report) -> Result<String, CersError> {
        let filer = report.filer.filer_id();
        self.with_retry("report page", || async {
            let session = self.inner.open_report(filer, report.id).await?;
            Ok(session.html().to_string())
        })
        .await
    }

    async fn detail_lists(
        &self,
        report: &Report,
        lists: &[&str],
    ) -> Result<Vec<(String, Vec<DetailRow>)>, CersError> {
        let filer = report.filer.filer_id();
        // The lists live in the session that opened the report, so a retry
        // starts over from opening it.
        self.with_retry("detail list", || async {
            let session = self.inner.open_report(filer, report.id).await?;
            let mut out = Vec::with_capacity(lists.len());
            for list in lists {
                let rows = session.detail_list(list).await?;
                out.push((list.to_string(), rows));
            }
            Ok(out)
        })
        .await
    }

    async fn schedule(
        &self,
        report: &Report,
        schedule_code: &str,
    ) -> Result<Option<String>, CersError> {
        self.with_retry("schedule download", || async {
            Ok(self
                .inner
                .download_schedule(report.id, schedule_code, &report.filer.name)
                .await?)
        })
        .await
    }
}

fn is_retryable(err: &CersError) -> bool {
    match err {
        CersError::Api(api_err) => match api_err {
            cers_api::Error::RequestFailed => true,
            cers_api::Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            cers_api::Error::Parse(_) => false,
        },
        _ => false,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
