//! HTTP client for the CERS public portal.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{
        CandidateSearch, CommitteeSearch, DataTableQuery, FilerId, FormPayload, Query,
        ReportRequest, ScheduleRequest,
    },
    types::{CandidateResult, CommitteeResult, DataTableResponse, DetailRow, DownloadTicket, ReportResult},
    user_agent::get_user_agent,
    Error,
};

/// Timeout for page and list requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for schedule downloads, which the portal builds on demand and can
/// take minutes for large filers.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the CERS public portal.
///
/// The portal is stateful: a search or report is first posted into the
/// server-side session, then read back with a second request. Every operation
/// therefore builds a fresh cookie-carrying `reqwest::Client` and issues its
/// requests on it in order.
pub struct Client {
    /// Base URL for the portal. Defaults to `https://cers-ext.mt.gov/CampaignTracker`.
    base_api_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production portal.
    pub fn new() -> Self {
        Self {
            base_api_url: "https://cers-ext.mt.gov/CampaignTracker".to_string(),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str, query: Option<&impl Query>) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(match query {
            Some(query) => query.add_to_url(&url),
            None => url,
        })
    }

    fn session(&self, timeout: Duration) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(get_user_agent())
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    /// Runs a candidate search and returns the matching rows.
    pub async fn search_candidates(
        &self,
        search: &CandidateSearch,
        page: &DataTableQuery,
    ) -> Result<DataTableResponse<CandidateResult>, Error> {
        let http = self.session(REQUEST_TIMEOUT)?;
        let search_url = self.get_url("/public/searchResults/searchCandidates", None::<&DataTableQuery>)?;
        post_form(&http, search_url, &search.form_pairs()).await?;
        let list_url = self.get_url("/public/searchResults/listCandidateResults", Some(page))?;
        let body = get_text(&http, list_url).await?;
        parse_json(&body)
    }

    /// Runs a committee financial search and returns the matching rows.
    pub async fn search_committees(
        &self,
        search: &CommitteeSearch,
        page: &DataTableQuery,
    ) -> Result<DataTableResponse<CommitteeResult>, Error> {
        let http = self.session(REQUEST_TIMEOUT)?;
        let search_url = self.get_url("/public/searchResults/searchFinancials", None::<&DataTableQuery>)?;
        post_form(&http, search_url, &search.form_pairs()).await?;
        let list_url = self.get_url(
            "/public/searchResults/listFinancialCommitteeResults",
            Some(page),
        )?;
        let body = get_text(&http, list_url).await?;
        parse_json(&body)
    }

    /// Lists every finance report filed by a candidate or committee.
    pub async fn list_reports(
        &self,
        filer: FilerId,
        page: &DataTableQuery,
    ) -> Result<DataTableResponse<ReportResult>, Error> {
        let http = self.session(REQUEST_TIMEOUT)?;
        let retrieve_url = self.get_url(filer.report_list_path(), None::<&DataTableQuery>)?;
        post_form(&http, retrieve_url, &filer.report_list_form()).await?;
        let list_url = self.get_url("/public/publicReportList/listFinanceReports", Some(page))?;
        let body = get_text(&http, list_url).await?;
        parse_json(&body)
    }

    /// Opens a report in a new session and returns the rendered report page.
    ///
    /// The returned session stays bound to that report, so its detail lists
    /// can be read afterwards.
    pub async fn open_report(&self, filer: FilerId, report_id: i64) -> Result<ReportSession, Error> {
        let http = self.session(REQUEST_TIMEOUT)?;
        let url = self.get_url("/public/viewFinanceReport/retrieveReport", None::<&DataTableQuery>)?;
        let request = ReportRequest { filer, report_id };
        let html = post_form(&http, url, &request.form_pairs()).await?;
        let detail_url = self.get_url(
            "/public/viewFinanceReport/financeRepDetailList",
            None::<&DataTableQuery>,
        )?;
        Ok(ReportSession {
            http,
            detail_url,
            report_id,
            html,
        })
    }

    /// Downloads one itemized schedule of a report as pipe-delimited text.
    ///
    /// Returns `Ok(None)` when the portal reports no file for the schedule.
    pub async fn download_schedule(
        &self,
        report_id: i64,
        schedule_code: &str,
        filer_name: &str,
    ) -> Result<Option<String>, Error> {
        let http = self.session(DOWNLOAD_TIMEOUT)?;
        let prepare_url = self.get_url(
            "/public/viewFinanceReport/prepareDownloadFileFromSearch",
            None::<&DataTableQuery>,
        )?;
        let request = ScheduleRequest {
            report_id,
            schedule_code,
            filer_name,
        };
        let body = post_form(&http, prepare_url, &request.form_pairs()).await?;
        let ticket: DownloadTicket = parse_json(&body)?;
        if ticket.file_name().is_none() {
            tracing::debug!(
                "No file for schedule {} on report {}",
                schedule_code,
                report_id
            );
            return Ok(None);
        }

        let mut download_url =
            self.get_url("/public/viewFinanceReport/downloadFile", None::<&DataTableQuery>)?;
        download_url
            .query_pairs_mut()
            .extend_pairs(ticket.query_pairs());
        let text = get_text(&http, download_url).await?;
        Ok(Some(text))
    }
}

/// A portal session with one report opened.
pub struct ReportSession {
    http: reqwest::Client,
    detail_url: Url,
    report_id: i64,
    html: String,
}

impl ReportSession {
    pub fn report_id(&self) -> i64 {
        self.report_id
    }

    /// The report page returned when the report was opened.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Reads one named detail list (e.g. `individual`, `expendOther`) of the
    /// opened report. An empty response body is an empty list.
    pub async fn detail_list(&self, list_name: &str) -> Result<Vec<DetailRow>, Error> {
        let body = post_form(&self.http, self.detail_url.clone(), &[("listName", list_name.to_string())])
            .await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_json(&body)
    }
}

async fn post_form(
    http: &reqwest::Client,
    url: Url,
    form: &[(&'static str, String)],
) -> Result<String, Error> {
    let resp = http
        .post(url)
        .header("accept", "text/html,application/json,*/*")
        .header("accept-language", "en-US,en;q=0.9")
        .form(form)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Failed to post form: {}", e);
            Error::RequestFailed
        })?;
    read_body(resp).await
}

async fn get_text(http: &reqwest::Client, url: Url) -> Result<String, Error> {
    let resp = http
        .get(url)
        .header("accept", "application/json, text/plain, */*")
        .header("accept-language", "en-US,en;q=0.9")
        .header("x-requested-with", "XMLHttpRequest")
        .send()
        .await
        .map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed
        })?;
    read_body(resp).await
}

async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::RequestFailed
    })?;

    if !status.is_success() {
        let snippet = truncate_body(&body);
        tracing::error!("Request failed with status {}: {}", status, snippet);
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            body: snippet,
        });
    }
    Ok(body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str::<T>(body).map_err(|e| {
        let snippet = truncate_body(body);
        tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
        Error::Parse(e.to_string())
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
