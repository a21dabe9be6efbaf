//! Staged scrape: list entities, list their reports, then load each report
//! from cache or parse it from the portal.

use cers_api::{CandidateSearch, CommitteeSearch, FilerId};
use chrono::NaiveDate;

use crate::cache::ReportCache;
use crate::entity::{Entity, EntityFilter};
use crate::error::CersError;
use crate::parser::ReportParser;
use crate::portal::{Portal, PortalClient};
use crate::report::{ParsedReport, Report};

/// Searches for candidates and applies de-duplication and filters.
pub async fn fetch_candidates(
    client: &PortalClient,
    search: &CandidateSearch,
    filter: &EntityFilter,
) -> Result<Vec<Entity>, CersError> {
    let rows = client.search_candidates(search).await?;
    let entities = filter.apply(rows.iter().map(Entity::from).collect());
    tracing::info!("{} of {} candidates kept", entities.len(), rows.len());
    Ok(entities)
}

/// Searches for committees and applies de-duplication and filters.
pub async fn fetch_committees(
    client: &PortalClient,
    search: &CommitteeSearch,
    filter: &EntityFilter,
) -> Result<Vec<Entity>, CersError> {
    let rows = client.search_committees(search).await?;
    let entities = filter.apply(rows.iter().map(Entity::from).collect());
    tracing::info!("{} of {} committees kept", entities.len(), rows.len());
    Ok(entities)
}

/// Lists an entity's reports, dropping those whose period ended before
/// `since`.
pub async fn fetch_reports(
    client: &PortalClient,
    entity: &Entity,
    since: Option<NaiveDate>,
) -> Result<Vec<Report>, CersError> {
    list_reports(client, entity.filer_id(), since).await
}

/// Lists a filer's reports by id. Rows without a filer are skipped.
pub async fn list_reports(
    client: &PortalClient,
    filer: FilerId,
    since: Option<NaiveDate>,
) -> Result<Vec<Report>, CersError> {
    let rows = client.list_reports(filer).await?;
    let mut reports = Vec::with_capacity(rows.len());
    for row in &rows {
        match Report::from_listing(row) {
            Ok(report) => reports.push(report),
            Err(e) => tracing::warn!("Skipping report {}: {}", row.report_id, e),
        }
    }
    Ok(reports_since(reports, since))
}

/// Keeps reports whose period ends on or after `since`. Reports with an
/// unreadable end date are kept.
pub fn reports_since(reports: Vec<Report>, since: Option<NaiveDate>) -> Vec<Report> {
    let Some(since) = since else {
        return reports;
    };
    reports
        .into_iter()
        .filter(|r| r.end_date().map(|end| end >= since).unwrap_or(true))
        .collect()
}

/// Whether the report cache is consulted and updated.
#[derive(Debug, Clone, Copy)]
pub struct CacheOptions {
    pub read: bool,
    pub write: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            read: true,
            write: true,
        }
    }
}

/// Loads reports from the cache when current, otherwise parses and caches
/// them.
pub struct ReportLoader<P> {
    parser: ReportParser<P>,
    options: CacheOptions,
}

impl<P: Portal> ReportLoader<P> {
    pub fn new(parser: ReportParser<P>, options: CacheOptions) -> Self {
        Self { parser, options }
    }

    pub fn parser(&self) -> &ReportParser<P> {
        &self.parser
    }

    /// Loads one report. A failure is logged and yields an empty result
    /// that is not cached.
    pub async fn load(&self, report: &Report, cache: &ReportCache) -> ParsedReport {
        if self.options.read {
            match cache.load_fresh(report) {
                Ok(Some(parsed)) => return parsed,
                Ok(None) => {}
                Err(e) => tracing::warn!("Cache read failed for report {}: {}", report.id, e),
            }
        }

        let parsed = match self.parser.parse(report).await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse {} report {} of {}: {}",
                    report.form_type,
                    report.id,
                    report.filer.name,
                    e
                );
                return ParsedReport::empty(report);
            }
        };

        if self.options.write {
            if let Err(e) = cache.store(&parsed) {
                tracing::warn!("Cache write failed for report {}: {}", report.id, e);
            }
        }
        parsed
    }

    /// Loads reports one after another.
    pub async fn load_all(&self, reports: &[Report], cache: &ReportCache) -> Vec<ParsedReport> {
        let mut out = Vec::with_capacity(reports.len());
        for report in reports {
            out.push(self.load(report, cache).await);
        }
        out
    }
}
