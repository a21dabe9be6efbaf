//! Library layer for the CERS scraper: report parsing, caching, rollups and cleaning.
//!
//! Wraps the `cers_api` portal client with retries, turns listed filings into
//! parsed reports, keeps them in an on-disk cache that is invalidated by
//! amendments, and exports per-entity summaries and itemized tables.

pub mod aggregate;
pub mod cache;
pub mod entity;
pub mod error;
pub mod filings;
pub mod manual;
pub mod parser;
pub mod pipeline;
pub mod portal;
pub mod report;
pub mod validation;

pub use cers_api;
pub use cers_api::types;
pub use cers_api::{CandidateSearch, CommitteeSearch, FilerId};

pub use aggregate::{CleanedData, Cleaner, ContributionTypes};
pub use cache::ReportCache;
pub use entity::{Entity, EntityFilter, ACTIVE_STATUSES};
pub use error::CersError;
pub use filings::{EntityFilings, EntitySummary, ExportPaths, ReportDigest, SummaryExport};
pub use manual::ManualCaches;
pub use parser::ReportParser;
pub use pipeline::{CacheOptions, ReportLoader};
pub use portal::{Portal, PortalClient, RetryConfig};
pub use report::itemized::{Contribution, Expenditure};
pub use report::{Filer, FilerKind, FormType, ParsedReport, Report, Summary, Tally};
