//! CLI subcommand implementations.

pub mod candidates;
pub mod clean;
pub mod committees;
pub mod reports;
pub mod scrape;

use anyhow::Result;
use cers_lib::validation;
use cers_lib::{CandidateSearch, CommitteeSearch, EntityFilter, PortalClient};
use clap::Args;

/// ActBlue's Montana conduit, which re-reports every pass-through contribution.
const DEFAULT_COMMITTEE_EXCLUDE: &[i64] = &[1895];

/// Portal client, pointed at `CERS_BASE_URL` when set.
pub fn portal_client() -> PortalClient {
    match std::env::var("CERS_BASE_URL") {
        Ok(url) if !url.trim().is_empty() => PortalClient::with_base_url(url.trim()),
        _ => PortalClient::new(),
    }
}

/// Candidate search and result filters.
#[derive(Args)]
pub struct CandidateFilterArgs {
    /// Election year (e.g. 2024)
    #[arg(long)]
    pub year: String,

    /// Numeric office code
    #[arg(long)]
    pub office_code: Option<String>,

    /// Candidate type: SW (statewide), SD (state district), CO, MU, SC
    #[arg(long)]
    pub type_code: Option<String>,

    /// First name
    #[arg(long)]
    pub first: Option<String>,

    /// Middle initial
    #[arg(long)]
    pub middle: Option<String>,

    /// Last name
    #[arg(long)]
    pub last: Option<String>,

    /// Residence county code
    #[arg(long)]
    pub county_code: Option<String>,

    /// Party code
    #[arg(long)]
    pub party_code: Option<String>,

    /// Keep only House and Senate district candidates
    #[arg(long)]
    pub legislative: bool,

    #[command(flatten)]
    pub statuses: StatusArgs,

    /// Candidate ids to leave out (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<i64>,
}

impl CandidateFilterArgs {
    pub fn search(&self) -> Result<CandidateSearch> {
        let mut search =
            CandidateSearch::default().with_election_year(&validation::validate_year(&self.year)?);
        if let Some(ref code) = self.office_code {
            search = search.with_office_code(&validation::validate_numeric_id(code, "office code")?);
        }
        if let Some(ref code) = self.type_code {
            search = search.with_candidate_type(&validation::validate_candidate_type(code)?);
        }
        if let Some(ref first) = self.first {
            search = search.with_first_name(&validation::validate_search(first)?);
        }
        if let Some(ref middle) = self.middle {
            search = search.with_middle_initial(&validation::validate_search(middle)?);
        }
        if let Some(ref last) = self.last {
            search = search.with_last_name(&validation::validate_search(last)?);
        }
        if let Some(ref code) = self.county_code {
            search = search.with_county_code(&validation::validate_search(code)?);
        }
        if let Some(ref code) = self.party_code {
            search = search.with_party_code(&validation::validate_search(code)?);
        }
        Ok(search)
    }

    pub fn filter(&self) -> Result<EntityFilter> {
        Ok(EntityFilter::default()
            .with_statuses(self.statuses.statuses()?)
            .with_exclude(self.exclude.clone())
            .with_legislative_only(self.legislative))
    }
}

/// Committee search and result filters.
#[derive(Args)]
pub struct CommitteeFilterArgs {
    /// Election year (e.g. 2024)
    #[arg(long)]
    pub year: String,

    /// Committee name
    #[arg(long)]
    pub name: Option<String>,

    /// Only committees with expenditures on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only committees with expenditures on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    #[command(flatten)]
    pub statuses: StatusArgs,

    /// Committee ids to leave out, in addition to the default exclusions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<i64>,

    /// Do not leave out the ActBlue conduit committee (1895)
    #[arg(long)]
    pub no_default_exclude: bool,
}

impl CommitteeFilterArgs {
    pub fn search(&self) -> Result<CommitteeSearch> {
        let mut search =
            CommitteeSearch::default().with_election_year(&validation::validate_year(&self.year)?);
        if let Some(ref name) = self.name {
            search = search.with_committee_name(&validation::validate_search(name)?);
        }
        if self.from.is_some() || self.to.is_some() {
            search = search.with_date_range(
                &portal_date(self.from.as_deref())?,
                &portal_date(self.to.as_deref())?,
            );
        }
        Ok(search)
    }

    pub fn filter(&self) -> Result<EntityFilter> {
        let mut exclude = self.exclude.clone();
        if !self.no_default_exclude {
            exclude.extend_from_slice(DEFAULT_COMMITTEE_EXCLUDE);
        }
        Ok(EntityFilter::default()
            .with_statuses(self.statuses.statuses()?)
            .with_exclude(exclude))
    }
}

/// `YYYY-MM-DD` to the portal's `MM/DD/YYYY`; unset is an open bound.
fn portal_date(input: Option<&str>) -> Result<String> {
    match input {
        Some(date) => Ok(validation::validate_date(date)?
            .format("%m/%d/%Y")
            .to_string()),
        None => Ok(String::new()),
    }
}

/// Which filing statuses to keep.
#[derive(Args)]
pub struct StatusArgs {
    /// Keep every status instead of Active, Reopened and Amended
    #[arg(long, conflicts_with = "status")]
    pub all_statuses: bool,

    /// Statuses to keep (repeatable): Active, Reopened, Amended, Withdrawn, Closed
    #[arg(long)]
    pub status: Vec<String>,
}

impl StatusArgs {
    /// `None` keeps everything; the default is the active statuses.
    pub fn statuses(&self) -> Result<Option<Vec<String>>> {
        if self.all_statuses {
            return Ok(None);
        }
        if self.status.is_empty() {
            return Ok(EntityFilter::default().statuses);
        }
        let validated = self
            .status
            .iter()
            .map(|s| validation::validate_status(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(validated))
    }
}
