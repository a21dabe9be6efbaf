//! Candidates and committees returned by the portal's searches.

use std::collections::HashSet;

use cers_api::types::{CandidateResult, CommitteeResult};
use cers_api::FilerId;
use serde::{Deserialize, Serialize};

use crate::report::{Filer, FilerKind};

/// Filing statuses kept by default.
pub const ACTIVE_STATUSES: &[&str] = &["Active", "Reopened", "Amended"];

/// A candidate or committee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub kind: FilerKind,
    pub id: i64,
    pub name: String,
    pub status: Option<String>,
    pub election_year: Option<String>,
    /// Office sought (candidates).
    pub office_title: Option<String>,
    /// Committee type (committees).
    pub committee_type: Option<String>,
    pub last_name: Option<String>,
    pub party: Option<String>,
    pub county: Option<String>,
    pub address: Option<String>,
    pub created_date: Option<String>,
}

impl From<&CandidateResult> for Entity {
    fn from(row: &CandidateResult) -> Self {
        Self {
            kind: FilerKind::Candidate,
            id: row.candidate_id,
            name: row.candidate_name.clone(),
            status: row.candidate_status_descr.clone(),
            election_year: row.election_year.clone(),
            office_title: row.office_title.clone(),
            committee_type: None,
            last_name: row.person_dto.as_ref().and_then(|p| p.last_name.clone()),
            party: row.party_descr.clone(),
            county: row.res_county_descr.clone(),
            address: None,
            created_date: None,
        }
    }
}

impl From<&CommitteeResult> for Entity {
    fn from(row: &CommitteeResult) -> Self {
        Self {
            kind: FilerKind::Committee,
            id: row.committee_id,
            name: row.committee_name.clone(),
            status: row.committee_status_descr.clone(),
            election_year: row.election_year.clone(),
            office_title: None,
            committee_type: row.committee_type_descr.clone(),
            last_name: None,
            party: None,
            county: None,
            address: row.committee_address.clone(),
            created_date: row.created_date.clone(),
        }
    }
}

impl Entity {
    pub fn filer_id(&self) -> FilerId {
        match self.kind {
            FilerKind::Candidate => FilerId::Candidate(self.id),
            FilerKind::Committee => FilerId::Committee(self.id),
        }
    }

    pub fn filer(&self) -> Filer {
        Filer {
            kind: self.kind,
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// File-name stem for this entity's exports and cache directory.
    ///
    /// Candidates: `Busse, Ryan` → `Busse-Ryan`. Committees are prefixed
    /// with their id: `2101-Montanans-for-Public-Lands`.
    pub fn slug(&self) -> String {
        let stem = self.name.trim().replace(' ', "-").replace(',', "");
        match self.kind {
            FilerKind::Candidate => stem,
            FilerKind::Committee => format!("{}-{}", self.id, stem),
        }
    }

    /// Running for a House or Senate district seat.
    pub fn is_legislative(&self) -> bool {
        self.office_title
            .as_deref()
            .map(|o| o.contains("House District") || o.contains("Senate District"))
            .unwrap_or(false)
    }

    /// Office for candidates, committee type for committees.
    pub fn description(&self) -> Option<&str> {
        match self.kind {
            FilerKind::Candidate => self.office_title.as_deref(),
            FilerKind::Committee => self.committee_type.as_deref(),
        }
    }
}

/// Keeps the first row seen for each id.
pub fn dedupe_by_id(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert(e.id))
        .collect()
}

/// Which search results to keep.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    /// `None` keeps every status.
    pub statuses: Option<Vec<String>>,
    pub exclude: Vec<i64>,
    pub legislative_only: bool,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self {
            statuses: Some(ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect()),
            exclude: Vec::new(),
            legislative_only: false,
        }
    }
}

impl EntityFilter {
    /// Keeps every status and excludes nothing.
    pub fn all() -> Self {
        Self {
            statuses: None,
            exclude: Vec::new(),
            legislative_only: false,
        }
    }

    pub fn with_statuses(mut self, statuses: Option<Vec<String>>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_exclude(mut self, ids: Vec<i64>) -> Self {
        self.exclude = ids;
        self
    }

    pub fn with_legislative_only(mut self, legislative_only: bool) -> Self {
        self.legislative_only = legislative_only;
        self
    }

    pub fn keeps(&self, entity: &Entity) -> bool {
        if self.legislative_only && !entity.is_legislative() {
            return false;
        }
        if let Some(statuses) = &self.statuses {
            let status = entity.status.as_deref().unwrap_or_default();
            if !statuses.iter().any(|s| s == status) {
                return false;
            }
        }
        !self.exclude.contains(&entity.id)
    }

    /// De-duplicates, then filters.
    pub fn apply(&self, entities: Vec<Entity>) -> Vec<Entity> {
        dedupe_by_id(entities)
            .into_iter()
            .filter(|e| self.keeps(e))
            .collect()
    }
}
