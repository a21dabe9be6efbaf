//! Candidate rows returned by `listCandidateResults`.

use serde::{Deserialize, Serialize};

use super::string_or_number;

/// Portal-assigned candidate identifier.
pub type CandidateID = i64;

/// One row of a candidate search.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    pub candidate_id: CandidateID,

    /// Display name, usually `Last, First M`.
    pub candidate_name: String,

    #[serde(rename = "personDTO", default)]
    pub person_dto: Option<PersonDto>,

    #[serde(default)]
    pub party_descr: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub election_year: Option<String>,

    #[serde(default)]
    pub res_county_descr: Option<String>,

    #[serde(default)]
    pub office_title: Option<String>,

    /// Filing status, e.g. `Active`, `Reopened`, `Amended`, `Withdrawn`.
    #[serde(default)]
    pub candidate_status_descr: Option<String>,

    #[serde(default)]
    pub candidate_type_descr: Option<String>,
}

/// Person record nested in candidate rows.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}
