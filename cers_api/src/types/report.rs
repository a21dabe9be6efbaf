//! Report list rows returned by `listFinanceReports`.

use serde::{Deserialize, Serialize};

use super::string_or_number;

/// Portal-assigned report identifier.
pub type ReportID = i64;

/// One filed report in a candidate's or committee's report list.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReportResult {
    pub report_id: ReportID,

    /// Period start, `MM/DD/YYYY`.
    pub from_date_str: String,

    /// Period end, `MM/DD/YYYY`.
    pub to_date_str: String,

    /// `C4`, `C5`, `C6`, `C7` or `C7E`.
    pub form_type_code: String,

    #[serde(default)]
    pub form_type_descr: Option<String>,

    #[serde(default)]
    pub status_descr: Option<String>,

    #[serde(default)]
    pub filing_type_descr: Option<String>,

    /// Changes whenever the filer amends the report.
    #[serde(default, deserialize_with = "string_or_number")]
    pub amended_date: Option<String>,

    #[serde(rename = "candidateDTO", default)]
    pub candidate_dto: Option<CandidateDto>,

    #[serde(rename = "committeeDTO", default)]
    pub committee_dto: Option<CommitteeDto>,
}

/// Candidate summary nested in candidate report rows.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDto {
    pub candidate_id: i64,
    pub candidate_name: String,
    #[serde(default)]
    pub office_title: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub election_year: Option<String>,
}

/// Committee summary nested in committee report rows.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeDto {
    pub committee_id: i64,
    pub committee_name: String,
}
