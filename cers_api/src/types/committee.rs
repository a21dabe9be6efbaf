//! Committee rows returned by `listFinancialCommitteeResults`.

use serde::{Deserialize, Serialize};

use super::string_or_number;

/// Portal-assigned committee identifier.
pub type CommitteeID = i64;

/// One row of a committee financial search.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeResult {
    pub committee_id: CommitteeID,

    pub committee_name: String,

    #[serde(default)]
    pub committee_address: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub election_year: Option<String>,

    #[serde(default)]
    pub committee_status_descr: Option<String>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub created_date: Option<String>,

    /// e.g. `Political Party`, `Independent`, `Ballot Issue`.
    #[serde(default)]
    pub committee_type_descr: Option<String>,
}
