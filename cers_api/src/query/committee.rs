use super::FormPayload;

/// Committee financial search form posted to `searchFinancials`.
///
/// The portal only lists committees through its expenditure search, so the
/// search type fields are fixed to a committee expenditure search.
#[derive(Default, Clone, Debug)]
pub struct CommitteeSearch {
    pub committee_name: String,
    pub election_year: String,
    /// `MM/DD/YYYY`, empty for no bound.
    pub from_date: String,
    /// `MM/DD/YYYY`, empty for no bound.
    pub to_date: String,
}

impl CommitteeSearch {
    pub fn with_committee_name(mut self, name: &str) -> Self {
        self.committee_name = name.to_string();
        self
    }

    pub fn with_election_year(mut self, year: &str) -> Self {
        self.election_year = year.to_string();
        self
    }

    pub fn with_date_range(mut self, from: &str, to: &str) -> Self {
        self.from_date = from.to_string();
        self.to_date = to.to_string();
        self
    }
}

impl FormPayload for CommitteeSearch {
    fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("independentExpendSearch", "false".to_string()),
            ("electioneeringCommSearch", "false".to_string()),
            ("financialSearchType", "EXPEND".to_string()),
            ("expendSearchTypeCode", "COMMITTEE".to_string()),
            ("expendCanLastName", String::new()),
            ("expendCanFirstName", String::new()),
            ("expendCommitteeName", self.committee_name.clone()),
            ("payeeLastName", String::new()),
            ("payeeFirstName", String::new()),
            ("expendPartyCode", String::new()),
            ("expendCandidateTypeCode", String::new()),
            ("expendOfficeCode", String::new()),
            ("expendAmountRangeCode", String::new()),
            ("electionYear", self.election_year.clone()),
            ("expendSearchFromDate", self.from_date.clone()),
            ("expendSearchToDate", self.to_date.clone()),
        ]
    }
}
