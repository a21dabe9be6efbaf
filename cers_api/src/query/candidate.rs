use super::FormPayload;

/// Candidate search form posted to `searchCandidates`.
///
/// Every field is sent, empty when unset, the same way the portal's search
/// page submits it.
#[derive(Default, Clone, Debug)]
pub struct CandidateSearch {
    pub last_name: String,
    pub first_name: String,
    pub middle_initial: String,
    pub election_year: String,
    /// Candidate type code, e.g. `SW` (statewide) or `SD` (state district).
    pub candidate_type_code: String,
    /// Numeric office code (not the office title).
    pub office_code: String,
    pub county_code: String,
    pub party_code: String,
}

impl CandidateSearch {
    pub fn with_last_name(mut self, last_name: &str) -> Self {
        self.last_name = last_name.to_string();
        self
    }

    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn with_middle_initial(mut self, middle_initial: &str) -> Self {
        self.middle_initial = middle_initial.to_string();
        self
    }

    pub fn with_election_year(mut self, year: &str) -> Self {
        self.election_year = year.to_string();
        self
    }

    pub fn with_candidate_type(mut self, code: &str) -> Self {
        self.candidate_type_code = code.to_string();
        self
    }

    pub fn with_office_code(mut self, code: &str) -> Self {
        self.office_code = code.to_string();
        self
    }

    pub fn with_county_code(mut self, code: &str) -> Self {
        self.county_code = code.to_string();
        self
    }

    pub fn with_party_code(mut self, code: &str) -> Self {
        self.party_code = code.to_string();
        self
    }
}

impl FormPayload for CandidateSearch {
    fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lastName", self.last_name.clone()),
            ("firstName", self.first_name.clone()),
            ("middleInitial", self.middle_initial.clone()),
            ("electionYear", self.election_year.clone()),
            ("candidateTypeCode", self.candidate_type_code.clone()),
            ("officeCode", self.office_code.clone()),
            ("countyCode", self.county_code.clone()),
            ("partyCode", self.party_code.clone()),
        ]
    }
}
