//! Shared request infrastructure: the [`Query`] and [`FormPayload`] traits and
//! the DataTables paging parameters the portal's list endpoints expect.

use url::Url;

/// Columns requested from `listCandidateResults`.
pub const CANDIDATE_COLUMNS: &[&str] = &[
    "checked",
    "candidateName",
    "electionYear",
    "candidateStatusDescr",
    "c3FiledInd",
    "candidateAddress",
    "candidateTypeDescr",
    "officeTitle",
    "resCountyDescr",
];

/// Columns requested from `listFinancialCommitteeResults`.
pub const COMMITTEE_COLUMNS: &[&str] = &["checked", "committeeName", "electionYear", "committeeTypeDescr"];

/// Columns requested from `listFinanceReports`.
pub const REPORT_COLUMNS: &[&str] = &[
    "checked",
    "fromDateStr",
    "toDateStr",
    "formTypeDescr",
    "formTypeCode",
    "statusDescr",
];

/// Trait implemented by GET query builders.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Trait implemented by POST form builders.
pub trait FormPayload {
    /// Returns the form fields in the order the portal's own pages send them.
    fn form_pairs(&self) -> Vec<(&'static str, String)>;
}

/// DataTables server-side paging parameters.
///
/// The portal's list endpoints are backends for jQuery DataTables widgets and
/// reject requests that do not describe every column. Results come back in a
/// single page sized by `display_length`.
#[derive(Clone)]
pub struct DataTableQuery {
    columns: Vec<&'static str>,
    /// First row offset. Defaults to 0.
    pub display_start: i64,
    /// Rows per page. Defaults to 1000, enough for any single search.
    pub display_length: i64,
}

impl DataTableQuery {
    pub fn new(columns: &[&'static str]) -> Self {
        Self {
            columns: columns.to_vec(),
            display_start: 0,
            display_length: 1000,
        }
    }

    pub fn candidates() -> Self {
        Self::new(CANDIDATE_COLUMNS)
    }

    pub fn committees() -> Self {
        Self::new(COMMITTEE_COLUMNS)
    }

    pub fn reports() -> Self {
        Self::new(REPORT_COLUMNS)
    }

    pub fn with_display_start(mut self, start: i64) -> Self {
        self.display_start = start;
        self
    }

    pub fn with_display_length(mut self, length: i64) -> Self {
        self.display_length = length;
        self
    }
}

impl Query for DataTableQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("sEcho", "1")
                .append_pair("iColumns", &self.columns.len().to_string())
                .append_pair("sColumns", "")
                .append_pair("iDisplayStart", &self.display_start.to_string())
                .append_pair("iDisplayLength", &self.display_length.to_string());
            for (i, column) in self.columns.iter().enumerate() {
                pairs.append_pair(&format!("mDataProp_{}", i), column);
            }
            pairs.append_pair("sSearch", "").append_pair("bRegex", "false");
            for i in 0..self.columns.len() {
                pairs
                    .append_pair(&format!("sSearch_{}", i), "")
                    .append_pair(&format!("bRegex_{}", i), "false")
                    .append_pair(&format!("bSearchable_{}", i), "true");
            }
            pairs
                .append_pair("iSortCol_0", "0")
                .append_pair("sSortDir_0", "asc")
                .append_pair("iSortingCols", "1");
            for (i, column) in self.columns.iter().enumerate() {
                // The checkbox column is never sortable.
                let sortable = *column != "checked";
                pairs.append_pair(&format!("bSortable_{}", i), &sortable.to_string());
            }
            pairs.append_pair("_", &chrono::Utc::now().timestamp_millis().to_string());
        }
        url
    }
}
