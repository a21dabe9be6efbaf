use super::FormPayload;

/// Identifies the filer whose reports are being requested.
///
/// The portal keys report pages by `candidateId` or `committeeId` depending on
/// who filed them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilerId {
    Candidate(i64),
    Committee(i64),
}

impl FilerId {
    pub fn form_key(&self) -> &'static str {
        match self {
            FilerId::Candidate(_) => "candidateId",
            FilerId::Committee(_) => "committeeId",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            FilerId::Candidate(id) | FilerId::Committee(id) => *id,
        }
    }

    /// Form posted to `retrieveCampaignReports` / `retrieveCommitteeReports`.
    pub(crate) fn report_list_form(&self) -> Vec<(&'static str, String)> {
        match self {
            FilerId::Candidate(id) => vec![
                ("candidateId", id.to_string()),
                ("searchType", String::new()),
                ("searchPage", "public".to_string()),
            ],
            FilerId::Committee(id) => vec![
                ("committeeId", id.to_string()),
                ("financialSearchType", "COMMITTEE".to_string()),
                ("searchPage", "public".to_string()),
            ],
        }
    }

    /// Path that loads a filer's report list into the session.
    pub(crate) fn report_list_path(&self) -> &'static str {
        match self {
            FilerId::Candidate(_) => "/public/publicReportList/retrieveCampaignReports",
            FilerId::Committee(_) => "/public/publicReportList/retrieveCommitteeReports",
        }
    }
}

/// Form posted to `retrieveReport` to open one report in the session.
pub(crate) struct ReportRequest {
    pub filer: FilerId,
    pub report_id: i64,
}

impl FormPayload for ReportRequest {
    fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (self.filer.form_key(), self.filer.id().to_string()),
            ("reportId", self.report_id.to_string()),
            ("searchPage", "public".to_string()),
        ]
    }
}

/// Form posted to `prepareDownloadFileFromSearch`.
pub(crate) struct ScheduleRequest<'a> {
    pub report_id: i64,
    /// `A`/`B` for candidate filings, `C4A`/`C6B` etc. for committee filings.
    pub schedule_code: &'a str,
    /// Candidate or committee name as listed on the report.
    pub filer_name: &'a str,
}

impl FormPayload for ScheduleRequest<'_> {
    fn form_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("reportId", self.report_id.to_string()),
            ("scheduleCode", self.schedule_code.to_string()),
            ("fname", self.filer_name.to_string()),
        ]
    }
}
