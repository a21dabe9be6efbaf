//! Report model: listed reports, their parsed summaries and itemized tables.

pub mod itemized;
pub mod normalize;
pub mod schedule;
pub mod summary_html;

use std::fmt;

use cers_api::types::{ReportID, ReportResult};
use cers_api::FilerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CersError;
use itemized::{Contribution, Expenditure, FilerContext};
use normalize::round_cents;

/// Filing-type code that determines a report's layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormType {
    /// Committee finance report.
    C4,
    /// Candidate finance report.
    C5,
    /// Political committee finance report.
    C6,
    /// Notice of pre-election contributions.
    C7,
    /// Notice of pre-election expenditures.
    C7E,
    Unknown(String),
}

impl FormType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "C4" => FormType::C4,
            "C5" => FormType::C5,
            "C6" => FormType::C6,
            "C7" => FormType::C7,
            "C7E" => FormType::C7E,
            other => FormType::Unknown(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            FormType::C4 => "C4",
            FormType::C5 => "C5",
            FormType::C6 => "C6",
            FormType::C7 => "C7",
            FormType::C7E => "C7E",
            FormType::Unknown(code) => code,
        }
    }

    /// Filings whose itemized tables come from schedule downloads and whose
    /// unitemized contributions are derived from the summary.
    pub fn has_schedules(&self) -> bool {
        matches!(self, FormType::C4 | FormType::C5 | FormType::C6)
    }
}

impl From<String> for FormType {
    fn from(code: String) -> Self {
        FormType::from_code(&code)
    }
}

impl From<FormType> for String {
    fn from(form: FormType) -> Self {
        form.code().to_string()
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilerKind {
    Candidate,
    Committee,
}

impl fmt::Display for FilerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilerKind::Candidate => f.write_str("Candidate"),
            FilerKind::Committee => f.write_str("Committee"),
        }
    }
}

/// The candidate or committee that submitted a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filer {
    pub kind: FilerKind,
    pub id: i64,
    pub name: String,
}

impl Filer {
    pub fn filer_id(&self) -> FilerId {
        match self.kind {
            FilerKind::Candidate => FilerId::Candidate(self.id),
            FilerKind::Committee => FilerId::Committee(self.id),
        }
    }
}

/// One filed report as listed by the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportID,
    pub filer: Filer,
    pub form_type: FormType,
    /// `MM/DD/YYYY`
    pub from_date: String,
    /// `MM/DD/YYYY`
    pub to_date: String,
    #[serde(default)]
    pub form_type_descr: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Compared verbatim to decide whether a cached copy is current.
    #[serde(default)]
    pub amended_date: Option<String>,
}

impl Report {
    /// Builds a report from a report-list row. The filer comes from the
    /// row's candidate or committee block.
    pub fn from_listing(row: &ReportResult) -> Result<Self, CersError> {
        let filer = if let Some(dto) = &row.candidate_dto {
            Filer {
                kind: FilerKind::Candidate,
                id: dto.candidate_id,
                name: dto.candidate_name.clone(),
            }
        } else if let Some(dto) = &row.committee_dto {
            Filer {
                kind: FilerKind::Committee,
                id: dto.committee_id,
                name: dto.committee_name.clone(),
            }
        } else {
            return Err(CersError::InvalidInput(format!(
                "report {} has no candidate or committee",
                row.report_id
            )));
        };

        Ok(Self {
            id: row.report_id,
            filer,
            form_type: FormType::from_code(&row.form_type_code),
            from_date: row.from_date_str.clone(),
            to_date: row.to_date_str.clone(),
            form_type_descr: row.form_type_descr.clone(),
            status: row.status_descr.clone(),
            amended_date: row.amended_date.clone(),
        })
    }

    /// `MM/DD/YYYY to MM/DD/YYYY`
    pub fn label(&self) -> String {
        format!("{} to {}", self.from_date, self.to_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_portal_date(&self.to_date)
    }

    pub fn filer_context(&self) -> FilerContext {
        FilerContext {
            filer: self.filer.name.clone(),
            filer_type: self.filer.kind.to_string(),
            reporting_period: self.label(),
            report_type: self.form_type.to_string(),
        }
    }
}

/// Parses the portal's `MM/DD/YYYY` dates.
pub fn parse_portal_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
}

/// One summary line. Candidate filings split primary and general; committee
/// filings carry only a total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tally {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<f64>,
    pub total: f64,
}

impl Tally {
    pub fn split(primary: f64, general: f64) -> Self {
        Self {
            primary: Some(primary),
            general: Some(general),
            total: round_cents(primary + general),
        }
    }

    pub fn total_only(total: f64) -> Self {
        Self {
            primary: None,
            general: None,
            total,
        }
    }
}

/// Summary section of a report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub report_start_date: String,
    pub report_end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_report: Option<Tally>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipts: Option<Tally>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenditures: Option<Tally>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_balance: Option<Tally>,
}

impl Summary {
    /// A summary with dates and no line items.
    pub fn for_period(report: &Report) -> Self {
        Self {
            report_start_date: report.from_date.clone(),
            report_end_date: report.to_date.clone(),
            ..Self::default()
        }
    }
}

/// A detail-list category that had rows but is not folded into the tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnhandledCategory {
    pub list: String,
    pub rows: usize,
}

/// A fully parsed report. This is also the on-disk cache format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub report: Report,
    pub summary: Summary,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    #[serde(default)]
    pub expenditures: Vec<Expenditure>,
    #[serde(default)]
    pub unitemized_contributions: f64,
    #[serde(default)]
    pub unhandled: Vec<UnhandledCategory>,
    /// False when only the summary was fetched.
    #[serde(default = "default_itemized")]
    pub itemized: bool,
}

fn default_itemized() -> bool {
    true
}

impl ParsedReport {
    /// Empty result for a report that could not be parsed.
    pub fn empty(report: &Report) -> Self {
        Self {
            report: report.clone(),
            summary: Summary::for_period(report),
            contributions: Vec::new(),
            expenditures: Vec::new(),
            unitemized_contributions: 0.0,
            unhandled: Vec::new(),
            itemized: false,
        }
    }

    /// Recomputes `unitemized_contributions` from the summary and tables.
    pub fn refresh_unitemized(&mut self) {
        self.unitemized_contributions = if self.itemized && self.report.form_type.has_schedules() {
            unitemized_contributions(&self.summary, &self.contributions)
        } else {
            0.0
        };
    }
}

/// Reported receipts not accounted for by itemized cash contributions,
/// rounded to cents.
pub fn unitemized_contributions(summary: &Summary, contributions: &[Contribution]) -> f64 {
    let receipts = summary.receipts.map(|t| t.total).unwrap_or_default();
    let itemized_cash: f64 = contributions
        .iter()
        .filter(|c| c.is_cash())
        .map(|c| c.amount)
        .sum();
    round_cents(receipts - itemized_cash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c5() -> Report {
        Report {
            id: 66995,
            filer: Filer {
                kind: FilerKind::Candidate,
                id: 18001,
                name: "Busse, Ryan".to_string(),
            },
            form_type: FormType::C5,
            from_date: "01/01/2024".to_string(),
            to_date: "03/31/2024".to_string(),
            form_type_descr: None,
            status: None,
            amended_date: Some("1712102400000".to_string()),
        }
    }

    fn cash(amount: f64, amount_type: &str) -> Contribution {
        Contribution {
            amount,
            amount_type: amount_type.to_string(),
            ..Contribution::default()
        }
    }

    #[test]
    fn form_type_codes() {
        assert_eq!(FormType::from_code("C7E"), FormType::C7E);
        assert_eq!(FormType::from_code(" C5 "), FormType::C5);
        assert_eq!(FormType::from_code("C2"), FormType::Unknown("C2".to_string()));
        assert_eq!(FormType::Unknown("C2".to_string()).code(), "C2");
        assert!(FormType::C6.has_schedules());
        assert!(!FormType::C7.has_schedules());
    }

    #[test]
    fn form_type_serializes_as_code() {
        let json = serde_json::to_string(&FormType::C7E).unwrap();
        assert_eq!(json, "\"C7E\"");
        let back: FormType = serde_json::from_str("\"C9\"").unwrap();
        assert_eq!(back, FormType::Unknown("C9".to_string()));
    }

    #[test]
    fn tally_split_rounds_total() {
        let t = Tally::split(0.1, 0.2);
        assert_eq!(t.total, 0.3);
        assert_eq!(t.primary, Some(0.1));
    }

    #[test]
    fn committee_tally_omits_split_in_json() {
        let json = serde_json::to_value(Tally::total_only(12.5)).unwrap();
        assert_eq!(json, serde_json::json!({"total": 12.5}));
    }

    #[test]
    fn unitemized_is_receipts_minus_cash() {
        let summary = Summary {
            receipts: Some(Tally::split(600.0, 400.0)),
            ..Summary::default()
        };
        let rows = vec![cash(500.0, "CA"), cash(250.0, "CA"), cash(80.0, "IK")];
        assert_eq!(unitemized_contributions(&summary, &rows), 250.0);
    }

    #[test]
    fn unitemized_without_receipts_line() {
        let rows = vec![cash(10.0, "CA")];
        assert_eq!(unitemized_contributions(&Summary::default(), &rows), -10.0);
    }

    #[test]
    fn refresh_skips_late_notices_and_summary_only() {
        let mut parsed = ParsedReport::empty(&c5());
        parsed.summary.receipts = Some(Tally::split(100.0, 0.0));
        parsed.refresh_unitemized();
        assert_eq!(parsed.unitemized_contributions, 0.0);

        parsed.itemized = true;
        parsed.refresh_unitemized();
        assert_eq!(parsed.unitemized_contributions, 100.0);

        parsed.report.form_type = FormType::C7;
        parsed.refresh_unitemized();
        assert_eq!(parsed.unitemized_contributions, 0.0);
    }

    #[test]
    fn report_label_and_end_date() {
        let r = c5();
        assert_eq!(r.label(), "01/01/2024 to 03/31/2024");
        assert_eq!(r.end_date(), NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(r.filer.filer_id(), FilerId::Candidate(18001));
        let ctx = r.filer_context();
        assert_eq!(ctx.filer_type, "Candidate");
        assert_eq!(ctx.report_type, "C5");
    }

    #[test]
    fn report_from_committee_listing() {
        let row: ReportResult = serde_json::from_value(serde_json::json!({
            "reportId": 68001,
            "fromDateStr": "01/01/2024",
            "toDateStr": "03/31/2024",
            "formTypeCode": "C6",
            "amendedDate": 1713312000000i64,
            "committeeDTO": {"committeeId": 2101, "committeeName": "Montanans for Public Lands"}
        }))
        .unwrap();
        let report = Report::from_listing(&row).unwrap();
        assert_eq!(report.filer.kind, FilerKind::Committee);
        assert_eq!(report.form_type, FormType::C6);
        assert_eq!(report.amended_date.as_deref(), Some("1713312000000"));
    }

    #[test]
    fn report_without_filer_is_rejected() {
        let row: ReportResult = serde_json::from_value(serde_json::json!({
            "reportId": 1,
            "fromDateStr": "01/01/2024",
            "toDateStr": "03/31/2024",
            "formTypeCode": "C5"
        }))
        .unwrap();
        assert!(Report::from_listing(&row).is_err());
    }
}
