//! Per-form-type report parsing.

use cers_api::types::DetailRow;

use crate::error::CersError;
use crate::manual::ManualCaches;
use crate::portal::Portal;
use crate::report::itemized::{Contribution, Expenditure};
use crate::report::normalize::round_cents;
use crate::report::schedule::parse_schedule;
use crate::report::summary_html::{parse_summary, SummaryLayout};
use crate::report::{FormType, ParsedReport, Report, Summary, Tally, UnhandledCategory};

/// C7 lists folded into the contribution table.
const C7_CONTRIBUTION_LISTS: &[&str] = &["individual", "committee", "loan"];
/// C7 lists that are only checked for rows.
const C7_FLAGGED_LISTS: &[&str] = &["candidate", "fundraisers", "refunds", "payment"];
/// C7E lists folded into the expenditure table.
const C7E_EXPENDITURE_LISTS: &[&str] = &["expendOther"];
/// C7E lists that are only checked for rows.
const C7E_FLAGGED_LISTS: &[&str] = &["candidate", "pettyCash", "debtLoan"];

/// Schedule codes for contributions and expenditures.
fn schedule_codes(form: &FormType) -> Option<(&'static str, &'static str)> {
    match form {
        FormType::C4 => Some(("C4A", "C4B")),
        FormType::C5 => Some(("A", "B")),
        FormType::C6 => Some(("C6A", "C6B")),
        _ => None,
    }
}

/// Turns listed reports into [`ParsedReport`]s.
pub struct ReportParser<P> {
    portal: P,
    manual: ManualCaches,
    fetch_itemized: bool,
}

impl<P: Portal> ReportParser<P> {
    pub fn new(portal: P, manual: ManualCaches) -> Self {
        Self {
            portal,
            manual,
            fetch_itemized: true,
        }
    }

    /// When off, schedule filings are parsed for their summary only.
    pub fn with_fetch_itemized(mut self, fetch_itemized: bool) -> Self {
        self.fetch_itemized = fetch_itemized;
        self
    }

    pub fn portal(&self) -> &P {
        &self.portal
    }

    /// Parses one report.
    ///
    /// Unknown form types give an empty result. Errors are returned so that
    /// callers can keep a failed parse out of the cache.
    pub async fn parse(&self, report: &Report) -> Result<ParsedReport, CersError> {
        match &report.form_type {
            FormType::C4 | FormType::C5 | FormType::C6 => self.parse_schedule_filing(report).await,
            FormType::C7 => self.parse_c7(report).await,
            FormType::C7E => self.parse_c7e(report).await,
            FormType::Unknown(code) => {
                tracing::warn!("Unhandled report type {} ({})", code, report.id);
                Ok(ParsedReport::empty(report))
            }
        }
    }

    async fn parse_schedule_filing(&self, report: &Report) -> Result<ParsedReport, CersError> {
        tracing::info!(
            "Fetching {} {}-{} ({})",
            report.form_type,
            report.from_date,
            report.to_date,
            report.id
        );

        let layout = match report.form_type {
            FormType::C5 => SummaryLayout::PrimaryGeneral,
            _ => SummaryLayout::TotalOnly,
        };
        let html = match self.manual.summary(report.id)? {
            Some(html) => html,
            None => self.portal.report_page(report).await?,
        };
        let summary = parse_summary(&html, layout, report)?;

        let mut parsed = ParsedReport {
            report: report.clone(),
            summary,
            contributions: Vec::new(),
            expenditures: Vec::new(),
            unitemized_contributions: 0.0,
            unhandled: Vec::new(),
            itemized: false,
        };

        if self.fetch_itemized {
            if let Some((contrib_code, expend_code)) = schedule_codes(&report.form_type) {
                let text = match self.manual.contributions(report.id)? {
                    Some(text) => Some(text),
                    None => self.download(report, contrib_code).await?,
                };
                parsed.contributions =
                    parse_schedule::<Contribution>(text.as_deref().unwrap_or_default(), report.id);

                let text = match self.manual.expenditures(report.id)? {
                    Some(text) => Some(text),
                    None => self.download(report, expend_code).await?,
                };
                parsed.expenditures =
                    parse_schedule::<Expenditure>(text.as_deref().unwrap_or_default(), report.id);
                parsed.itemized = true;
            }
        }

        parsed.refresh_unitemized();
        Ok(parsed)
    }

    async fn download(&self, report: &Report, code: &str) -> Result<Option<String>, CersError> {
        let text = self.portal.schedule(report, code).await?;
        if text.is_none() {
            tracing::warn!(
                "No file for schedule {}, {}-{}. Report ID: {}",
                code,
                report.from_date,
                report.to_date,
                report.id
            );
        }
        Ok(text)
    }

    async fn parse_c7(&self, report: &Report) -> Result<ParsedReport, CersError> {
        tracing::info!(
            "Fetching C7 {}-{} ({})",
            report.from_date,
            report.to_date,
            report.id
        );

        let lists = [C7_CONTRIBUTION_LISTS, C7_FLAGGED_LISTS].concat();
        let fetched = self.portal.detail_lists(report, &lists).await?;

        let mut contributions = Vec::new();
        let mut unhandled = Vec::new();
        for (list, rows) in &fetched {
            if C7_CONTRIBUTION_LISTS.contains(&list.as_str()) {
                contributions.extend(rows.iter().map(Contribution::from_detail));
            } else {
                flag_unhandled(report, list, rows, &mut unhandled);
            }
        }

        let mut summary = Summary::for_period(report);
        summary.receipts = Some(election_tally(
            contributions.iter().map(|c| (c.election_type.as_str(), c.amount)),
        ));
        summary.expenditures = Some(Tally::split(0.0, 0.0));

        Ok(ParsedReport {
            report: report.clone(),
            summary,
            contributions,
            expenditures: Vec::new(),
            unitemized_contributions: 0.0,
            unhandled,
            itemized: true,
        })
    }

    async fn parse_c7e(&self, report: &Report) -> Result<ParsedReport, CersError> {
        tracing::info!(
            "Fetching C7E {}-{} ({})",
            report.from_date,
            report.to_date,
            report.id
        );

        let lists = [C7E_EXPENDITURE_LISTS, C7E_FLAGGED_LISTS].concat();
        let fetched = self.portal.detail_lists(report, &lists).await?;

        let mut expenditures = Vec::new();
        let mut unhandled = Vec::new();
        for (list, rows) in &fetched {
            if C7E_EXPENDITURE_LISTS.contains(&list.as_str()) {
                expenditures.extend(rows.iter().map(Expenditure::from_detail));
            } else {
                flag_unhandled(report, list, rows, &mut unhandled);
            }
        }

        let mut summary = Summary::for_period(report);
        summary.receipts = Some(Tally::split(0.0, 0.0));
        summary.expenditures = Some(election_tally(
            expenditures.iter().map(|e| (e.election_type.as_str(), e.amount)),
        ));

        Ok(ParsedReport {
            report: report.clone(),
            summary,
            contributions: Vec::new(),
            expenditures,
            unitemized_contributions: 0.0,
            unhandled,
            itemized: true,
        })
    }
}

fn flag_unhandled(
    report: &Report,
    list: &str,
    rows: &[DetailRow],
    unhandled: &mut Vec<UnhandledCategory>,
) {
    if rows.is_empty() {
        return;
    }
    tracing::warn!(
        "{} report {} has {} unhandled '{}' rows",
        report.form_type,
        report.id,
        rows.len(),
        list
    );
    unhandled.push(UnhandledCategory {
        list: list.to_string(),
        rows: rows.len(),
    });
}

/// Sums amounts by election type. The total covers every row, including
/// rows tagged neither primary nor general.
fn election_tally<'a>(rows: impl Iterator<Item = (&'a str, f64)>) -> Tally {
    let (mut primary, mut general, mut total) = (0.0, 0.0, 0.0);
    for (election, amount) in rows {
        match election {
            "Primary" => primary += amount,
            "General" => general += amount,
            _ => {}
        }
        total += amount;
    }
    Tally {
        primary: Some(round_cents(primary)),
        general: Some(round_cents(general)),
        total: round_cents(total),
    }
}
