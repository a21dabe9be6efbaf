//! Per-entity rollup of parsed reports and the raw per-entity exports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::CersError;
use crate::report::itemized::{Contribution, Expenditure};
use crate::report::normalize::round_cents;
use crate::report::{
    parse_portal_date, FilerKind, FormType, ParsedReport, Summary, Tally, UnhandledCategory,
};

/// Form types that count toward a candidate's totals.
const CANDIDATE_FORMS: &[FormType] = &[FormType::C5, FormType::C7, FormType::C7E];
/// Form types that count toward a committee's totals.
const COMMITTEE_FORMS: &[FormType] = &[FormType::C4, FormType::C6, FormType::C7, FormType::C7E];

/// Totals across an entity's reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub receipts: Tally,
    pub expenditures: Tally,
    /// Receipts less expenditures.
    pub cash_on_hand: Tally,
    pub report_counts: BTreeMap<String, usize>,
    pub unitemized_contributions: f64,
}

/// One report's line in an entity summary export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDigest {
    /// `MM/DD/YYYY to MM/DD/YYYY`
    pub report: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub form_type: String,
    pub start_date: String,
    pub end_date: String,
    pub unitemized_contributions: f64,
    pub num_contributions: usize,
    pub num_expenditures: usize,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unhandled: Vec<UnhandledCategory>,
}

/// Contents of `{slug}-summary.json`.
///
/// Committee totals include C4 closing reports alongside C6, C7 and C7E, so a
/// committee that filed a C4 reports more receipts here than the portal's
/// C6-only figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryExport {
    pub slug: String,
    pub filer_id: i64,
    pub filer_name: String,
    pub filer_type: FilerKind,
    /// Office for candidates, committee type for committees.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    pub scrape_date: String,
    pub periods: usize,
    pub receipts: f64,
    pub expenditures: f64,
    pub balance: f64,
    pub summary: EntitySummary,
    pub reports: Vec<ReportDigest>,
}

/// Paths written by [`EntityFilings::export`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub summary: PathBuf,
    pub contributions: PathBuf,
    pub expenditures: PathBuf,
}

/// An entity with its parsed reports.
#[derive(Debug, Clone)]
pub struct EntityFilings {
    pub entity: Entity,
    pub reports: Vec<ParsedReport>,
}

impl EntityFilings {
    pub fn new(entity: Entity, reports: Vec<ParsedReport>) -> Self {
        Self { entity, reports }
    }

    fn summed_forms(&self) -> &'static [FormType] {
        match self.entity.kind {
            FilerKind::Candidate => CANDIDATE_FORMS,
            FilerKind::Committee => COMMITTEE_FORMS,
        }
    }

    /// Receipts, expenditures and cash on hand across the entity's reports.
    pub fn summary(&self) -> EntitySummary {
        let forms = self.summed_forms();
        let counted: Vec<&ParsedReport> = self
            .reports
            .iter()
            .filter(|r| forms.contains(&r.report.form_type))
            .collect();

        let mut report_counts = BTreeMap::new();
        for form in forms {
            let n = counted
                .iter()
                .filter(|r| &r.report.form_type == form)
                .count();
            report_counts.insert(form.to_string(), n);
        }

        let receipts = sum_tallies(counted.iter().map(|r| r.summary.receipts));
        let expenditures = sum_tallies(counted.iter().map(|r| r.summary.expenditures));
        let (receipts, expenditures) = match self.entity.kind {
            FilerKind::Candidate => (receipts, expenditures),
            FilerKind::Committee => (
                Tally::total_only(receipts.total),
                Tally::total_only(expenditures.total),
            ),
        };

        EntitySummary {
            receipts,
            expenditures,
            cash_on_hand: difference(&receipts, &expenditures),
            report_counts,
            unitemized_contributions: round_cents(
                self.reports.iter().map(|r| r.unitemized_contributions).sum(),
            ),
        }
    }

    /// Per-report lines, ordered by period end date.
    pub fn report_digests(&self) -> Vec<ReportDigest> {
        let mut digests: Vec<ReportDigest> = self
            .reports
            .iter()
            .map(|r| ReportDigest {
                report: r.report.label(),
                id: r.report.id,
                form_type: r.report.form_type.to_string(),
                start_date: r.report.from_date.clone(),
                end_date: r.report.to_date.clone(),
                unitemized_contributions: r.unitemized_contributions,
                num_contributions: r.contributions.len(),
                num_expenditures: r.expenditures.len(),
                summary: r.summary.clone(),
                unhandled: r.unhandled.clone(),
            })
            .collect();
        // unparseable end dates sort last
        digests.sort_by_key(|d| parse_portal_date(&d.end_date).unwrap_or(NaiveDate::MAX));
        digests
    }

    /// Every contribution, stamped with its filer and report.
    pub fn contributions(&self) -> Vec<Contribution> {
        let mut out = Vec::new();
        for parsed in &self.reports {
            let ctx = parsed.report.filer_context();
            out.extend(parsed.contributions.iter().cloned().map(|mut c| {
                c.set_context(&ctx);
                c
            }));
        }
        out
    }

    /// Every expenditure, stamped with its filer and report.
    pub fn expenditures(&self) -> Vec<Expenditure> {
        let mut out = Vec::new();
        for parsed in &self.reports {
            let ctx = parsed.report.filer_context();
            out.extend(parsed.expenditures.iter().cloned().map(|mut e| {
                e.set_context(&ctx);
                e
            }));
        }
        out
    }

    pub fn summary_export(&self, scrape_date: NaiveDate) -> SummaryExport {
        let summary = self.summary();
        SummaryExport {
            slug: self.entity.slug(),
            filer_id: self.entity.id,
            filer_name: self.entity.name.clone(),
            filer_type: self.entity.kind,
            description: self.entity.description().map(str::to_string),
            party: self.entity.party.clone(),
            scrape_date: scrape_date.format("%Y-%m-%d").to_string(),
            periods: self.reports.len(),
            receipts: summary.receipts.total,
            expenditures: summary.expenditures.total,
            balance: summary.cash_on_hand.total,
            summary,
            reports: self.report_digests(),
        }
    }

    /// Writes `{slug}-summary.json`, `{slug}-contributions-itemized.json` and
    /// `{slug}-expenditures-itemized.json` into `dir`.
    pub fn export(&self, dir: &Path, scrape_date: NaiveDate) -> Result<ExportPaths, CersError> {
        std::fs::create_dir_all(dir)?;
        let slug = self.entity.slug();
        let paths = ExportPaths {
            summary: dir.join(format!("{}-summary.json", slug)),
            contributions: dir.join(format!("{}-contributions-itemized.json", slug)),
            expenditures: dir.join(format!("{}-expenditures-itemized.json", slug)),
        };

        std::fs::write(
            &paths.summary,
            serde_json::to_string_pretty(&self.summary_export(scrape_date))?,
        )?;
        std::fs::write(
            &paths.contributions,
            serde_json::to_string(&self.contributions())?,
        )?;
        std::fs::write(
            &paths.expenditures,
            serde_json::to_string(&self.expenditures())?,
        )?;
        tracing::info!("{} written to {}", slug, dir.display());
        Ok(paths)
    }
}

fn sum_tallies(tallies: impl Iterator<Item = Option<Tally>>) -> Tally {
    let (mut primary, mut general, mut total) = (0.0, 0.0, 0.0);
    for t in tallies.flatten() {
        primary += t.primary.unwrap_or_default();
        general += t.general.unwrap_or_default();
        total += t.total;
    }
    Tally {
        primary: Some(round_cents(primary)),
        general: Some(round_cents(general)),
        total: round_cents(total),
    }
}

fn difference(a: &Tally, b: &Tally) -> Tally {
    let sub = |x: Option<f64>, y: Option<f64>| match (x, y) {
        (None, None) => None,
        (x, y) => Some(round_cents(x.unwrap_or_default() - y.unwrap_or_default())),
    };
    Tally {
        primary: sub(a.primary, b.primary),
        general: sub(a.general, b.general),
        total: round_cents(a.total - b.total),
    }
}
