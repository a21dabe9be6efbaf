//! Combines raw per-entity exports into cleaned CSV and JSON files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CersError;
use crate::filings::SummaryExport;
use crate::report::itemized::{Contribution, Expenditure};

/// Labels for the numeric contribution-type codes of schedule downloads.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionTypes {
    labels: BTreeMap<String, String>,
}

impl Default for ContributionTypes {
    fn default() -> Self {
        Self::new([
            ("1", "Personal contributions"),
            ("2", "Unitemized contributions"),
            ("3", "Loans"),
            ("4", "Fundraisers & misc"),
            ("5", "PAC contributions"),
            ("6", "Political party contributions"),
            ("7", "Incidental committee contributions"),
            ("8", "Other political committee contributions"),
            ("9", "Individual contributions"),
        ])
    }
}

impl ContributionTypes {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            labels: pairs
                .into_iter()
                .map(|(code, label)| (code.to_string(), label.to_string()))
                .collect(),
        }
    }

    /// The label for a code. Unmapped or non-numeric values pass through.
    pub fn label(&self, code: &str) -> String {
        let trimmed = code.trim();
        let key = match trimmed.parse::<f64>() {
            // downloads sometimes render codes as `9.0`
            Ok(n) if n.fract() == 0.0 => format!("{}", n as i64),
            _ => trimmed.to_string(),
        };
        self.labels
            .get(&key)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

/// Everything read from a raw export directory.
#[derive(Debug, Clone, Default)]
pub struct CleanedData {
    pub summaries: Vec<SummaryExport>,
    pub contributions: Vec<Contribution>,
    pub expenditures: Vec<Expenditure>,
}

/// Reads raw exports, tidies them and writes the cleaned files.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    types: ContributionTypes,
}

impl Cleaner {
    pub fn new(types: ContributionTypes) -> Self {
        Self { types }
    }

    /// Reads every `*-summary.json`, `*-contributions-itemized.json` and
    /// `*-expenditures-itemized.json` in `raw_dir`. Unreadable files are
    /// logged and skipped.
    pub fn collect(&self, raw_dir: &Path) -> Result<CleanedData, CersError> {
        let mut data = CleanedData::default();

        for path in matching(raw_dir, "*-summary.json")? {
            let Some(mut summary) = read_json::<SummaryExport>(&path) else {
                continue;
            };
            summary.filer_name = summary.filer_name.trim().to_string();
            data.summaries.push(summary);
        }

        for path in matching(raw_dir, "*-contributions-itemized.json")? {
            let Some(rows) = read_json::<Vec<Contribution>>(&path) else {
                continue;
            };
            data.contributions.extend(rows.into_iter().map(|mut c| {
                c.trim_names();
                c.contribution_type_label = self.types.label(&c.contribution_type);
                c
            }));
        }

        for path in matching(raw_dir, "*-expenditures-itemized.json")? {
            let Some(rows) = read_json::<Vec<Expenditure>>(&path) else {
                continue;
            };
            data.expenditures.extend(rows.into_iter().map(|mut e| {
                e.trim_names();
                e
            }));
        }

        tracing::info!(
            "Read {} summaries, {} contributions and {} expenditures from {}",
            data.summaries.len(),
            data.contributions.len(),
            data.expenditures.len(),
            raw_dir.display()
        );
        Ok(data)
    }

    /// Writes `contributions.csv`, `expenditures.csv` and `summary.json`.
    pub fn write(&self, data: &CleanedData, out_dir: &Path) -> Result<(), CersError> {
        std::fs::create_dir_all(out_dir)?;
        write_csv(&out_dir.join("contributions.csv"), &data.contributions)?;
        write_csv(&out_dir.join("expenditures.csv"), &data.expenditures)?;
        std::fs::write(
            out_dir.join("summary.json"),
            serde_json::to_string(&data.summaries)?,
        )?;
        tracing::info!("Cleaned data written to {}", out_dir.display());
        Ok(())
    }

    /// [`collect`](Self::collect) then [`write`](Self::write).
    pub fn clean(&self, raw_dir: &Path, out_dir: &Path) -> Result<CleanedData, CersError> {
        let data = self.collect(raw_dir)?;
        self.write(&data, out_dir)?;
        Ok(data)
    }
}

/// Files in `dir` matching `pattern`, sorted by path.
fn matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, CersError> {
    let dir_pattern = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", dir_pattern.trim_end_matches('/'), pattern);
    let paths = glob::glob(&full)
        .map_err(|e| CersError::InvalidInput(format!("bad pattern '{}': {}", full, e)))?;

    let mut out = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => out.push(path),
            Err(e) => tracing::warn!("Skipping unreadable path: {}", e),
        }
    }
    out.sort();
    Ok(out)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let parsed = std::fs::read_to_string(path)
        .map_err(CersError::from)
        .and_then(|content| serde_json::from_str(&content).map_err(CersError::from));
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

fn write_csv<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<(), CersError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels() {
        let types = ContributionTypes::default();
        assert_eq!(types.label("1"), "Personal contributions");
        assert_eq!(types.label("9"), "Individual contributions");
        assert_eq!(types.label("9.0"), "Individual contributions");
        assert_eq!(types.label(" 4 "), "Fundraisers & misc");
    }

    #[test]
    fn unmapped_values_pass_through() {
        let types = ContributionTypes::default();
        assert_eq!(types.label("Individual"), "Individual");
        assert_eq!(types.label("12"), "12");
        assert_eq!(types.label(""), "");
    }

    #[test]
    fn injected_table() {
        let types = ContributionTypes::new([("1", "Self")]);
        assert_eq!(types.label("1"), "Self");
        assert_eq!(types.label("2"), "2");
    }

    #[test]
    fn empty_directory_cleans_to_empty_outputs() {
        let raw = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let data = Cleaner::default()
            .clean(raw.path(), &out.path().join("clean"))
            .unwrap();
        assert!(data.summaries.is_empty());
        let summary = std::fs::read_to_string(out.path().join("clean/summary.json")).unwrap();
        assert_eq!(summary, "[]");
        assert!(out.path().join("clean/contributions.csv").is_file());
    }

    #[test]
    fn unreadable_export_is_skipped() {
        let raw = tempfile::tempdir().unwrap();
        std::fs::write(raw.path().join("Broken-summary.json"), "{not json").unwrap();
        std::fs::write(
            raw.path().join("Broken-contributions-itemized.json"),
            r#"{"rows": 1}"#,
        )
        .unwrap();
        std::fs::write(
            raw.path().join("Smith-Pat-contributions-itemized.json"),
            r#"[{"Entity Name": " Jones, Lee ", "Amount": 25, "Contribution Type": "9"}]"#,
        )
        .unwrap();

        let data = Cleaner::default().collect(raw.path()).unwrap();
        assert!(data.summaries.is_empty());
        assert_eq!(data.contributions.len(), 1);
        assert_eq!(data.contributions[0].entity_name, "Jones, Lee");
        assert_eq!(
            data.contributions[0].contribution_type_label,
            "Individual contributions"
        );
    }
}
