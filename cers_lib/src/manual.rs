//! Locally stored copies of reports the portal cannot serve reliably.
//!
//! Some schedules are too large for the portal to build a download on
//! demand. Their summary page and schedule files are saved by hand and
//! listed in a TOML table:
//!
//! ```toml
//! [[report]]
//! id = 66995
//! summary = "manual/Busse-Ryan-66995-q1-2024-summary.html"
//! contributions = "manual/Busse-Ryan-66995-q1-2024-contributions.csv"
//! ```
//!
//! Relative paths resolve against the directory holding the TOML file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cers_api::types::ReportID;
use serde::Deserialize;

use crate::error::CersError;

#[derive(Deserialize, Debug)]
struct ManualCacheFile {
    #[serde(default)]
    report: Vec<ManualCacheEntry>,
}

/// Files stored for one report. Any of them may be absent.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ManualCacheEntry {
    pub id: ReportID,
    #[serde(default)]
    pub summary: Option<PathBuf>,
    #[serde(default)]
    pub contributions: Option<PathBuf>,
    #[serde(default)]
    pub expenditures: Option<PathBuf>,
}

/// Immutable lookup of manually cached report files.
#[derive(Debug, Clone, Default)]
pub struct ManualCaches {
    entries: HashMap<ReportID, ManualCacheEntry>,
}

impl ManualCaches {
    /// No manual caches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads the table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CersError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CersError::Config(format!("cannot read manual cache table {}: {}", path.display(), e))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&content, base)
    }

    /// Parses the table, resolving relative paths against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, CersError> {
        let file: ManualCacheFile = toml::from_str(content)
            .map_err(|e| CersError::Config(format!("manual cache table: {}", e)))?;

        let mut entries = HashMap::new();
        for mut entry in file.report {
            for path in [
                &mut entry.summary,
                &mut entry.contributions,
                &mut entry.expenditures,
            ]
            .into_iter()
            .flatten()
            {
                if path.is_relative() {
                    *path = base_dir.join(&*path);
                }
            }
            if entries.insert(entry.id, entry.clone()).is_some() {
                return Err(CersError::Config(format!(
                    "report {} is listed twice in the manual cache table",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, report_id: ReportID) -> Option<&ManualCacheEntry> {
        self.entries.get(&report_id)
    }

    /// Stored summary page, if one is listed.
    pub fn summary(&self, report_id: ReportID) -> Result<Option<String>, CersError> {
        self.read(report_id, |e| e.summary.as_deref(), "summary")
    }

    /// Stored contribution schedule, if one is listed.
    pub fn contributions(&self, report_id: ReportID) -> Result<Option<String>, CersError> {
        self.read(report_id, |e| e.contributions.as_deref(), "contributions")
    }

    /// Stored expenditure schedule, if one is listed.
    pub fn expenditures(&self, report_id: ReportID) -> Result<Option<String>, CersError> {
        self.read(report_id, |e| e.expenditures.as_deref(), "expenditures")
    }

    fn read(
        &self,
        report_id: ReportID,
        pick: impl Fn(&ManualCacheEntry) -> Option<&Path>,
        what: &str,
    ) -> Result<Option<String>, CersError> {
        let Some(path) = self.entries.get(&report_id).and_then(pick) else {
            return Ok(None);
        };
        tracing::info!("--- Report {} from manual cache ({})", what, report_id);
        Ok(Some(std::fs::read_to_string(path)?))
    }
}
