//! On-disk cache of parsed reports.
//!
//! One JSON file per report, named `{FORM}-{id}.json`. A cached copy is only
//! reused while its amendment timestamp matches the one the portal lists.

use std::path::{Path, PathBuf};

use cers_api::types::ReportID;

use crate::error::CersError;
use crate::report::{FormType, ParsedReport, Report};

/// Parsed-report cache rooted at one directory. Assumes a single writer.
#[derive(Debug, Clone)]
pub struct ReportCache {
    dir: PathBuf,
}

impl ReportCache {
    /// Nothing is touched until the first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, report_id: ReportID, form_type: &FormType) -> PathBuf {
        self.dir.join(format!("{}-{}.json", form_type, report_id))
    }

    /// Reads a cached report regardless of freshness.
    ///
    /// Missing and unreadable files are both a miss.
    pub fn load(
        &self,
        report_id: ReportID,
        form_type: &FormType,
    ) -> Result<Option<ParsedReport>, CersError> {
        let path = self.path_for(report_id, form_type);
        if !path.is_file() {
            return Ok(None);
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Unreadable cache file {}: {}", path.display(), e);
                return Ok(None);
            }
        };
        match serde_json::from_str::<ParsedReport>(&content) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Reads a cached report only if it is current for `report`.
    pub fn load_fresh(&self, report: &Report) -> Result<Option<ParsedReport>, CersError> {
        let Some(mut cached) = self.load(report.id, &report.form_type)? else {
            return Ok(None);
        };
        if cached.report.amended_date != report.amended_date {
            tracing::info!("----- Actually, amendment found on {}", report.id);
            return Ok(None);
        }
        tracing::info!(
            "--- From cache, loading {} {}-{} ({})",
            report.form_type,
            report.from_date,
            report.to_date,
            report.id
        );
        cached.report = report.clone();
        cached.refresh_unitemized();
        Ok(Some(cached))
    }

    /// Writes (or overwrites) the cache file for a parsed report.
    pub fn store(&self, parsed: &ParsedReport) -> Result<PathBuf, CersError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CersError::Cache(format!("cannot create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_for(parsed.report.id, &parsed.report.form_type);
        let json = serde_json::to_string_pretty(parsed)?;
        std::fs::write(&path, json)
            .map_err(|e| CersError::Cache(format!("cannot write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}
