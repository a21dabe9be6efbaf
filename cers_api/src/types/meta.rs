use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::to_display_string;

/// Envelope returned by the portal's DataTables list endpoints.
#[derive(Serialize, Deserialize)]
pub struct DataTableResponse<T> {
    #[serde(rename = "iTotalRecords", default)]
    pub total_records: Option<i64>,
    #[serde(rename = "iTotalDisplayRecords", default)]
    pub total_display_records: Option<i64>,
    #[serde(rename = "aaData")]
    pub data: Vec<T>,
}

/// Response of `prepareDownloadFileFromSearch`.
///
/// When a schedule file exists the object carries a `fileName` key; the whole
/// object is then sent back as the query string of `downloadFile`.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(transparent)]
pub struct DownloadTicket(pub Map<String, Value>);

impl DownloadTicket {
    pub fn file_name(&self) -> Option<String> {
        self.0.get("fileName").and_then(to_display_string)
    }

    /// Query parameters for `downloadFile`; null values are omitted.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .filter_map(|(k, v)| to_display_string(v).map(|v| (k.clone(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_without_file_name() {
        let ticket: DownloadTicket = serde_json::from_str(r#"{"message": "none"}"#).unwrap();
        assert!(ticket.file_name().is_none());
    }

    #[test]
    fn ticket_pairs_skip_nulls() {
        let ticket: DownloadTicket =
            serde_json::from_str(r#"{"fileName": "a.txt", "token": 12, "x": null}"#).unwrap();
        assert_eq!(ticket.file_name().as_deref(), Some("a.txt"));
        let pairs = ticket.query_pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("token".to_string(), "12".to_string())));
    }
}
