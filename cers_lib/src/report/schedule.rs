//! Parsing of pipe-delimited schedule downloads.

use cers_api::types::ReportID;
use serde::de::DeserializeOwned;

/// Reads a schedule download into records.
///
/// The format is `|`-delimited with a header row and no quoting. Rows that
/// do not fit are logged and skipped; empty text yields no rows.
pub fn parse_schedule<T: DeserializeOwned>(text: &str, report_id: ReportID) -> Vec<T> {
    if text.trim().is_empty() {
        tracing::warn!("Empty schedule file. Report ID: {}", report_id);
        return Vec::new();
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("Unreadable schedule header on report {}: {}", report_id, e);
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let line = index + 2;
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping line {} of report {}: {}", line, report_id, e);
                continue;
            }
        };
        if record.len() > headers.len() {
            tracing::warn!(
                "Skipping line {} of report {}: expected {} fields, saw {}",
                line,
                report_id,
                headers.len(),
                record.len()
            );
            continue;
        }
        // short rows read as blanks in the missing columns
        while record.len() < headers.len() {
            record.push_field("");
        }
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("Skipping line {} of report {}: {}", line, report_id, e),
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::itemized::{Contribution, Expenditure};

    const SCHEDULE_A: &str = "\
Date Paid|Entity Name|First Name|Last Name|Addr Line1|City|State|Zip|Contribution Type|Amount|Amount Type|Election Type|Total Primary|Total General
01/15/2024|Smith, Pat|Pat|Smith|123 Main St|Helena|MT|59601|9|500.00|CA|Primary|500.00|
01/20/2024|O\"Brien, Kim|Kim|O\"Brien|4 Elm St|Butte|MT|59701|9|$1,250.00|CA|General||1250
02/01/2024|Acme Hardware|||88 Front St|Billings|MT|59101|4|80|IK|Primary||
";

    #[test]
    fn contributions_from_schedule_a() {
        let rows: Vec<Contribution> = parse_schedule(SCHEDULE_A, 66995);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].entity_name, "Smith, Pat");
        assert_eq!(rows[0].amount, 500.0);
        assert_eq!(rows[0].total_primary, Some(500.0));
        assert!(rows[0].total_general.is_none());
        assert_eq!(rows[0].contribution_type, "9");
        // quotes are literal text, not field delimiters
        assert_eq!(rows[1].last_name, "O\"Brien");
        assert_eq!(rows[1].amount, 1250.0);
        assert_eq!(rows[2].amount_type, "IK");
        assert_eq!(rows[2].zip, "59101");
    }

    #[test]
    fn leading_zero_zips_survive() {
        let text = "Entity Name|Zip|Amount\nActBlue|02144|10\n";
        let rows: Vec<Contribution> = parse_schedule(text, 1);
        assert_eq!(rows[0].zip, "02144");
    }

    #[test]
    fn short_rows_fill_defaults() {
        let text = "Entity Name|City|Expenditure Type|Amount|Purpose\nBig Sky Printing|Helena|Other|1200.5\n";
        let rows: Vec<Expenditure> = parse_schedule(text, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 1200.5);
        assert_eq!(rows[0].purpose, "");
    }

    #[test]
    fn long_rows_are_skipped() {
        let text = "Entity Name|Amount\nA|1\nB|2|extra\nC|3\n";
        let rows: Vec<Contribution> = parse_schedule(text, 1);
        let names: Vec<&str> = rows.iter().map(|r| r.entity_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn empty_text_is_empty_table() {
        let rows: Vec<Contribution> = parse_schedule("", 42);
        assert!(rows.is_empty());
        let rows: Vec<Contribution> = parse_schedule("\n", 42);
        assert!(rows.is_empty());
    }
}
