//! Reads the summary table of a rendered report page.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::normalize::parse_currency;
use super::{Report, Summary, Tally};
use crate::error::CersError;

/// How many amount columns a summary row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLayout {
    /// Candidate filings: cell 2 is the primary amount, cell 3 the general.
    PrimaryGeneral,
    /// Committee filings: cell 2 is the total.
    TotalOnly,
}

const PREVIOUS_REPORT: &str = "previous report";
const RECEIPTS: &str = "Receipts";
const EXPENDITURES: &str = "Expenditures";
const ENDING_BALANCE: &str = "Ending Balance";

/// Extracts the four summary lines from a report page.
///
/// A missing table or row is logged and read as zero.
pub fn parse_summary(
    html: &str,
    layout: SummaryLayout,
    report: &Report,
) -> Result<Summary, CersError> {
    let document = Html::parse_document(html);
    let table_sel = selector("div#summaryAccordionId table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let mut summary = Summary::for_period(report);
    let Some(table) = document.select(&table_sel).next() else {
        tracing::warn!("No summary table on report {}, reading zeros", report.id);
        let zero = zero_tally(layout);
        summary.previous_report = Some(zero);
        summary.receipts = Some(zero);
        summary.expenditures = Some(zero);
        summary.ending_balance = Some(zero);
        return Ok(summary);
    };

    let rows: Vec<Vec<String>> = table
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).map(cell_text).collect())
        .collect();

    summary.previous_report = Some(line(&rows, PREVIOUS_REPORT, layout, report)?);
    summary.receipts = Some(line(&rows, RECEIPTS, layout, report)?);
    summary.expenditures = Some(line(&rows, EXPENDITURES, layout, report)?);
    summary.ending_balance = Some(line(&rows, ENDING_BALANCE, layout, report)?);
    Ok(summary)
}

fn line(
    rows: &[Vec<String>],
    label: &str,
    layout: SummaryLayout,
    report: &Report,
) -> Result<Tally, CersError> {
    let label_re = Regex::new(label)
        .map_err(|e| CersError::Parse(format!("regex compile error: {}", e)))?;

    let Some(cells) = rows
        .iter()
        .find(|cells| cells.iter().any(|c| label_re.is_match(c)))
    else {
        tracing::warn!(
            "No '{}' row in summary of report {}, reading zero",
            label,
            report.id
        );
        return Ok(zero_tally(layout));
    };

    Ok(match layout {
        SummaryLayout::PrimaryGeneral => {
            let primary = amount_cell(cells, 2, label, report);
            let general = amount_cell(cells, 3, label, report);
            Tally::split(primary, general)
        }
        SummaryLayout::TotalOnly => Tally::total_only(amount_cell(cells, 2, label, report)),
    })
}

fn amount_cell(cells: &[String], index: usize, label: &str, report: &Report) -> f64 {
    let Some(raw) = cells.get(index) else {
        tracing::warn!(
            "'{}' row of report {} has no cell {}, reading zero",
            label,
            report.id,
            index
        );
        return 0.0;
    };
    match parse_currency(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("{} in '{}' row of report {}, reading zero", e, label, report.id);
            0.0
        }
    }
}

fn zero_tally(layout: SummaryLayout) -> Tally {
    match layout {
        SummaryLayout::PrimaryGeneral => Tally::split(0.0, 0.0),
        SummaryLayout::TotalOnly => Tally::total_only(0.0),
    }
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().map(str::trim).collect::<Vec<_>>().join("")
}

fn selector(css: &str) -> Result<Selector, CersError> {
    Selector::parse(css).map_err(|e| CersError::Parse(format!("selector '{}': {:?}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Filer, FilerKind, FormType};

    fn report() -> Report {
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
            amended_date: None,
        }
    }

    const CANDIDATE_PAGE: &str = r#"
        <html><body>
        <div id="summaryAccordionId">
          <table>
            <tr><th></th><th>Line</th><th>Primary</th><th>General</th></tr>
            <tr><td>1</td><td>Ending balance from previous report</td><td>$1,000.00</td><td>$0.00</td></tr>
            <tr><td>2</td><td>Receipts</td><td>$600.00</td><td>$400.00</td></tr>
            <tr><td>3</td><td>Expenditures</td><td>($50.25)</td><td>$100.00</td></tr>
            <tr><td>4</td><td>Ending Balance</td><td>$1,650.25</td><td>$300.00</td></tr>
          </table>
        </div>
        </body></html>
    "#;

    const COMMITTEE_PAGE: &str = r#"
        <div id="summaryAccordionId"><table>
          <tr><td>a</td><td>Balance from previous report</td><td>$20.00</td></tr>
          <tr><td>b</td><td>Receipts</td><td>$2,500.00</td></tr>
          <tr><td>c</td><td>Expenditures</td><td>$1,000.00</td></tr>
          <tr><td>d</td><td>Ending Balance</td><td>$1,520.00</td></tr>
        </table></div>
    "#;

    #[test]
    fn candidate_rows_split_primary_and_general() {
        let s = parse_summary(CANDIDATE_PAGE, SummaryLayout::PrimaryGeneral, &report()).unwrap();
        assert_eq!(s.report_start_date, "01/01/2024");
        assert_eq!(s.previous_report, Some(Tally::split(1000.0, 0.0)));
        let receipts = s.receipts.unwrap();
        assert_eq!(receipts.primary, Some(600.0));
        assert_eq!(receipts.general, Some(400.0));
        assert_eq!(receipts.total, 1000.0);
        assert_eq!(s.expenditures.unwrap().total, 49.75);
        assert_eq!(s.ending_balance.unwrap().primary, Some(1650.25));
    }

    #[test]
    fn committee_rows_read_total() {
        let s = parse_summary(COMMITTEE_PAGE, SummaryLayout::TotalOnly, &report()).unwrap();
        assert_eq!(s.receipts, Some(Tally::total_only(2500.0)));
        assert_eq!(s.previous_report, Some(Tally::total_only(20.0)));
        assert!(s.receipts.unwrap().primary.is_none());
    }

    #[test]
    fn missing_table_reads_zero() {
        let s = parse_summary("<html><p>error</p></html>", SummaryLayout::TotalOnly, &report())
            .unwrap();
        assert_eq!(s.receipts, Some(Tally::total_only(0.0)));
        assert_eq!(s.ending_balance, Some(Tally::total_only(0.0)));
    }

    #[test]
    fn missing_row_and_bad_cell_read_zero() {
        let html = r#"<div id="summaryAccordionId"><table>
            <tr><td>b</td><td>Receipts</td><td>pending</td><td>$5.00</td></tr>
        </table></div>"#;
        let s = parse_summary(html, SummaryLayout::PrimaryGeneral, &report()).unwrap();
        assert_eq!(s.receipts, Some(Tally::split(0.0, 5.0)));
        assert_eq!(s.expenditures, Some(Tally::split(0.0, 0.0)));
    }
}
