use anyhow::Result;
use cers_lib::{Entity, Report, SummaryExport};
use chrono::DateTime;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn from_arg(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct EntityRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Year")]
    #[serde(rename = "Year")]
    year: String,
    #[tabled(rename = "Office/Type")]
    #[serde(rename = "Office/Type")]
    description: String,
    #[tabled(rename = "Party")]
    #[serde(rename = "Party")]
    party: String,
}

#[derive(Tabled, Serialize)]
struct ReportRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Form")]
    #[serde(rename = "Form")]
    form: String,
    #[tabled(rename = "From")]
    #[serde(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    #[serde(rename = "To")]
    to: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Amended")]
    #[serde(rename = "Amended")]
    amended: String,
}

#[derive(Tabled, Serialize)]
struct ScrapeRow {
    #[tabled(rename = "Filer")]
    #[serde(rename = "Filer")]
    slug: String,
    #[tabled(rename = "Reports")]
    #[serde(rename = "Reports")]
    periods: usize,
    #[tabled(rename = "Receipts")]
    #[serde(rename = "Receipts")]
    receipts: String,
    #[tabled(rename = "Expenditures")]
    #[serde(rename = "Expenditures")]
    expenditures: String,
    #[tabled(rename = "Cash on Hand")]
    #[serde(rename = "Cash on Hand")]
    balance: String,
    #[tabled(rename = "Unitemized")]
    #[serde(rename = "Unitemized")]
    unitemized: String,
}

// -- Row builders --

fn build_entity_rows(entities: &[Entity]) -> Vec<EntityRow> {
    entities
        .iter()
        .map(|e| EntityRow {
            id: e.id,
            name: e.name.trim().to_string(),
            status: e.status.clone().unwrap_or_default(),
            year: e.election_year.clone().unwrap_or_default(),
            description: e.description().unwrap_or_default().to_string(),
            party: e.party.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_report_rows(reports: &[Report]) -> Vec<ReportRow> {
    reports
        .iter()
        .map(|r| ReportRow {
            id: r.id,
            form: r.form_type.to_string(),
            from: r.from_date.clone(),
            to: r.to_date.clone(),
            status: r.status.clone().unwrap_or_default(),
            amended: r.amended_date.as_deref().map(format_amended).unwrap_or_default(),
        })
        .collect()
}

fn build_scrape_rows(exports: &[SummaryExport]) -> Vec<ScrapeRow> {
    exports
        .iter()
        .map(|s| ScrapeRow {
            slug: s.slug.clone(),
            periods: s.periods,
            receipts: format_money(s.receipts),
            expenditures: format_money(s.expenditures),
            balance: format_money(s.balance),
            unitemized: format_money(s.summary.unitemized_contributions),
        })
        .collect()
}

// -- Printing --

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

pub fn print_entities(entities: &[Entity], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&entities);
            Ok(())
        }
        _ => print_rows(build_entity_rows(entities), format),
    }
}

pub fn print_reports(reports: &[Report], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&reports);
            Ok(())
        }
        _ => print_rows(build_report_rows(reports), format),
    }
}

pub fn print_scrape_summaries(exports: &[SummaryExport], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&exports);
            Ok(())
        }
        _ => print_rows(build_scrape_rows(exports), format),
    }
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// `$1,234.50`, negative amounts as `-$12.00`.
fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Amendment stamps come back as epoch milliseconds or as a display date.
fn format_amended(raw: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cers_lib::{Filer, FilerKind, FormType};

    fn entity() -> Entity {
        serde_json::from_value(serde_json::json!({
            "kind": "Candidate",
            "id": 18001,
            "name": "Busse, Ryan ",
            "status": "Active",
            "electionYear": "2024",
            "officeTitle": "Governor",
            "committeeType": null,
            "lastName": "Busse",
            "party": "Democratic",
            "county": null,
            "address": null,
            "createdDate": null
        }))
        .unwrap()
    }

    fn report(amended: Option<&str>) -> Report {
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
            status: Some("Filed".to_string()),
            amended_date: amended.map(str::to_string),
        }
    }

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn output_format_from_arg() {
        assert!(matches!(OutputFormat::from_arg("json"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from_arg("md"), OutputFormat::Markdown));
        assert!(matches!(OutputFormat::from_arg("whatever"), OutputFormat::Table));
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_money(-12.0), "-$12.00");
        assert_eq!(format_money(999.999), "$1,000.00");
    }

    #[test]
    fn amended_stamps() {
        assert_eq!(format_amended("1712102400000"), "2024-04-03");
        assert_eq!(format_amended("04/05/2024"), "04/05/2024");
    }

    #[test]
    fn entity_rows() {
        let rows = build_entity_rows(&[entity()]);
        assert_eq!(rows[0].name, "Busse, Ryan");
        assert_eq!(rows[0].description, "Governor");
        assert_eq!(rows[0].party, "Democratic");
    }

    #[test]
    fn report_rows() {
        let rows = build_report_rows(&[report(Some("1712102400000")), report(None)]);
        assert_eq!(rows[0].form, "C5");
        assert_eq!(rows[0].amended, "2024-04-03");
        assert_eq!(rows[1].amended, "");
    }

    #[test]
    fn csv_headers() {
        let csv = csv_from_rows(&build_report_rows(&[report(None)]));
        assert_eq!(csv.lines().next().unwrap(), "ID,Form,From,To,Status,Amended");

        let csv = csv_from_rows(&build_entity_rows(&[entity()]));
        assert_eq!(
            csv.lines().next().unwrap(),
            "ID,Name,Status,Year,Office/Type,Party"
        );
    }
}
