use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use cers_lib::types::DetailRow;
use cers_lib::{
    CacheOptions, CersError, Filer, FilerKind, FormType, ManualCaches, Portal, Report,
    ReportCache, ReportLoader, ReportParser, Tally,
};

const C5_PAGE: &str = r#"
<html><body>
<div id="summaryAccordionId">
  <table>
    <tr><td>1</td><td>Ending balance from previous report</td><td>$100.00</td><td>$0.00</td></tr>
    <tr><td>2</td><td>Receipts</td><td>$1,000.00</td><td>$250.00</td></tr>
    <tr><td>3</td><td>Expenditures</td><td>$300.00</td><td>$0.00</td></tr>
    <tr><td>4</td><td>Ending Balance</td><td>$800.00</td><td>$250.00</td></tr>
  </table>
</div>
</body></html>"#;

const SCHEDULE_A: &str = "\
Date Paid|Entity Name|Contribution Type|Amount|Amount Type|Election Type
01/15/2024|Smith, Pat|9|500.00|CA|Primary
01/20/2024|Acme Hardware|4|80.00|IK|Primary
02/01/2024|Jones, Lee|9|$400.00|CA|General
";

const COMMITTEE_PAGE: &str = r#"
<div id="summaryAccordionId"><table>
  <tr><td>a</td><td>Balance from previous report</td><td>$40.00</td></tr>
  <tr><td>b</td><td>Receipts</td><td>$2,500.00</td></tr>
  <tr><td>c</td><td>Expenditures</td><td>$900.00</td></tr>
  <tr><td>d</td><td>Ending Balance</td><td>$1,640.00</td></tr>
</table></div>"#;

const SCHEDULE_B: &str = "\
Date Paid|Entity Name|Expenditure Type|Amount|Purpose|Election Type
02/10/2024|Helena Print Shop|Other|300.00|Yard signs|Primary
";

#[derive(Default)]
struct MockPortal {
    page: String,
    schedules: HashMap<String, String>,
    lists: HashMap<String, Vec<DetailRow>>,
    fail: bool,
    calls: Cell<usize>,
    requested: RefCell<Vec<String>>,
}

impl MockPortal {
    fn c5() -> Self {
        Self {
            page: C5_PAGE.to_string(),
            schedules: HashMap::from([
                ("A".to_string(), SCHEDULE_A.to_string()),
                ("B".to_string(), SCHEDULE_B.to_string()),
            ]),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn hit(&self) -> Result<(), CersError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            Err(CersError::Api(cers_lib::cers_api::Error::RequestFailed))
        } else {
            Ok(())
        }
    }
}

impl Portal for MockPortal {
    async fn report_page(&self, _report: &Report) -> Result<String, CersError> {
        self.hit()?;
        Ok(self.page.clone())
    }

    async fn detail_lists(
        &self,
        _report: &Report,
        lists: &[&str],
    ) -> Result<Vec<(String, Vec<DetailRow>)>, CersError> {
        self.hit()?;
        Ok(lists
            .iter()
            .map(|l| (l.to_string(), self.lists.get(*l).cloned().unwrap_or_default()))
            .collect())
    }

    async fn schedule(
        &self,
        _report: &Report,
        schedule_code: &str,
    ) -> Result<Option<String>, CersError> {
        self.hit()?;
        self.requested.borrow_mut().push(schedule_code.to_string());
        Ok(self.schedules.get(schedule_code).cloned())
    }
}

fn report(form_type: FormType, amended: Option<&str>) -> Report {
    Report {
        id: 66995,
        filer: Filer {
            kind: FilerKind::Candidate,
            id: 18001,
            name: "Busse, Ryan".to_string(),
        },
        form_type,
        from_date: "01/01/2024".to_string(),
        to_date: "03/31/2024".to_string(),
        form_type_descr: None,
        status: Some("Filed".to_string()),
        amended_date: amended.map(str::to_string),
    }
}

fn committee_report(form_type: FormType) -> Report {
    Report {
        id: 71020,
        filer: Filer {
            kind: FilerKind::Committee,
            id: 2101,
            name: "Montanans for Public Lands".to_string(),
        },
        ..report(form_type, None)
    }
}

fn detail(name: &str, amount: f64, election: &str) -> DetailRow {
    DetailRow {
        entity_name: Some(name.to_string()),
        total_amt: Some(amount),
        amount_type_descr: Some(election.to_string()),
        ..DetailRow::default()
    }
}

fn loader(portal: MockPortal) -> ReportLoader<MockPortal> {
    ReportLoader::new(
        ReportParser::new(portal, ManualCaches::empty()),
        CacheOptions::default(),
    )
}

fn calls(loader: &ReportLoader<MockPortal>) -> usize {
    loader.parser().portal().calls.get()
}

#[tokio::test]
async fn c5_parses_summary_and_schedules() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let loader = loader(MockPortal::c5());

    let parsed = loader.load(&report(FormType::C5, None), &cache).await;

    let receipts = parsed.summary.receipts.unwrap();
    assert_eq!(receipts.primary, Some(1000.0));
    assert_eq!(receipts.general, Some(250.0));
    assert_eq!(receipts.total, 1250.0);
    assert_eq!(parsed.contributions.len(), 3);
    assert_eq!(parsed.expenditures.len(), 1);
    // 1250 reported less 900 itemized cash; the in-kind row does not count
    assert_eq!(parsed.unitemized_contributions, 350.0);
    assert_eq!(calls(&loader), 3);
    assert!(cache.path_for(66995, &FormType::C5).is_file());
}

#[tokio::test]
async fn unchanged_amendment_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let listed = report(FormType::C5, Some("1712102400000"));

    let first = loader(MockPortal::c5());
    let parsed = first.load(&listed, &cache).await;

    let second = loader(MockPortal::c5());
    let again = second.load(&listed, &cache).await;

    assert_eq!(calls(&second), 0);
    assert_eq!(again, parsed);
}

#[tokio::test]
async fn new_amendment_reparses_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());

    loader(MockPortal::c5())
        .load(&report(FormType::C5, None), &cache)
        .await;

    let amended = report(FormType::C5, Some("1712102400000"));
    let second = loader(MockPortal::c5());
    second.load(&amended, &cache).await;
    assert_eq!(calls(&second), 3);

    let stored = cache.load(66995, &FormType::C5).unwrap().unwrap();
    assert_eq!(stored.report.amended_date.as_deref(), Some("1712102400000"));
}

#[tokio::test]
async fn cache_read_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let listed = report(FormType::C5, None);
    loader(MockPortal::c5()).load(&listed, &cache).await;

    let no_read = ReportLoader::new(
        ReportParser::new(MockPortal::c5(), ManualCaches::empty()),
        CacheOptions {
            read: false,
            write: true,
        },
    );
    no_read.load(&listed, &cache).await;
    assert_eq!(calls(&no_read), 3);
}

#[tokio::test]
async fn failed_parse_is_empty_and_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let loader = loader(MockPortal::failing());

    let parsed = loader.load(&report(FormType::C5, None), &cache).await;

    assert!(parsed.contributions.is_empty());
    assert!(parsed.summary.receipts.is_none());
    assert!(!cache.path_for(66995, &FormType::C5).exists());
}

#[tokio::test]
async fn unknown_form_is_empty_without_portal_calls() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let loader = loader(MockPortal::c5());

    let parsed = loader
        .load(&report(FormType::from_code("C3"), None), &cache)
        .await;

    assert_eq!(calls(&loader), 0);
    assert!(!parsed.itemized);
    assert_eq!(parsed.unitemized_contributions, 0.0);
}

#[tokio::test]
async fn c7_folds_contribution_lists_and_flags_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let portal = MockPortal {
        lists: HashMap::from([
            (
                "individual".to_string(),
                vec![
                    DetailRow {
                        entity_name: Some("Smith, Pat".to_string()),
                        entity_address: Some("123 Main St, Helena, MT 59601".to_string()),
                        cash_amt: Some(200.0),
                        total_amt: Some(200.0),
                        amount_type_descr: Some("Primary".to_string()),
                        ..DetailRow::default()
                    },
                    DetailRow {
                        entity_name: Some("Jones, Lee".to_string()),
                        cash_amt: Some(75.5),
                        total_amt: Some(75.5),
                        amount_type_descr: Some("General".to_string()),
                        ..DetailRow::default()
                    },
                ],
            ),
            (
                "refunds".to_string(),
                vec![DetailRow {
                    total_amt: Some(20.0),
                    ..DetailRow::default()
                }],
            ),
        ]),
        ..MockPortal::default()
    };
    let loader = loader(portal);

    let parsed = loader.load(&report(FormType::C7, None), &cache).await;

    assert_eq!(calls(&loader), 1);
    assert_eq!(parsed.contributions.len(), 2);
    assert_eq!(parsed.contributions[0].city, "Helena");
    assert_eq!(parsed.contributions[0].amount_type, "CA");
    let receipts = parsed.summary.receipts.unwrap();
    assert_eq!(receipts.primary, Some(200.0));
    assert_eq!(receipts.general, Some(75.5));
    assert_eq!(receipts.total, 275.5);
    assert_eq!(parsed.summary.expenditures.unwrap().total, 0.0);
    assert_eq!(parsed.unhandled.len(), 1);
    assert_eq!(parsed.unhandled[0].list, "refunds");
    assert_eq!(parsed.unhandled[0].rows, 1);
}

#[tokio::test]
async fn c7e_folds_other_expenditures() {
    let portal = MockPortal {
        lists: HashMap::from([(
            "expendOther".to_string(),
            vec![DetailRow {
                entity_name: Some("Helena Print Shop".to_string()),
                total_amt: Some(120.0),
                amount_type_descr: Some("General".to_string()),
                ..DetailRow::default()
            }],
        )]),
        ..MockPortal::default()
    };
    let parser = ReportParser::new(portal, ManualCaches::empty());

    let parsed = parser.parse(&report(FormType::C7E, None)).await.unwrap();

    assert!(parsed.contributions.is_empty());
    assert_eq!(parsed.expenditures.len(), 1);
    assert_eq!(parsed.summary.expenditures.unwrap().general, Some(120.0));
    assert_eq!(parsed.summary.receipts.unwrap().total, 0.0);
    assert!(parsed.unhandled.is_empty());
}

#[tokio::test]
async fn c7e_flags_petty_cash_and_debt_rows() {
    let portal = MockPortal {
        lists: HashMap::from([
            (
                "expendOther".to_string(),
                vec![
                    detail("Helena Print Shop", 120.0, "General"),
                    detail("Big Sky Radio", 80.0, "Primary"),
                ],
            ),
            (
                "pettyCash".to_string(),
                vec![
                    detail("Stamps", 15.0, "Primary"),
                    detail("Coffee", 10.0, "Primary"),
                ],
            ),
            (
                "debtLoan".to_string(),
                vec![detail("First Interstate Bank", 500.0, "General")],
            ),
        ]),
        ..MockPortal::default()
    };
    let parser = ReportParser::new(portal, ManualCaches::empty());

    let parsed = parser.parse(&report(FormType::C7E, None)).await.unwrap();

    let flagged: Vec<(&str, usize)> = parsed
        .unhandled
        .iter()
        .map(|u| (u.list.as_str(), u.rows))
        .collect();
    assert_eq!(flagged, vec![("pettyCash", 2), ("debtLoan", 1)]);

    let names: Vec<&str> = parsed
        .expenditures
        .iter()
        .map(|e| e.entity_name.as_str())
        .collect();
    assert_eq!(names, vec!["Helena Print Shop", "Big Sky Radio"]);

    let spent = parsed.summary.expenditures.unwrap();
    assert_eq!(spent.primary, Some(80.0));
    assert_eq!(spent.general, Some(120.0));
    assert_eq!(spent.total, 200.0);
}

#[tokio::test]
async fn c6_reads_committee_summary_and_schedules() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let portal = MockPortal {
        page: COMMITTEE_PAGE.to_string(),
        schedules: HashMap::from([
            (
                "C6A".to_string(),
                "Date Paid|Entity Name|Contribution Type|Amount|Amount Type|Election Type\n\
                 03/01/2024|Smith, Pat|9|1,000.00|CA|\n\
                 03/02/2024|Jones, Lee|9|234.56|CA|\n\
                 03/05/2024|Acme Hardware|4|300.00|IK|\n"
                    .to_string(),
            ),
            ("C6B".to_string(), SCHEDULE_B.to_string()),
        ]),
        ..MockPortal::default()
    };
    let loader = loader(portal);

    let parsed = loader.load(&committee_report(FormType::C6), &cache).await;

    assert_eq!(parsed.summary.receipts, Some(Tally::total_only(2500.0)));
    assert_eq!(parsed.summary.expenditures, Some(Tally::total_only(900.0)));
    assert_eq!(
        *loader.parser().portal().requested.borrow(),
        vec!["C6A".to_string(), "C6B".to_string()]
    );
    assert_eq!(parsed.contributions.len(), 3);
    assert_eq!(parsed.expenditures.len(), 1);
    // 2500 reported less 1234.56 itemized cash
    assert_eq!(parsed.unitemized_contributions, 1265.44);
}

#[tokio::test]
async fn c4_reads_committee_summary_without_expenditure_file() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ReportCache::new(dir.path());
    let portal = MockPortal {
        page: COMMITTEE_PAGE.replace("$2,500.00", "$800.00"),
        schedules: HashMap::from([(
            "C4A".to_string(),
            "Date Paid|Entity Name|Contribution Type|Amount|Amount Type|Election Type\n\
             11/20/2023|Smith, Pat|9|150.25|CA|\n"
                .to_string(),
        )]),
        ..MockPortal::default()
    };
    let loader = loader(portal);

    let parsed = loader.load(&committee_report(FormType::C4), &cache).await;

    let receipts = parsed.summary.receipts.unwrap();
    assert_eq!(receipts, Tally::total_only(800.0));
    assert!(receipts.primary.is_none());
    assert_eq!(
        *loader.parser().portal().requested.borrow(),
        vec!["C4A".to_string(), "C4B".to_string()]
    );
    assert!(parsed.expenditures.is_empty());
    assert_eq!(parsed.unitemized_contributions, 649.75);
    assert!(cache.path_for(71020, &FormType::C4).is_file());
}

#[tokio::test]
async fn manual_cache_is_read_before_the_portal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("summary.html"), C5_PAGE).unwrap();
    std::fs::write(dir.path().join("contributions.csv"), SCHEDULE_A).unwrap();
    let manual = ManualCaches::from_toml_str(
        "[[report]]\nid = 66995\nsummary = \"summary.html\"\ncontributions = \"contributions.csv\"\n",
        dir.path(),
    )
    .unwrap();

    let parser = ReportParser::new(MockPortal::c5(), manual);
    let parsed = parser.parse(&report(FormType::C5, None)).await.unwrap();

    // only schedule B is left to download
    assert_eq!(parser.portal().calls.get(), 1);
    assert_eq!(parsed.contributions.len(), 3);
    assert_eq!(parsed.expenditures.len(), 1);
}

#[tokio::test]
async fn summary_only_skips_downloads() {
    let parser =
        ReportParser::new(MockPortal::c5(), ManualCaches::empty()).with_fetch_itemized(false);

    let parsed = parser.parse(&report(FormType::C5, None)).await.unwrap();

    assert_eq!(parser.portal().calls.get(), 1);
    assert!(!parsed.itemized);
    assert_eq!(parsed.summary.receipts.unwrap().total, 1250.0);
    assert_eq!(parsed.unitemized_contributions, 0.0);
}
