//! Itemized contribution and expenditure records.
//!
//! Column names follow the headers of the portal's schedule downloads, so
//! that records read from a download, converted from a detail list, or read
//! back from an export all share one shape.

use cers_api::types::{to_display_string, DetailRow};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::normalize::{format_date_paid, parse_address, parse_currency};

/// Filer columns stamped onto every record when it is rolled up to an entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilerContext {
    pub filer: String,
    pub filer_type: String,
    pub reporting_period: String,
    pub report_type: String,
}

/// One itemized contribution.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Contribution {
    #[serde(rename = "Filer")]
    pub filer: String,
    #[serde(rename = "Filer Type")]
    pub filer_type: String,
    #[serde(rename = "Reporting Period")]
    pub reporting_period: String,
    #[serde(rename = "Report Type")]
    pub report_type: String,

    #[serde(rename = "Date Paid")]
    pub date_paid: String,
    #[serde(rename = "Entity Name")]
    pub entity_name: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Middle Initial")]
    pub middle_initial: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Addr Line1")]
    pub addr_line1: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Zip")]
    pub zip: String,
    #[serde(rename = "Zip4")]
    pub zip4: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Occupation")]
    pub occupation: String,
    #[serde(rename = "Employer")]
    pub employer: String,

    /// Numeric category code in schedule downloads, a label in detail lists.
    #[serde(rename = "Contribution Type")]
    pub contribution_type: String,
    #[serde(rename = "Contribution Type Label")]
    pub contribution_type_label: String,

    #[serde(rename = "Amount", deserialize_with = "amount")]
    pub amount: f64,
    /// `CA` (cash), `IK` (in-kind) or `Mixed`.
    #[serde(rename = "Amount Type")]
    pub amount_type: String,
    #[serde(rename = "Purpose")]
    pub purpose: String,
    /// `Primary` or `General`.
    #[serde(rename = "Election Type")]
    pub election_type: String,
    #[serde(rename = "Total Primary", deserialize_with = "optional_amount")]
    pub total_primary: Option<f64>,
    #[serde(rename = "Total General", deserialize_with = "optional_amount")]
    pub total_general: Option<f64>,

    #[serde(rename = "Refund Transaction Type")]
    pub refund_transaction_type: String,
    #[serde(rename = "Refund Original Transaction Date")]
    pub refund_original_date: String,
    #[serde(rename = "Refund Original Transaction Total")]
    pub refund_original_total: String,
    #[serde(rename = "Refund Original Transaction Descr")]
    pub refund_original_descr: String,
    #[serde(rename = "Previous Transaction (Y/N)")]
    pub previous_transaction: String,

    #[serde(rename = "Fundraiser Name")]
    pub fundraiser_name: String,
    #[serde(rename = "Fundraiser Location")]
    pub fundraiser_location: String,
    #[serde(rename = "Fundraiser Attendees")]
    pub fundraiser_attendees: String,
    #[serde(rename = "Fundraiser Tickets Sold")]
    pub fundraiser_tickets_sold: String,
}

/// One itemized expenditure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Expenditure {
    #[serde(rename = "Filer")]
    pub filer: String,
    #[serde(rename = "Filer Type")]
    pub filer_type: String,
    #[serde(rename = "Reporting Period")]
    pub reporting_period: String,
    #[serde(rename = "Report Type")]
    pub report_type: String,

    #[serde(rename = "Date Paid")]
    pub date_paid: String,
    #[serde(rename = "Entity Name")]
    pub entity_name: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Middle Initial")]
    pub middle_initial: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Addr Line1")]
    pub addr_line1: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Zip")]
    pub zip: String,
    #[serde(rename = "Zip4")]
    pub zip4: String,

    #[serde(rename = "Expenditure Type")]
    pub expenditure_type: String,
    #[serde(rename = "Amount", deserialize_with = "amount")]
    pub amount: f64,
    #[serde(rename = "Purpose")]
    pub purpose: String,
    #[serde(rename = "Election Type")]
    pub election_type: String,

    #[serde(rename = "Expenditure Paid Communications Platform")]
    pub comm_platform: String,
    #[serde(rename = "Expenditure Paid Communications Quantity")]
    pub comm_quantity: String,
    #[serde(rename = "Expenditure Paid Communications Subject Matter")]
    pub comm_subject_matter: String,
}

impl Contribution {
    /// Converts a C7 detail-list row.
    pub fn from_detail(row: &DetailRow) -> Self {
        let address = parse_address(row.entity_address.as_deref().unwrap_or_default());
        Self {
            date_paid: format_date_paid(row.date_paid),
            entity_name: text(&row.entity_name),
            addr_line1: address.line1,
            city: address.city,
            state: address.state,
            zip: address.zip,
            occupation: text(&row.occupation_descr),
            employer: text(&row.employer_descr),
            contribution_type: text(&row.line_item_composite_descr),
            amount: row.total_amt.unwrap_or_default(),
            amount_type: amount_type(row.cash_amt, row.in_kind_amt).to_string(),
            purpose: text(&row.purpose_descr),
            election_type: text(&row.amount_type_descr),
            total_primary: row.total_to_date_primary,
            total_general: row.total_to_date_general,
            refund_original_date: value_text(&row.refund_orig_trans_date),
            refund_original_total: value_text(&row.refund_orig_trans_total_val),
            refund_original_descr: text(&row.refund_orig_trans_desc),
            previous_transaction: value_text(&row.previous_transaction_ind),
            fundraiser_name: text(&row.fundraiser_name),
            fundraiser_location: text(&row.fundraiser_location),
            fundraiser_attendees: value_text(&row.fundraiser_attendees),
            fundraiser_tickets_sold: value_text(&row.fundraiser_tickets_sold),
            ..Self::default()
        }
    }

    pub fn is_cash(&self) -> bool {
        self.amount_type == "CA"
    }

    pub fn set_context(&mut self, ctx: &FilerContext) {
        self.filer = ctx.filer.clone();
        self.filer_type = ctx.filer_type.clone();
        self.reporting_period = ctx.reporting_period.clone();
        self.report_type = ctx.report_type.clone();
    }

    /// Trims the filer and contributor name fields.
    pub fn trim_names(&mut self) {
        trim_in_place(&mut self.filer);
        trim_in_place(&mut self.entity_name);
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.last_name);
    }
}

impl Expenditure {
    /// Converts a C7E detail-list row.
    pub fn from_detail(row: &DetailRow) -> Self {
        let address = parse_address(row.entity_address.as_deref().unwrap_or_default());
        Self {
            date_paid: format_date_paid(row.date_paid),
            entity_name: text(&row.entity_name),
            addr_line1: address.line1,
            city: address.city,
            state: address.state,
            zip: address.zip,
            expenditure_type: text(&row.line_item_composite_descr),
            amount: row.total_amt.unwrap_or_default(),
            purpose: text(&row.purpose_descr),
            election_type: text(&row.amount_type_descr),
            comm_platform: text(&row.expenditure_paid_comm_platform),
            comm_quantity: value_text(&row.expenditure_paid_comm_quantity),
            comm_subject_matter: text(&row.expenditure_paid_comm_sub_matter),
            ..Self::default()
        }
    }

    pub fn set_context(&mut self, ctx: &FilerContext) {
        self.filer = ctx.filer.clone();
        self.filer_type = ctx.filer_type.clone();
        self.reporting_period = ctx.reporting_period.clone();
        self.report_type = ctx.report_type.clone();
    }

    /// Trims the filer and payee name fields.
    pub fn trim_names(&mut self) {
        trim_in_place(&mut self.filer);
        trim_in_place(&mut self.entity_name);
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.last_name);
    }
}

/// Classifies a detail-list row by how it was paid.
pub fn amount_type(cash: Option<f64>, in_kind: Option<f64>) -> &'static str {
    let cash = cash.unwrap_or_default() > 0.0;
    let in_kind = in_kind.unwrap_or_default() > 0.0;
    match (cash, in_kind) {
        (true, true) => "Mixed",
        (true, false) => "CA",
        (false, true) => "IK",
        (false, false) => "",
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn value_text(value: &Option<Value>) -> String {
    value.as_ref().and_then(to_display_string).unwrap_or_default()
}

fn trim_in_place(s: &mut String) {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
}

/// An amount cell: a JSON number, or text from a download (`1,200.50`,
/// `$15`, or empty).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    fn value(self) -> Option<f64> {
        match self {
            RawAmount::Number(n) => Some(n),
            RawAmount::Text(s) if s.trim().is_empty() => None,
            RawAmount::Text(s) => match parse_currency(&s) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("{}, treating as zero", e);
                    Some(0.0)
                }
            },
        }
    }
}

fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_amount(deserializer)?.unwrap_or_default())
}

fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(raw.and_then(RawAmount::value))
}
