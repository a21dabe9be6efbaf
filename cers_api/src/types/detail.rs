//! Rows returned by `financeRepDetailList` for C7 and C7E filings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One itemized line of a C7 (late contribution) or C7E (late expenditure)
/// detail list.
///
/// The same shape is used for every list; fields that do not apply to a list
/// come back null.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailRow {
    pub entity_name: Option<String>,

    /// Free-text address, `line1, city, ST ZIP`.
    pub entity_address: Option<String>,

    /// Epoch milliseconds.
    pub date_paid: Option<i64>,

    pub cash_amt: Option<f64>,
    pub in_kind_amt: Option<f64>,
    pub total_amt: Option<f64>,

    pub occupation_descr: Option<String>,
    pub employer_descr: Option<String>,

    /// Category label, e.g. `Individual` or `Other Expenditure`.
    pub line_item_composite_descr: Option<String>,
    pub purpose_descr: Option<String>,

    /// `Primary` or `General`.
    pub amount_type_descr: Option<String>,

    pub total_to_date_primary: Option<f64>,
    pub total_to_date_general: Option<f64>,

    pub refund_orig_trans_date: Option<Value>,
    pub refund_orig_trans_total_val: Option<Value>,
    pub refund_orig_trans_desc: Option<String>,
    pub previous_transaction_ind: Option<Value>,

    pub fundraiser_name: Option<String>,
    pub fundraiser_location: Option<String>,
    pub fundraiser_attendees: Option<Value>,
    pub fundraiser_tickets_sold: Option<Value>,

    pub expenditure_paid_comm_platform: Option<String>,
    pub expenditure_paid_comm_quantity: Option<Value>,
    pub expenditure_paid_comm_sub_matter: Option<String>,
}
