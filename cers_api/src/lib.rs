mod client;
mod errors;
mod query;
pub mod types;
pub mod user_agent;
pub use self::client::{Client, ReportSession};
pub use self::errors::Error;
pub use self::query::{
    CandidateSearch, CommitteeSearch, DataTableQuery, FilerId, FormPayload, Query,
    CANDIDATE_COLUMNS, COMMITTEE_COLUMNS, REPORT_COLUMNS,
};
