mod common;
pub use self::common::{
    DataTableQuery, FormPayload, Query, CANDIDATE_COLUMNS, COMMITTEE_COLUMNS, REPORT_COLUMNS,
};

mod candidate;
pub use self::candidate::CandidateSearch;

mod committee;
pub use self::committee::CommitteeSearch;

mod report;
pub use self::report::FilerId;
pub(crate) use self::report::{ReportRequest, ScheduleRequest};
