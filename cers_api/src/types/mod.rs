mod lenient;
pub use self::lenient::{string_or_number, to_display_string};

mod meta;
pub use self::meta::{DataTableResponse, DownloadTicket};

mod candidate;
pub use self::candidate::{CandidateID, CandidateResult, PersonDto};

mod committee;
pub use self::committee::{CommitteeID, CommitteeResult};

mod report;
pub use self::report::{CandidateDto, CommitteeDto, ReportID, ReportResult};

mod detail;
pub use self::detail::DetailRow;
