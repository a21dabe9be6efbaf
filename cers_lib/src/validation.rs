use chrono::NaiveDate;

use crate::error::CersError;

pub const MAX_SEARCH_LENGTH: usize = 100;
pub const MIN_ELECTION_YEAR: u32 = 1990;
pub const MAX_ELECTION_YEAR: u32 = 2100;

/// Candidate statuses the portal reports.
pub const VALID_STATUSES: &[&str] = &["Active", "Reopened", "Amended", "Withdrawn", "Closed"];

/// Candidate type codes accepted by the candidate search.
pub const CANDIDATE_TYPE_CODES: &[(&str, &str)] = &[
    ("SW", "Statewide"),
    ("SD", "State District"),
    ("CO", "County"),
    ("MU", "Municipal"),
    ("SC", "School District"),
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, CersError> {
    if input.len() > max_len {
        return Err(CersError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(CersError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a search/name string: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, CersError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate an election year: four digits within 1990..=2100.
pub fn validate_year(input: &str) -> Result<String, CersError> {
    let trimmed = input.trim();
    let year: u32 = trimmed
        .parse()
        .ok()
        .filter(|_| trimmed.len() == 4)
        .ok_or_else(|| {
            CersError::InvalidInput(format!(
                "invalid election year '{}'. Expected four digits (e.g., 2024)",
                input
            ))
        })?;
    if !(MIN_ELECTION_YEAR..=MAX_ELECTION_YEAR).contains(&year) {
        return Err(CersError::InvalidInput(format!(
            "election year must be between {} and {}, got {}",
            MIN_ELECTION_YEAR, MAX_ELECTION_YEAR, year
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a numeric code or id (office code, committee id, ...).
pub fn validate_numeric_id(input: &str, what: &str) -> Result<String, CersError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.len() > 12 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(CersError::InvalidInput(format!(
            "invalid {} '{}'. Expected digits only",
            what, input
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a candidate type code, case-insensitive. Returns the uppercase code.
pub fn validate_candidate_type(input: &str) -> Result<String, CersError> {
    let upper = input.trim().to_uppercase();
    if CANDIDATE_TYPE_CODES.iter().any(|(code, _)| *code == upper) {
        Ok(upper)
    } else {
        let valid: Vec<String> = CANDIDATE_TYPE_CODES
            .iter()
            .map(|(code, name)| format!("{} ({})", code, name))
            .collect();
        Err(CersError::InvalidInput(format!(
            "unknown candidate type '{}'. Valid values: {}",
            input,
            valid.join(", ")
        )))
    }
}

/// Validate a status name, case-insensitive. Returns the portal's spelling.
pub fn validate_status(input: &str) -> Result<String, CersError> {
    let trimmed = input.trim();
    VALID_STATUSES
        .iter()
        .find(|s| s.eq_ignore_ascii_case(trimmed))
        .map(|s| s.to_string())
        .ok_or_else(|| {
            CersError::InvalidInput(format!(
                "unknown status '{}'. Valid values: {}",
                input,
                VALID_STATUSES.join(", ")
            ))
        })
}

/// Validate a YYYY-MM-DD date string.
pub fn validate_date(input: &str) -> Result<NaiveDate, CersError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        CersError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2021-01-01)",
            trimmed
        ))
    })
}
