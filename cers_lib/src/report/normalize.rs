//! Normalizers for the free-text fields the portal returns: addresses,
//! currency cells and epoch-millisecond dates.

use chrono::DateTime;

use crate::error::CersError;

/// An address split into the columns used by schedule downloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Splits a `line1, city, ST ZIP` address into its parts.
///
/// Malformed input never fails: the best-effort split is returned and the
/// problem is logged.
pub fn parse_address(raw: &str) -> Address {
    if raw.trim().is_empty() {
        return Address::default();
    }

    let rewritten = raw.replace("Washington, DC", "Washington DC, DC");
    let groups: Vec<&str> = rewritten.split(", ").collect();

    let (line1, city) = if groups.len() >= 2 {
        (
            groups[..groups.len() - 2].join(", "),
            groups[groups.len() - 2].trim().to_string(),
        )
    } else {
        tracing::warn!("Address parse warning, no city in '{}'", raw);
        (String::new(), String::new())
    };

    let last = groups.last().copied().unwrap_or_default();
    let state_zip: Vec<&str> = last.split(' ').collect();
    let state = state_zip.first().copied().unwrap_or_default().to_string();
    let zip = state_zip.get(1).copied().unwrap_or_default().to_string();

    if state_zip.len() != 2 {
        tracing::warn!("Address parse warning, state/zip is not two parts: {:?}", state_zip);
    }
    if state.len() != 2 {
        tracing::warn!("Address parse warning, state is not two letters: '{}'", state);
    }

    Address {
        line1,
        city,
        state,
        zip,
    }
}

/// Parses a summary-table currency cell such as `$1,234.50` or `($1,234.50)`.
/// Parentheses mark negative amounts.
pub fn parse_currency(raw: &str) -> Result<f64, CersError> {
    let negative = raw.contains('(') || raw.contains(')');
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')') && !c.is_whitespace())
        .collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| CersError::Parse(format!("invalid currency value '{}'", raw.trim())))?;
    Ok(if negative { -value.abs() } else { value })
}

/// Renders a detail-list `datePaid` (epoch milliseconds) as `MM/DD/YY` in UTC.
pub fn format_date_paid(millis: Option<i64>) -> String {
    millis
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%m/%d/%y").to_string())
        .unwrap_or_default()
}

/// Rounds to whole cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(a: &Address) -> String {
        format!("{}, {}, {} {}", a.line1, a.city, a.state, a.zip)
    }

    #[test]
    fn address_standard() {
        let a = parse_address("123 Main St, Helena, MT 59601");
        assert_eq!(a.line1, "123 Main St");
        assert_eq!(a.city, "Helena");
        assert_eq!(a.state, "MT");
        assert_eq!(a.zip, "59601");
    }

    #[test]
    fn address_rejoins_to_input() {
        for raw in [
            "123 Main St, Helena, MT 59601",
            "9 Oak Ave, Apt 2, Missoula, MT 59801",
            "PO Box 441146, Somerville, MA 02144",
        ] {
            assert_eq!(rejoin(&parse_address(raw)), raw);
        }
    }

    #[test]
    fn address_multi_part_line1() {
        let a = parse_address("9 Oak Ave, Apt 2, Missoula, MT 59801");
        assert_eq!(a.line1, "9 Oak Ave, Apt 2");
        assert_eq!(a.city, "Missoula");
    }

    #[test]
    fn address_washington_dc() {
        let a = parse_address("1 Capitol Way, Washington, DC 20001");
        assert_eq!(a.line1, "1 Capitol Way");
        assert_eq!(a.city, "Washington DC");
        assert_eq!(a.state, "DC");
        assert_eq!(a.zip, "20001");
    }

    #[test]
    fn address_empty() {
        assert_eq!(parse_address(""), Address::default());
        assert_eq!(parse_address("   "), Address::default());
    }

    #[test]
    fn address_single_group_has_no_city() {
        let a = parse_address("MT 59601");
        assert_eq!(a.line1, "");
        assert_eq!(a.city, "");
        assert_eq!(a.state, "MT");
        assert_eq!(a.zip, "59601");
    }

    #[test]
    fn address_missing_zip_is_best_effort() {
        let a = parse_address("123 Main St, Helena, Montana");
        assert_eq!(a.city, "Helena");
        assert_eq!(a.state, "Montana");
        assert_eq!(a.zip, "");
    }

    #[test]
    fn currency_plain_and_negative() {
        assert_eq!(parse_currency("$1,234.50").unwrap(), 1234.50);
        assert_eq!(parse_currency("($1,234.50)").unwrap(), -1234.50);
        assert_eq!(parse_currency(" $0.00 ").unwrap(), 0.0);
        assert_eq!(parse_currency("12").unwrap(), 12.0);
    }

    #[test]
    fn currency_invalid() {
        assert!(parse_currency("").is_err());
        assert!(parse_currency("n/a").is_err());
    }

    #[test]
    fn date_paid_formats_utc() {
        // 2024-04-01T00:00:00Z
        assert_eq!(format_date_paid(Some(1711929600000)), "04/01/24");
        assert_eq!(format_date_paid(None), "");
    }

    #[test]
    fn rounding() {
        assert_eq!(round_cents(250.004), 250.0);
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
    }
}
