//! Date and time normalization for institutional export formats.
//!
//! Exports change their date layout between years and vendors. Each value is
//! run through an ordered cascade of candidate patterns and the first match
//! wins; ambiguous inputs such as `01/02/03 10:00` are always resolved by
//! list order, never by plausibility.

pub mod formats;

use formats::{Candidate, Parsed, DATE_CANDIDATES, TIME_CANDIDATES};
use thiserror::Error;

/// Placeholder some exports use for a visit that has not begun yet.
pub const NOT_STARTED: &str = "no iniciado";

pub const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";
pub const TIME_OUTPUT_FORMAT: &str = "%H:%M";

/// No candidate pattern matched a date or time value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date/time value {raw:?} (tried: {})", .attempted.join(" | "))]
pub struct FormatError {
    pub raw: String,
    pub attempted: Vec<&'static str>,
}

impl FormatError {
    fn new(raw: &str, candidates: &[Candidate]) -> Self {
        Self {
            raw: raw.to_string(),
            attempted: candidates.iter().map(|c| c.label).collect(),
        }
    }
}

/// Normalize a visit date to `YYYY-MM-DD`. Blank input yields `""`.
pub fn parse_date(raw: &str) -> Result<String, FormatError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let date = first_match(value, DATE_CANDIDATES, |parsed| parsed.date)
        .ok_or_else(|| FormatError::new(raw, DATE_CANDIDATES))?;
    Ok(date.format(DATE_OUTPUT_FORMAT).to_string())
}

/// Normalize a visit time to 24-hour `HH:MM`. Blank input and the
/// "no iniciado" placeholder (any case) yield `""`.
pub fn parse_time(raw: &str) -> Result<String, FormatError> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NOT_STARTED) {
        return Ok(String::new());
    }

    let time = first_match(value, TIME_CANDIDATES, |parsed| Some(parsed.time))
        .ok_or_else(|| FormatError::new(raw, TIME_CANDIDATES))?;
    Ok(time.format(TIME_OUTPUT_FORMAT).to_string())
}

fn first_match<T>(
    value: &str,
    candidates: &[Candidate],
    pick: impl Fn(Parsed) -> Option<T>,
) -> Option<T> {
    candidates
        .iter()
        .find_map(|candidate| candidate.parse(value).and_then(&pick))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_blank() {
        assert_eq!(parse_date("").unwrap(), "");
        assert_eq!(parse_date("   ").unwrap(), "");
    }

    #[test]
    fn test_parse_date_each_format() {
        assert_eq!(parse_date("03/15/19 09:30 AM").unwrap(), "2019-03-15");
        assert_eq!(parse_date("03/15/19 17:30").unwrap(), "2019-03-15");
        assert_eq!(parse_date("03/15/2019 17:30").unwrap(), "2019-03-15");
        assert_eq!(parse_date("03/15/2019").unwrap(), "2019-03-15");
        assert_eq!(parse_date("25/12/2019 08:00").unwrap(), "2019-12-25");
    }

    #[test]
    fn test_parse_date_cascade_tie_break() {
        // Valid under several patterns; month/day/two-digit-year is first.
        assert_eq!(parse_date("01/02/03 10:00 AM").unwrap(), "2003-01-02");
        // Month-first beats day-first when both are valid.
        assert_eq!(parse_date("05/06/2020 10:00").unwrap(), "2020-05-06");
    }

    #[test]
    fn test_parse_date_single_digit_fields() {
        assert_eq!(parse_date("1/2/2020").unwrap(), "2020-01-02");
        assert_eq!(parse_date("1/2/20 8:05").unwrap(), "2020-01-02");
    }

    #[test]
    fn test_parse_date_unrecognized() {
        let err = parse_date("2020-01-02").unwrap_err();
        assert_eq!(err.raw, "2020-01-02");
        assert_eq!(err.attempted.len(), DATE_CANDIDATES.len());
        assert_eq!(err.attempted[0], "%m/%d/%y %H:%M %p");
        assert!(err.to_string().contains("2020-01-02"));
    }

    #[test]
    fn test_parse_date_rejects_two_digit_year_without_time() {
        assert!(parse_date("01/02/03").is_err());
    }

    #[test]
    fn test_parse_date_two_digit_year_rules() {
        let err = parse_date("1/2/3 10:00").unwrap_err();
        assert_eq!(err.raw, "1/2/3 10:00");
        assert_eq!(parse_date("01/02/69 10:00").unwrap(), "1969-01-02");
        assert_eq!(parse_date("01/02/68 10:00").unwrap(), "2068-01-02");
    }

    #[test]
    fn test_parse_time_placeholder() {
        assert_eq!(parse_time("No Iniciado").unwrap(), "");
        assert_eq!(parse_time("no iniciado").unwrap(), "");
        assert_eq!(parse_time("NO INICIADO").unwrap(), "");
        assert_eq!(parse_time(" ").unwrap(), "");
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("01/02/03 10:00 AM").unwrap(), "10:00");
        assert_eq!(parse_time("01/02/03 7:05").unwrap(), "07:05");
        assert_eq!(parse_time("01/02/2003 18:45").unwrap(), "18:45");
        assert_eq!(parse_time("08:30:00 AM").unwrap(), "08:30");
        assert_eq!(parse_time("31/01/2003 18:45").unwrap(), "18:45");
    }

    #[test]
    fn test_parse_time_rejects_date_only() {
        let err = parse_time("01/02/2003").unwrap_err();
        assert_eq!(err.attempted, vec![
            "%m/%d/%y %H:%M %p",
            "%m/%d/%y %H:%M",
            "%m/%d/%Y %H:%M",
            "%H:%M:%S %p",
            "%d/%m/%Y %H:%M",
        ]);
    }
}
