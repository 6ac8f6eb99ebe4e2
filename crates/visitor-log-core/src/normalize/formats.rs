use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// What a candidate pattern yields once it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    DateTime,
    Date,
    Time,
}

/// Result of a successful candidate match. `date` is `None` for time-only
/// patterns; date-only patterns report midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub date: Option<NaiveDate>,
    pub time: NaiveTime,
}

/// One entry of a format cascade.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// Human readable form, reported back in `FormatError`.
    pub label: &'static str,
    pattern: &'static str,
    shape: Shape,
    /// Input must end in an AM/PM marker. The marker is consumed but the
    /// hour is still read on the 24-hour clock, so "02:00 PM" stays 02:00
    /// and fingerprints of already published records do not shift.
    meridiem: bool,
}

impl Candidate {
    const fn new(label: &'static str, pattern: &'static str, shape: Shape, meridiem: bool) -> Self {
        Self {
            label,
            pattern,
            shape,
            meridiem,
        }
    }

    pub fn parse(&self, raw: &str) -> Option<Parsed> {
        let body = if self.meridiem {
            strip_meridiem(raw)?
        } else {
            raw
        };

        let parsed = match self.shape {
            Shape::DateTime => {
                let dt = NaiveDateTime::parse_from_str(body, self.pattern).ok()?;
                Parsed {
                    date: Some(dt.date()),
                    time: dt.time(),
                }
            }
            Shape::Date => Parsed {
                date: Some(NaiveDate::parse_from_str(body, self.pattern).ok()?),
                time: NaiveTime::from_hms_opt(0, 0, 0)?,
            },
            Shape::Time => Parsed {
                date: None,
                time: NaiveTime::parse_from_str(body, self.pattern).ok()?,
            },
        };

        // chrono's %Y takes any digit count; a four-digit year column must
        // not swallow "03".
        if self.pattern.contains("%Y") {
            let year = parsed.date?.year();
            if !(1000..=9999).contains(&year) {
                return None;
            }
        }

        // chrono's %y takes one digit too and pivots at 70. Two-digit
        // exports need exactly two digits, with 69..=99 in the 1900s.
        if self.pattern.contains("%y") {
            let year = two_digit_year(body)?;
            let date = parsed.date?.with_year(year)?;
            return Some(Parsed {
                date: Some(date),
                ..parsed
            });
        }

        Some(parsed)
    }
}

/// Century-expanded year of the `MM/DD/YY` token at the start of `body`.
fn two_digit_year(body: &str) -> Option<i32> {
    let token = body.split_whitespace().next()?.rsplit('/').next()?;
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = token.parse().ok()?;
    Some(if yy >= 69 { 1900 + yy } else { 2000 + yy })
}

/// Splits a trailing, whitespace-separated AM/PM marker off `raw`.
fn strip_meridiem(raw: &str) -> Option<&str> {
    let split = raw.len().checked_sub(2)?;
    if !raw.is_char_boundary(split) {
        return None;
    }
    let (body, marker) = raw.split_at(split);
    if !(marker.eq_ignore_ascii_case("am") || marker.eq_ignore_ascii_case("pm")) {
        return None;
    }
    let stripped = body.trim_end();
    if stripped.len() == body.len() {
        return None;
    }
    Some(stripped)
}

const MDY2_HM_MERIDIEM: Candidate =
    Candidate::new("%m/%d/%y %H:%M %p", "%m/%d/%y %H:%M", Shape::DateTime, true);
const MDY2_HM: Candidate = Candidate::new("%m/%d/%y %H:%M", "%m/%d/%y %H:%M", Shape::DateTime, false);
const MDY4_HM: Candidate = Candidate::new("%m/%d/%Y %H:%M", "%m/%d/%Y %H:%M", Shape::DateTime, false);
const MDY4: Candidate = Candidate::new("%m/%d/%Y", "%m/%d/%Y", Shape::Date, false);
const DMY4_HM: Candidate = Candidate::new("%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M", Shape::DateTime, false);
const HMS_MERIDIEM: Candidate = Candidate::new("%H:%M:%S %p", "%H:%M:%S", Shape::Time, true);

/// Cascade for visit dates. Order is significant: the first match wins.
pub const DATE_CANDIDATES: &[Candidate] = &[MDY2_HM_MERIDIEM, MDY2_HM, MDY4_HM, MDY4, DMY4_HM];

/// Cascade for visit times. Date-only exports carry no time and are not
/// accepted here.
pub const TIME_CANDIDATES: &[Candidate] =
    &[MDY2_HM_MERIDIEM, MDY2_HM, MDY4_HM, HMS_MERIDIEM, DMY4_HM];
