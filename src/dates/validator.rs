//! Baseline period extraction from free-form text.
//!
//! A baseline request names its period in prose ("from 2024-01-01 to
//! January 16, 2024"). We pull every date-looking token out of the text,
//! keep the real calendar dates that lie strictly before today, and accept
//! the request only when exactly two distinct dates remain and they are the
//! required number of days apart.
//!
//! Recognised formats:
//! - `YYYY-MM-DD`
//! - `MM/DD/YYYY`
//! - `D Month YYYY`
//! - `Month D, YYYY` (comma optional)
//! - `D-Month-YYYY`
//!
//! Month names are English, full or three-letter, any case.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, info, warn};

use crate::domain::DateRange;
use crate::error::{BaselineError, Result};

/// Gap used by the standard baseline policy.
pub const DEFAULT_REQUIRED_DAYS: i64 = 15;

const MONTH: &str = concat!(
    "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|",
    "aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?",
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Iso,
    UsSlash,
    DayMonthYear,
    MonthDayYear,
    DayDashMonthYear,
}

static PATTERNS: Lazy<Vec<(Layout, Regex)>> = Lazy::new(|| {
    let build = |layout: Layout, pattern: String| {
        // Static patterns; `recognises_every_layout` covers each one compiling.
        Regex::new(&pattern).map(|re| (layout, re)).ok()
    };
    [
        build(Layout::Iso, r"\b(\d{4})-(\d{2})-(\d{2})\b".to_string()),
        build(Layout::UsSlash, r"\b(\d{2})/(\d{2})/(\d{4})\b".to_string()),
        build(
            Layout::DayMonthYear,
            format!(r"(?i)\b(\d{{1,2}}) ({MONTH}) (\d{{4}})\b"),
        ),
        build(
            Layout::MonthDayYear,
            format!(r"(?i)\b({MONTH}) (\d{{1,2}})(?:,\s*|\s+)(\d{{4}})\b"),
        ),
        build(
            Layout::DayDashMonthYear,
            format!(r"(?i)\b(\d{{1,2}})-({MONTH})-(\d{{4}})\b"),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// A date-looking token found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    pub token: String,
    /// `None` when the token matched a layout but is not a calendar date (e.g. `2024-02-30`).
    pub date: Option<NaiveDate>,
}

/// Every date-looking token in `text`, in layout order then position.
pub fn extract_candidates(text: &str) -> Vec<DateCandidate> {
    let mut out = Vec::new();
    for (layout, re) in PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let token = caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string();
            out.push(DateCandidate {
                token,
                date: parse_captures(*layout, &caps),
            });
        }
    }
    out
}

fn parse_captures(layout: Layout, caps: &Captures<'_>) -> Option<NaiveDate> {
    let num = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
    let text = |i: usize| caps.get(i).map(|m| m.as_str());

    let (year, month, day) = match layout {
        Layout::Iso => (num(1)?, num(2)?, num(3)?),
        Layout::UsSlash => (num(3)?, num(1)?, num(2)?),
        Layout::DayMonthYear | Layout::DayDashMonthYear => {
            (num(3)?, month_number(text(2)?)?, num(1)?)
        }
        Layout::MonthDayYear => (num(3)?, month_number(text(1)?)?, num(2)?),
    };
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let idx = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ]
    .iter()
    .position(|m| *m == prefix)?;
    Some(idx as u32 + 1)
}

/// Distinct calendar dates in `text` strictly before `today`, ascending.
pub fn extract_past_dates(text: &str, today: NaiveDate) -> Vec<NaiveDate> {
    past_dates(&extract_candidates(text), today)
}

fn past_dates(candidates: &[DateCandidate], today: NaiveDate) -> Vec<NaiveDate> {
    candidates
        .iter()
        .filter_map(|c| c.date)
        .filter(|d| *d < today)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Validates that a piece of text names a baseline period of the required length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeValidator {
    required_days: i64,
}

impl Default for DateRangeValidator {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_DAYS)
    }
}

impl DateRangeValidator {
    pub fn new(required_days: i64) -> Self {
        Self { required_days }
    }

    pub fn required_days(&self) -> i64 {
        self.required_days
    }

    /// Validate against an explicit "today".
    pub fn validate(&self, text: &str, today: NaiveDate) -> Result<DateRange> {
        let candidates = extract_candidates(text);
        let dates = past_dates(&candidates, today);
        debug!(?dates, today = %today, "extracted past dates");

        if let [start, end] = dates[..] {
            let range = DateRange::new(start, end);
            let found_days = range.gap_days();
            if found_days != self.required_days {
                warn!(
                    expected = self.required_days,
                    found = found_days,
                    "baseline period has the wrong length"
                );
                return Err(BaselineError::DateGapMismatch {
                    expected_days: self.required_days,
                    found_days,
                });
            }
            info!(start = %range.start, end = %range.end, "baseline period accepted");
            return Ok(range);
        }

        if let Some(bad) = candidates.iter().find(|c| c.date.is_none()) {
            warn!(token = %bad.token, "date-like token is not a calendar date");
            return Err(BaselineError::DateParseFailure(bad.token.clone()));
        }

        warn!(found = dates.len(), "expected exactly two past dates");
        Err(BaselineError::DateCountMismatch { found: dates.len() })
    }

    /// Validate against the local current date.
    pub fn validate_now(&self, text: &str) -> Result<DateRange> {
        self.validate(text, Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        day(2025, 6, 1)
    }

    #[test]
    fn accepts_fifteen_day_iso_range() {
        let range = DateRangeValidator::default()
            .validate("baseline from 2024-01-16 back to 2024-01-01 please", today())
            .unwrap();
        assert_eq!(range, DateRange { start: day(2024, 1, 1), end: day(2024, 1, 16) });
    }

    #[test]
    fn single_date_is_a_count_mismatch() {
        let err = DateRangeValidator::default()
            .validate("starting 2024-01-01", today())
            .unwrap_err();
        assert_eq!(err, BaselineError::DateCountMismatch { found: 1 });
    }

    #[test]
    fn ten_day_gap_is_a_gap_mismatch() {
        let err = DateRangeValidator::default()
            .validate("2024-01-01 to 2024-01-11", today())
            .unwrap_err();
        assert_eq!(
            err,
            BaselineError::DateGapMismatch { expected_days: 15, found_days: 10 }
        );
    }

    #[test]
    fn recognises_every_layout() {
        let text = concat!(
            "a 2024-03-01 b 03/02/2024 c 3 March 2024 ",
            "d March 4, 2024 e 5-Mar-2024 f mar 6 2024",
        );
        assert_eq!(
            extract_past_dates(text, today()),
            (1..=6).map(|d| day(2024, 3, d)).collect::<Vec<_>>()
        );
    }

    #[test]
    fn mixed_layouts_form_a_range() {
        let range = DateRangeValidator::default()
            .validate("from 1 January 2024 until January 16, 2024", today())
            .unwrap();
        assert_eq!(range.gap_days(), 15);
    }

    #[test]
    fn today_and_future_dates_are_ignored() {
        let text = "2025-05-01, 2025-05-16, 2025-06-01 and 2026-01-01";
        let range = DateRangeValidator::default().validate(text, today()).unwrap();
        assert_eq!(range.start, day(2025, 5, 1));
        assert_eq!(range.end, day(2025, 5, 16));
    }

    #[test]
    fn repeated_dates_count_once() {
        let text = "2024-01-01 (that is 01/01/2024) through 16-Jan-2024";
        let range = DateRangeValidator::default().validate(text, today()).unwrap();
        assert_eq!(range.start, day(2024, 1, 1));
    }

    #[test]
    fn impossible_dates_are_parse_failures() {
        let err = DateRangeValidator::default()
            .validate("from 2024-02-30 to 2024-03-16", today())
            .unwrap_err();
        assert_eq!(err, BaselineError::DateParseFailure("2024-02-30".into()));
    }

    #[test]
    fn impossible_token_is_ignored_when_two_dates_remain() {
        let range = DateRangeValidator::default()
            .validate("2024-01-01, 2024-01-16 (not 2024-13-01)", today())
            .unwrap();
        assert_eq!(range.gap_days(), 15);
    }

    #[test]
    fn gap_is_configurable() {
        let validator = DateRangeValidator::new(30);
        assert!(validator.validate("2024-01-01 2024-01-31", today()).is_ok());
        assert!(validator.validate("2024-01-01 2024-01-16", today()).is_err());
    }

    #[test]
    fn no_dates_at_all() {
        assert_eq!(
            DateRangeValidator::default().validate("last month sometime", today()).unwrap_err(),
            BaselineError::DateCountMismatch { found: 0 }
        );
    }
}
