//! Generic, format-list driven date parsing.
//!
//! Shared by the classifier (date column detection) and the extractor (per-row
//! date parsing) so that both agree on what counts as a date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// chrono's `%Y` accepts one to four digits, so `03/04/24` read as `%Y/%m/%d`
/// lands in year 3. Results before this year are discarded and the next
/// format is tried.
const MIN_YEAR: i32 = 1000;

pub const DEFAULT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
];

pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%Y%m%d",
];

#[derive(Debug, Clone)]
pub struct DateParser {
    datetime_formats: Vec<String>,
    date_formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(
            DEFAULT_DATETIME_FORMATS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl DateParser {
    pub fn new(datetime_formats: Vec<String>, date_formats: Vec<String>) -> Self {
        Self {
            datetime_formats,
            date_formats,
        }
    }

    /// Parse a timestamp out of free-form text.
    ///
    /// Tries RFC 3339 first, then each datetime format, then each date format
    /// (at midnight). The first format that consumes the whole trimmed input wins.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }
        let plausible = |dt: &NaiveDateTime| dt.year() >= MIN_YEAR;
        self.datetime_formats
            .iter()
            .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .find(plausible)
            .or_else(|| {
                self.date_formats
                    .iter()
                    .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .filter_map(|d| d.and_hms_opt(0, 0, 0))
                    .find(plausible)
            })
    }
}
