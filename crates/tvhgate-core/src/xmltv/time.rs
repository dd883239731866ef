//! XMLTV timestamp handling (`YYYYMMDDhhmmss +zzzz`).

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// `strftime` pattern used for every timestamp this crate writes.
pub const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Parses an XMLTV timestamp.
///
/// A timestamp without an offset is read as UTC. Returns `None` when the
/// leading fourteen digits are not a valid date and time.
#[must_use]
pub fn parse_xmltv_time(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_str(value, XMLTV_TIME_FORMAT) {
        return Some(parsed);
    }
    let digits = value.get(..14)?;
    NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Formats a timestamp in XMLTV form, keeping its offset.
#[must_use]
pub fn format_xmltv_time<Tz>(value: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    value.format(XMLTV_TIME_FORMAT).to_string()
}
