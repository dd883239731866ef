//! Placeholder programmes for channels without guide data.

use std::fmt::Display;

use chrono::{DateTime, Days, NaiveTime, TimeDelta, TimeZone};

use crate::xmltv::{LangText, XmltvProgramme, format_xmltv_time};

/// Number of placeholder blocks per channel.
pub const FILLER_BLOCKS: u32 = 36;

/// Length of each placeholder block in hours.
pub const FILLER_BLOCK_HOURS: i64 = 2;

/// Description carried by every placeholder programme.
pub const FILLER_DESCRIPTION: &str = "No programming information";

/// Language tag for placeholder title and description.
pub const FILLER_LANGUAGE: &str = "eng";

/// Start of the placeholder window: local midnight of the day before
/// `reference`, in `reference`'s time zone.
///
/// When that midnight does not exist locally (a DST gap), the earliest valid
/// instant is used, falling back to the same wall clock read as UTC.
#[must_use]
pub fn filler_window_start<Tz: TimeZone>(reference: &DateTime<Tz>) -> DateTime<Tz> {
    let today = reference.date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    let midnight = yesterday.and_time(NaiveTime::MIN);
    let zone = reference.timezone();
    zone.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| zone.from_utc_datetime(&midnight))
}

/// Generates the placeholder listings for one channel: contiguous
/// two-hour blocks covering 72 hours from [`filler_window_start`].
#[must_use]
pub fn synthesize_programmes<Tz>(
    number: &str,
    title: &str,
    reference: &DateTime<Tz>,
) -> Vec<XmltvProgramme>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let window_start = filler_window_start(reference);
    let block = TimeDelta::hours(FILLER_BLOCK_HOURS);

    let mut programmes = Vec::new();
    let mut begin = window_start;
    for _ in 0..FILLER_BLOCKS {
        let end = begin.clone() + block;
        programmes.push(XmltvProgramme {
            start: format_xmltv_time(&begin),
            stop: Some(format_xmltv_time(&end)),
            channel: String::from(number),
            titles: vec![LangText::tagged(title, FILLER_LANGUAGE)],
            descriptions: vec![LangText::tagged(FILLER_DESCRIPTION, FILLER_LANGUAGE)],
            ..XmltvProgramme::default()
        });
        begin = end;
    }
    programmes
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use chrono::{FixedOffset, Utc};

    use super::*;
    use crate::xmltv::parse_xmltv_time;

    #[test]
    fn test_window_starts_at_previous_midnight() {
        // Arrange
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let reference = offset.with_ymd_and_hms(2024, 1, 15, 0, 30, 0).unwrap();

        // Act
        let start = filler_window_start(&reference);

        // Assert
        assert_eq!(start, offset.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_synthesize_covers_72_contiguous_hours() {
        // Arrange
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 13, 45, 0).unwrap();

        // Act
        let programmes = synthesize_programmes("101", "News", &reference);

        // Assert
        assert_eq!(programmes.len(), 36);
        assert_eq!(programmes[0].start, "20240114000000 +0000");
        assert_eq!(
            programmes[35].stop.as_deref(),
            Some("20240117000000 +0000")
        );
        for pair in programmes.windows(2) {
            assert_eq!(pair[0].stop.as_deref(), Some(pair[1].start.as_str()));
        }
        let first = parse_xmltv_time(&programmes[0].start).unwrap();
        let last = parse_xmltv_time(programmes[35].stop.as_deref().unwrap()).unwrap();
        assert_eq!(last - first, TimeDelta::hours(72));
    }

    #[test]
    fn test_synthesize_fields() {
        // Arrange
        let reference = Utc.with_ymd_and_hms(2024, 1, 15, 13, 45, 0).unwrap();

        // Act
        let programmes = synthesize_programmes("101", "News", &reference);

        // Assert
        assert!(programmes.iter().all(|p| p.channel == "101"));
        assert!(programmes.iter().all(|p| p.primary_title() == "News"));
        assert_eq!(
            programmes[0].titles[0].lang.as_deref(),
            Some(FILLER_LANGUAGE)
        );
        assert_eq!(programmes[0].descriptions[0].value, FILLER_DESCRIPTION);
    }
}
