//! Local-calendar helpers.
//!
//! Production years are judged in the service's local time zone, so a
//! timestamp just after midnight UTC on January 1st can still belong to the
//! previous year locally.

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Utc};

/// Calendar year of `instant` in the local time zone.
pub fn local_year(instant: DateTime<Utc>) -> i32 {
    instant.with_timezone(&Local).year()
}

/// Start of the local-calendar year containing `epoch_millis`.
///
/// Returns `None` when the timestamp is outside the representable range.
pub fn start_of_local_year(epoch_millis: i64) -> Option<DateTime<Utc>> {
    let instant = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?;
    let year = local_year(instant);
    match Local.with_ymd_and_hms(year, 1, 1, 0, 0, 0) {
        LocalResult::Single(start) => Some(start.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{local_year, start_of_local_year};
    use chrono::{Datelike, Local, TimeZone, Timelike, Utc};

    #[test]
    fn mid_year_instant_keeps_its_year() {
        let instant = Utc.with_ymd_and_hms(2950, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(local_year(instant), 2950);
    }

    #[test]
    fn start_of_year_is_local_midnight_on_january_first() {
        let millis = Utc
            .with_ymd_and_hms(2990, 8, 20, 10, 30, 0)
            .unwrap()
            .timestamp_millis();
        let start = start_of_local_year(millis)
            .expect("in range")
            .with_timezone(&Local);
        assert_eq!(start.year(), 2990);
        assert_eq!(start.month(), 1);
        assert_eq!(start.day(), 1);
        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);
    }

    #[test]
    fn out_of_range_millis_yield_none() {
        assert_eq!(start_of_local_year(i64::MAX), None);
    }
}
