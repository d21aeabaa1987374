//! Day-granular calendar helpers shared by all recurrence rules.

use chrono::{DateTime, Datelike, Local, NaiveDate};

/// Czech weekday abbreviations indexed by day-of-week, 0 = Sunday.
static WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Ne", "Po", "Út", "St", "Čt", "Pá", "So"];

/// Strip the time-of-day from a local timestamp.
///
/// Every "today" comparison in the schedule goes through this, so the hour at
/// which the update trigger fires never changes which day is "today".
pub fn local_midnight(instant: DateTime<Local>) -> NaiveDate {
    instant.date_naive()
}

/// Render a date as `DD.MM.YYYY (Www)` with the Czech weekday abbreviation.
pub fn format_display_date(date: NaiveDate) -> String {
    let weekday = WEEKDAY_ABBREVIATIONS[date.weekday().num_days_from_sunday() as usize];
    format!("{} ({weekday})", date.format("%d.%m.%Y"))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{NaiveDate, TimeZone};

    use super::*;

    #[test]
    fn test_format_display_date() {
        let date = NaiveDate::from_str("2025-10-15").unwrap();
        assert_eq!(format_display_date(date), "15.10.2025 (St)");
        let date = NaiveDate::from_str("2025-09-29").unwrap();
        assert_eq!(format_display_date(date), "29.09.2025 (Po)");
        let date = NaiveDate::from_str("2025-11-30").unwrap();
        assert_eq!(format_display_date(date), "30.11.2025 (Ne)");
    }

    /// Day and month below ten must be zero-padded.
    #[test]
    fn test_format_display_date_padding() {
        let date = NaiveDate::from_str("2026-03-06").unwrap();
        assert_eq!(format_display_date(date), "06.03.2026 (Pá)");
    }

    #[test]
    fn test_local_midnight_strips_time_of_day() {
        let late = Local.with_ymd_and_hms(2025, 10, 15, 23, 59, 59).unwrap();
        let early = Local.with_ymd_and_hms(2025, 10, 15, 0, 0, 0).unwrap();
        let expected = NaiveDate::from_str("2025-10-15").unwrap();
        assert_eq!(local_midnight(late), expected);
        assert_eq!(local_midnight(early), expected);
    }
}
