//! Display formatting for dates, hours and temperatures.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Format of `dt_txt` in forecast entries
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// "2024-01-15 14:00:00" -> "2 pm". `None` if the text doesn't parse.
pub fn hour_label(dt_txt: &str) -> Option<String> {
    let parsed = NaiveDateTime::parse_from_str(dt_txt.trim(), FORECAST_TIME_FORMAT).ok()?;
    Some(twelve_hour(parsed.hour()))
}

/// 0 -> "12 am", 12 -> "12 pm", 15 -> "3 pm"
pub fn twelve_hour(hour: u32) -> String {
    let suffix = if hour >= 12 { "pm" } else { "am" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{} {}", hour, suffix)
}

/// Temperatures are displayed rounded up
pub fn round_up(value: f64) -> i64 {
    value.ceil() as i64
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// "Monday, 15th of January"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {}{} of {}",
        weekday_name(date.weekday()),
        date.day(),
        ordinal_suffix(date.day()),
        month_name(date.month())
    )
}

/// Today's date in the local timezone, formatted with [`long_date`]
pub fn today_label() -> String {
    long_date(Local::now().date_naive())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Undefined",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_hour_label() {
        assert_eq!(hour_label("2024-01-15 14:00:00").as_deref(), Some("2 pm"));
        assert_eq!(hour_label("2024-01-15 09:00:00").as_deref(), Some("9 am"));
        assert_eq!(hour_label("2024-01-15 00:00:00").as_deref(), Some("12 am"));
        assert_eq!(hour_label("2024-01-15 12:00:00").as_deref(), Some("12 pm"));
        assert!(hour_label("").is_none());
        assert!(hour_label("yesterday").is_none());
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(25.2), 26);
        assert_eq!(round_up(25.0), 25);
        assert_eq!(round_up(-0.5), 0);
    }

    #[test]
    fn test_ordinal_suffix() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(long_date(date), "Monday, 15th of January");

        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert_eq!(long_date(date), "Thursday, 1st of October");
    }
}
