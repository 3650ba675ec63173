//! Date formatting and the browser's notion of "today".

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Current local date of the browser
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
    .unwrap_or_else(|| Local::now().date_naive())
}

/// "Oct 16, 2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_date_opt(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_else(|| "-".to_string())
}

/// "Oct 16, 2026 14:02", in UTC
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y %H:%M").to_string()
}

/// Value of an `<input type="date">`, "YYYY-MM-DD"
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_date(d), "Mar 5, 2026");
        assert_eq!(format_date_opt(None), "-");
    }

    #[test]
    fn test_format_datetime() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 16, 14, 2, 26).unwrap();
        assert_eq!(format_datetime(ts), "Oct 16, 2026 14:02");
    }

    #[test]
    fn test_date_inputs() {
        let d = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(parse_date_input(" 2026-12-31 "), Some(d));
        assert_eq!(parse_date_input("31.12.2026"), None);
        assert_eq!(parse_date_input(""), None);
        assert_eq!(date_input_value(Some(d)), "2026-12-31");
        assert_eq!(date_input_value(None), "");
    }
}
