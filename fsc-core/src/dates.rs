//! Date helpers shared across the fsc crates.

use chrono::{Datelike, NaiveDate};

/// Format a NaiveDate as "YYYY-MM-DD"
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a sample date. Survey exports carry either "YYYY-MM-DD" or the
/// spreadsheet-style "M/D/YYYY".
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

/// Get the water year for a given date.
/// Water year runs Oct 1 to Sep 30.
/// e.g., Oct 1 2022 -> water year 2023, Sep 30 2022 -> water year 2022
pub fn water_year_for_date(date: &NaiveDate) -> i32 {
    let month = date.month();
    let year = date.year();
    if month >= 10 {
        year + 1
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_date_both_formats() {
        let iso = parse_date("2011-06-27").unwrap();
        let us = parse_date("6/27/2011").unwrap();
        assert_eq!(iso, us);
        assert_eq!(iso, NaiveDate::from_ymd_opt(2011, 6, 27).unwrap());
        assert!(parse_date("June 27, 2011").is_none());
    }

    #[test]
    fn test_water_year_for_date() {
        let oct1 = NaiveDate::from_ymd_opt(2011, 10, 1).unwrap();
        assert_eq!(water_year_for_date(&oct1), 2012);

        let sep30 = NaiveDate::from_ymd_opt(2012, 9, 30).unwrap();
        assert_eq!(water_year_for_date(&sep30), 2012);

        let jan1 = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        assert_eq!(water_year_for_date(&jan1), 2012);
    }

    #[test]
    fn test_format_and_parse() {
        let date = NaiveDate::from_ymd_opt(2013, 6, 15).unwrap();
        let formatted = format_date(&date);
        assert_eq!(formatted, "2013-06-15");
        let parsed = parse_date(&formatted).unwrap();
        assert_eq!(parsed, date);
    }
}
