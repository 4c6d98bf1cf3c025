//! Formatting helpers used across the Darah Report crates

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Format an integer with comma thousands separators (`1234567` → `1,234,567`)
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Strip the last extension from a file name (`a.b.png` → `a.b`)
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Join region names the way chart titles list them
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Calendar date of `now` in the given timezone
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    tz.from_utc_datetime(&now.naive_utc()).date_naive()
}

/// Date as shown in the report summary message (`DD-MM-YYYY`)
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(50_000), "50,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-12_345), "-12,345");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Total Annual Blood Donations.png"), "Total Annual Blood Donations");
        assert_eq!(strip_extension("a.b.png"), "a.b");
        assert_eq!(strip_extension("no_extension"), "no_extension");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&["Johor", "Kedah", "Kelantan"]), "Johor, Kedah, Kelantan");
        assert_eq!(join_names::<&str>(&[]), "");
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 17:30 UTC is already the next day in Kuala Lumpur (UTC+8)
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 17, 30, 0).unwrap();
        let date = local_date(now, chrono_tz::Asia::Kuala_Lumpur);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(format_report_date(date), "02-05-2024");
    }
}
