//! Integration tests for darah-common crate.

use chrono::{NaiveDate, TimeZone, Utc};
use darah_common::{
    format_report_date, format_thousands, join_names, local_date, strip_extension, ChartArtifact,
    ChartImage, DailyCount, DarahError,
};
use proptest::prelude::*;

#[test]
fn test_report_date_in_kuala_lumpur() {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 16, 0, 0).unwrap();
    let date = local_date(now, chrono_tz::Asia::Kuala_Lumpur);
    assert_eq!(format_report_date(date), "01-01-2025");
}

#[test]
fn test_caption_matches_strip_extension() {
    let name = format!("State Daily Donation Breakdown ({}).png", join_names(&["Perak", "Perlis"]));
    let artifact = ChartArtifact::new(name.clone(), ChartImage::Png(Vec::new()));
    assert_eq!(artifact.caption(), strip_extension(&name));
    assert_eq!(artifact.caption(), "State Daily Donation Breakdown (Perak, Perlis)");
}

#[test]
fn test_daily_count_csv_rejects_bad_date() {
    let csv = "date,state,daily\n2024-13-01,Johor,5\n";
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let result: Result<DailyCount, csv::Error> = reader.deserialize().next().unwrap();
    let err: DarahError = result.unwrap_err().into();
    assert!(matches!(err, DarahError::Data { .. }));
}

#[test]
fn test_daily_count_ordinal_on_last_day() {
    let leap = DailyCount::new(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(), "Sabah", 1);
    let common = DailyCount::new(NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(), "Sabah", 1);
    assert_eq!(leap.day_of_year(), 366);
    assert_eq!(common.day_of_year(), 365);
}

proptest! {
    #[test]
    fn prop_format_thousands_round_trips(value in -10_000_000_000i64..10_000_000_000i64) {
        let formatted = format_thousands(value);
        let digits: String = formatted.chars().filter(|c| *c != ',').collect();
        prop_assert_eq!(digits.parse::<i64>().unwrap(), value);
        for group in formatted.trim_start_matches('-').split(',').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
    }
}
