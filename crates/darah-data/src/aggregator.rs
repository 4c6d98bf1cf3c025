//! Yearly summary series derived from the daily tables and the visit log

use darah_common::{DailyCount, RetentionVisit, YearValue};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument};

use crate::SourceDatasets;

/// A yearly series for one state
#[derive(Debug, Clone, PartialEq)]
pub struct StateSeries {
    pub state: String,
    pub points: Vec<YearValue>,
}

/// Share of a year's visits made by repeat donors, as fractions in `0..=1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionPoint {
    pub year: i32,
    pub retention: f64,
    pub single: f64,
}

/// Everything the renderer needs for one report
#[derive(Debug, Clone, Default)]
pub struct ReportSeries {
    pub annual_totals: Vec<YearValue>,
    pub daily_averages: Vec<YearValue>,
    pub state_totals: Vec<StateSeries>,
    pub state_averages: Vec<StateSeries>,
    pub retention: Vec<RetentionPoint>,
}

impl ReportSeries {
    /// National series come from the facility table, per-state series from
    /// the state table
    #[instrument(skip_all)]
    pub fn from_datasets(datasets: &SourceDatasets) -> Self {
        let series = Self {
            annual_totals: annual_totals(&datasets.donations_facility),
            daily_averages: daily_averages(&datasets.donations_facility),
            state_totals: per_state(&datasets.donations_state, annual_totals),
            state_averages: per_state(&datasets.donations_state, daily_averages),
            retention: retention_rates(&datasets.retention),
        };
        debug!(
            years = series.annual_totals.len(),
            states = series.state_totals.len(),
            retention_years = series.retention.len(),
            "Aggregated report series"
        );
        series
    }
}

/// Sum of daily counts per year, ascending by year
pub fn annual_totals(records: &[DailyCount]) -> Vec<YearValue> {
    let mut totals: BTreeMap<i32, u64> = BTreeMap::new();
    for r in records {
        *totals.entry(r.year()).or_default() += r.count;
    }
    totals
        .into_iter()
        .map(|(year, sum)| YearValue::new(year, sum as f64))
        .collect()
}

/// Annual sum divided by the last day-of-year observed that year, so a
/// partial final year averages over the days it actually covers
pub fn daily_averages(records: &[DailyCount]) -> Vec<YearValue> {
    let mut acc: BTreeMap<i32, (u64, u32)> = BTreeMap::new();
    for r in records {
        let e = acc.entry(r.year()).or_default();
        e.0 += r.count;
        e.1 = e.1.max(r.day_of_year());
    }
    acc.into_iter()
        .map(|(year, (sum, max_day))| YearValue::new(year, sum as f64 / f64::from(max_day)))
        .collect()
}

/// Regions in order of first appearance
pub fn regions_in_order(records: &[DailyCount]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.region.as_str()))
        .map(|r| r.region.clone())
        .collect()
}

/// States to chart: every region except the first, which is the national aggregate
pub fn state_names(records: &[DailyCount]) -> Vec<String> {
    regions_in_order(records).into_iter().skip(1).collect()
}

/// Apply a series function to each state's own rows
pub fn per_state<F>(records: &[DailyCount], series: F) -> Vec<StateSeries>
where
    F: Fn(&[DailyCount]) -> Vec<YearValue>,
{
    let mut by_region: HashMap<&str, Vec<DailyCount>> = HashMap::new();
    for r in records {
        by_region.entry(r.region.as_str()).or_default().push(r.clone());
    }

    state_names(records)
        .into_iter()
        .map(|state| {
            let points = by_region
                .get(state.as_str())
                .map(|rows| series(rows))
                .unwrap_or_default();
            StateSeries { state, points }
        })
        .collect()
}

/// Year-by-year donor retention.
///
/// A donor is a repeat donor when their first and last visit fall in
/// different years. For each visit year the retention share is the number
/// of visits by repeat donors over all visits that year. The earliest year
/// has no earlier donors to retain and is left out.
pub fn retention_rates(visits: &[RetentionVisit]) -> Vec<RetentionPoint> {
    let mut span: HashMap<&str, (i32, i32)> = HashMap::new();
    for v in visits {
        let year = v.visit_year();
        span.entry(v.donor_id.as_str())
            .and_modify(|(first, last)| {
                *first = (*first).min(year);
                *last = (*last).max(year);
            })
            .or_insert((year, year));
    }

    // (visits by repeat donors, all visits)
    let mut per_year: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for v in visits {
        let repeat = span
            .get(v.donor_id.as_str())
            .is_some_and(|(first, last)| first != last);
        let e = per_year.entry(v.visit_year()).or_default();
        if repeat {
            e.0 += 1;
        }
        e.1 += 1;
    }

    per_year
        .into_iter()
        .skip(1)
        .map(|(year, (repeat, total))| {
            let retention = repeat as f64 / total as f64;
            RetentionPoint {
                year,
                retention,
                single: 1.0 - retention,
            }
        })
        .collect()
}
