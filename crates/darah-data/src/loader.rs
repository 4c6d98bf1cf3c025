//! Reads the downloaded files into typed records

use chrono::NaiveDate;
use darah_common::{DailyCount, DarahError, DatasetKind, Result, RetentionVisit};
use darah_config::SourceConfig;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, instrument};

/// The five source tables of one run
#[derive(Debug, Clone, Default)]
pub struct SourceDatasets {
    pub donations_facility: Vec<DailyCount>,
    pub donations_state: Vec<DailyCount>,
    pub new_donors_facility: Vec<DailyCount>,
    pub new_donors_state: Vec<DailyCount>,
    pub retention: Vec<RetentionVisit>,
}

impl SourceDatasets {
    /// Load every configured source from `data_dir`
    #[instrument(skip(sources), fields(dir = %data_dir.display()))]
    pub fn load(data_dir: &Path, sources: &[SourceConfig]) -> Result<Self> {
        let mut datasets = Self::default();

        for source in sources {
            let path = data_dir.join(source.local_file_name());
            match source.kind {
                DatasetKind::DonationsFacility => datasets.donations_facility = load_daily_counts(&path)?,
                DatasetKind::DonationsState => datasets.donations_state = load_daily_counts(&path)?,
                DatasetKind::NewDonorsFacility => datasets.new_donors_facility = load_daily_counts(&path)?,
                DatasetKind::NewDonorsState => datasets.new_donors_state = load_daily_counts(&path)?,
                DatasetKind::Retention => datasets.retention = load_retention(&path)?,
            }
        }

        info!(
            donations_facility = datasets.donations_facility.len(),
            donations_state = datasets.donations_state.len(),
            new_donors_facility = datasets.new_donors_facility.len(),
            new_donors_state = datasets.new_donors_state.len(),
            retention = datasets.retention.len(),
            "Loaded source datasets"
        );
        Ok(datasets)
    }
}

/// Read a daily facility/state table (`date`, `state`|`hospital`, `daily`|`total`)
pub fn load_daily_counts(path: &Path) -> Result<Vec<DailyCount>> {
    let file = open(path)?;
    let records = read_daily_counts(file)
        .map_err(|e| DarahError::data_with_source(format!("Failed to read {}", path.display()), e))?;
    debug!(path = %path.display(), rows = records.len(), "Read daily table");
    Ok(records)
}

/// Parse daily counts from any CSV reader
pub fn read_daily_counts<R: std::io::Read>(reader: R) -> Result<Vec<DailyCount>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for row in reader.deserialize::<DailyCount>() {
        records.push(row?);
    }
    Ok(records)
}

/// Read the granular retention table from Parquet, or from CSV when the
/// file has a `.csv` extension
pub fn load_retention(path: &Path) -> Result<Vec<RetentionVisit>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let visits = if is_csv {
        let file = open(path)?;
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
        reader
            .deserialize::<RetentionVisit>()
            .collect::<std::result::Result<Vec<_>, _>>()?
    } else {
        let df = ParquetReader::new(open(path)?).finish()?;
        retention_from_frame(&df)?
    };

    debug!(path = %path.display(), rows = visits.len(), "Read retention table");
    Ok(visits)
}

/// Extract visits from a frame with `donor_id` and `visit_date` columns.
///
/// `donor_id` may be any type castable to a string; `visit_date` may be a
/// date, a datetime or an ISO string.
pub fn retention_from_frame(df: &DataFrame) -> Result<Vec<RetentionVisit>> {
    let donor_ids = df.column("donor_id")?.cast(&DataType::String)?;
    let visit_dates = df.column("visit_date")?.cast(&DataType::String)?;

    let mut visits = Vec::with_capacity(df.height());
    for (row, (donor, visit)) in donor_ids.str()?.into_iter().zip(visit_dates.str()?).enumerate() {
        let (Some(donor), Some(visit)) = (donor, visit) else {
            return Err(DarahError::data(format!("Retention row {} has a null field", row)));
        };
        visits.push(RetentionVisit::new(donor, parse_visit_date(visit)?));
    }
    Ok(visits)
}

/// Accept `YYYY-MM-DD` optionally followed by a time part
fn parse_visit_date(value: &str) -> Result<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DarahError::data_with_source(format!("Invalid visit date '{}'", value), e))
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| DarahError::data_with_source(format!("Cannot open {}", path.display()), e))
}
