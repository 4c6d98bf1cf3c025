//! Record types shared by the data, graph and bot crates

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The upstream tables the job knows how to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    DonationsFacility,
    DonationsState,
    NewDonorsFacility,
    NewDonorsState,
    Retention,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::DonationsFacility,
        DatasetKind::DonationsState,
        DatasetKind::NewDonorsFacility,
        DatasetKind::NewDonorsState,
        DatasetKind::Retention,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonationsFacility => "donations_facility",
            Self::DonationsState => "donations_state",
            Self::NewDonorsFacility => "newdonors_facility",
            Self::NewDonorsState => "newdonors_state",
            Self::Retention => "retention",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a daily facility/state table: a count for one region on one day.
///
/// Used for both donation tables (`daily` column) and new-donor tables
/// (`total` column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    #[serde(alias = "state", alias = "hospital")]
    pub region: String,
    #[serde(alias = "daily", alias = "total")]
    pub count: u64,
}

impl DailyCount {
    pub fn new(date: NaiveDate, region: impl Into<String>, count: u64) -> Self {
        Self {
            date,
            region: region.into(),
            count,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// 1-based ordinal day within the year
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }
}

/// One donor visit from the granular retention dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RetentionVisit {
    pub donor_id: String,
    pub visit_date: NaiveDate,
}

impl RetentionVisit {
    pub fn new(donor_id: impl Into<String>, visit_date: NaiveDate) -> Self {
        Self {
            donor_id: donor_id.into(),
            visit_date,
        }
    }

    pub fn visit_year(&self) -> i32 {
        self.visit_date.year()
    }
}

/// A single point of a yearly series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

impl YearValue {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Where the pixels of a rendered chart live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartImage {
    /// PNG written to this path
    File(PathBuf),
    /// Encoded PNG bytes held in memory
    Png(Vec<u8>),
}

/// A rendered chart together with its file name.
///
/// The file name doubles as the remote identifier and, without its
/// extension, as the human caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub file_name: String,
    pub image: ChartImage,
}

impl ChartArtifact {
    pub fn new(file_name: impl Into<String>, image: ChartImage) -> Self {
        Self {
            file_name: file_name.into(),
            image,
        }
    }

    /// File name with its extension stripped
    pub fn caption(&self) -> &str {
        crate::utils::strip_extension(&self.file_name)
    }

    /// Load the PNG bytes, reading from disk for file-backed charts
    pub fn png_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.image {
            ChartImage::File(path) => std::fs::read(path),
            ChartImage::Png(bytes) => Ok(bytes.clone()),
        }
    }
}

impl fmt::Display for ChartArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.image {
            ChartImage::File(path) => write!(f, "{} ({})", self.file_name, path.display()),
            ChartImage::Png(bytes) => write!(f, "{} ({} bytes in memory)", self.file_name, bytes.len()),
        }
    }
}
