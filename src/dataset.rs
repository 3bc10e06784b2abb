// 📂 Sales Dataset - CSV ingestion + persistence
// One row per sale: Date, Product, Region, Salesperson, Quantity, Unit_Price, Total_Sales

use crate::error::IngestError;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

// ============================================================================
// SALES RECORD
// ============================================================================

/// A single sales transaction as stored in the CSV file.
///
/// Only Date, Product, Region, Salesperson and Total_Sales are required;
/// Quantity and Unit_Price may be absent from the file or empty per row.
/// `total_sales` is expected to equal `quantity * unit_price` but is taken
/// as-is from the input; see [`derivation_mismatches`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Date", with = "iso_date")]
    pub date: NaiveDate,

    #[serde(rename = "Product")]
    pub product: String,

    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "Salesperson")]
    pub salesperson: String,

    #[serde(rename = "Quantity", default)]
    pub quantity: Option<u32>,

    #[serde(rename = "Unit_Price", default)]
    pub unit_price: Option<f64>,

    #[serde(rename = "Total_Sales")]
    pub total_sales: f64,
}

impl SalesRecord {
    /// Calendar month the sale belongs to
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    /// Quantity x Unit_Price, unrounded; `None` when either is missing
    pub fn expected_total(&self) -> Option<f64> {
        Some(self.quantity? as f64 * self.unit_price?)
    }
}

// Dates are always YYYY-MM-DD on disk
mod iso_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(s.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// YEAR-MONTH KEY
// ============================================================================

/// Derived grouping key for the monthly trend.
/// Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ============================================================================
// LOAD / WRITE
// ============================================================================

/// Load every row of the CSV at `path`.
///
/// A missing file is reported as [`IngestError::DataNotFound`] so the caller
/// can fall back to sample data. Any other failure (bad header, bad number,
/// bad date) is returned unchanged and aborts the run.
pub fn load_csv(path: &Path) -> std::result::Result<Vec<SalesRecord>, IngestError> {
    let csv_err = |source: csv::Error| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::Reader::from_path(path).map_err(|source| {
        let not_found = matches!(
            source.kind(),
            csv::ErrorKind::Io(io) if io.kind() == io::ErrorKind::NotFound
        );
        if not_found {
            IngestError::DataNotFound(path.to_path_buf())
        } else {
            csv_err(source)
        }
    })?;
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        let record: SalesRecord = result.map_err(csv_err)?;
        records.push(record);
    }

    Ok(records)
}

/// Serialize records (header first) into any writer
pub fn write_records<W: Write>(writer: W, records: &[SalesRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for record in records {
        wtr.serialize(record)
            .context("Failed to serialize sales record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Write records to `path`, replacing any existing file
pub fn write_csv(path: &Path, records: &[SalesRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
    write_records(file, records)
}

// ============================================================================
// CONSISTENCY + PROVENANCE
// ============================================================================

/// Count rows where Total_Sales is further than `tolerance` from
/// Quantity x Unit_Price. Rows missing either input are skipped.
/// Input files are trusted, so this only feeds a warning.
pub fn derivation_mismatches(records: &[SalesRecord], tolerance: f64) -> usize {
    records
        .iter()
        .filter_map(|r| r.expected_total().map(|expected| (r.total_sales - expected).abs()))
        .filter(|diff| *diff > tolerance)
        .count()
}

/// SHA-256 of the CSV serialization of `records`
pub fn fingerprint(records: &[SalesRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;

    let mut hasher = Sha256::new();
    hasher.update(&buf);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// TESTS
// ============================================================================
