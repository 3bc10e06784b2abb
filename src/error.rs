// 🚧 Ingestion errors
// The one condition the pipeline recovers from is a missing input file;
// everything else bubbles up as-is.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Input path does not exist - triggers sample data generation
    #[error("sales data not found at {}", .0.display())]
    DataNotFound(PathBuf),

    /// Malformed rows, missing columns, unreadable file
    #[error("failed to read sales data from {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IngestError::DataNotFound(_))
    }
}

/// Unknown column name passed to the aggregation layer
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown column '{0}'")]
pub struct UnknownColumn(pub String);
