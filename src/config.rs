// ⚙️ Analysis Configuration
// In-code defaults for every path and knob. The binary only ever uses
// `AnalysisConfig::default()`; library callers and tests can override.

use crate::charts::ChartStyle;
use crate::generator::SampleConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_PATH: &str = "sales_data.csv";
pub const DEFAULT_CHART_PATH: &str = "sales_analysis_charts.png";
pub const DEFAULT_SUMMARY_PATH: &str = "analysis_summary.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Input CSV; the sample dataset is written here when it is missing
    pub data_path: PathBuf,
    pub chart_path: PathBuf,
    pub summary_path: PathBuf,

    /// Rows listed in the console report's top-products / monthly sections
    pub top_n: usize,

    /// Allowed |Total_Sales - Quantity * Unit_Price| before a row counts as inconsistent
    pub derivation_tolerance: f64,

    pub sample: SampleConfig,
    pub chart: ChartStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            summary_path: PathBuf::from(DEFAULT_SUMMARY_PATH),
            top_n: 5,
            derivation_tolerance: 0.01,
            sample: SampleConfig::default(),
            chart: ChartStyle::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load config from a JSON file; missing fields keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Same file names as the defaults, placed under `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        AnalysisConfig {
            data_path: dir.join(DEFAULT_DATA_PATH),
            chart_path: dir.join(DEFAULT_CHART_PATH),
            summary_path: dir.join(DEFAULT_SUMMARY_PATH),
            ..AnalysisConfig::default()
        }
    }
}
