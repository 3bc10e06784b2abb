// 🔁 Analysis Pipeline
// read-or-generate → aggregate → report → chart → summary
//
// The missing-file fallback is an explicit two-step sequence with exactly one
// retry: if the freshly generated file still cannot be read, the error is
// returned instead of generating again.

use crate::aggregation::{describe_all, DatasetOverview, SalesInsights};
use crate::charts::render_dashboard;
use crate::config::AnalysisConfig;
use crate::dataset::{derivation_mismatches, fingerprint, load_csv, SalesRecord};
use crate::generator::write_sample;
use crate::report::{render_console_report, write_summary};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where the analysed rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Existing input file
    Input,
    /// Sample dataset written because the input file was missing
    Generated,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub origin: DataOrigin,
    pub insights: SalesInsights,
    /// Human-readable analysis, ready for stdout
    pub console_report: String,
    pub chart_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Load the configured CSV, generating the sample dataset first if it is missing.
pub fn load_or_generate(config: &AnalysisConfig) -> Result<(Vec<SalesRecord>, DataOrigin)> {
    let path = &config.data_path;

    match load_csv(path) {
        Ok(records) => return Ok((records, DataOrigin::Input)),
        Err(e) if e.is_not_found() => {
            warn!(path = %path.display(), "sales data not found, creating sample data");
        }
        Err(e) => return Err(e.into()),
    }

    let rows = write_sample(path, &config.sample)
        .with_context(|| format!("Failed to write sample data to {:?}", path))?;
    info!(path = %path.display(), rows, seed = config.sample.seed, "sample data created");

    let records = load_csv(path).context("Generated sample data could not be loaded")?;
    Ok((records, DataOrigin::Generated))
}

/// Run the whole analysis once
pub fn run(config: &AnalysisConfig) -> Result<RunOutcome> {
    let (records, origin) = load_or_generate(config)?;
    info!(records = records.len(), ?origin, "sales data loaded");
    let digest = fingerprint(&records)?;
    debug!(fingerprint = %digest, "dataset fingerprint");

    let mismatches = derivation_mismatches(&records, config.derivation_tolerance);
    if mismatches > 0 {
        warn!(
            rows = mismatches,
            tolerance = config.derivation_tolerance,
            "Total_Sales differs from Quantity x Unit_Price"
        );
    }

    let insights = SalesInsights::compute(&records);
    let overview = DatasetOverview::from_records(&records);
    let stats = describe_all(&records);
    let console_report = render_console_report(&overview, &stats, &insights, config.top_n);

    render_dashboard(&config.chart_path, &insights, &config.chart)?;
    info!(path = %config.chart_path.display(), "charts saved");

    write_summary(&config.summary_path, &insights)?;
    info!(path = %config.summary_path.display(), "summary saved");

    Ok(RunOutcome {
        origin,
        insights,
        console_report,
        chart_path: config.chart_path.clone(),
        summary_path: config.summary_path.clone(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
