// Sales Insights - Core Library
// CSV sales data → grouped totals → dashboard PNG + text summary

pub mod aggregation;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use aggregation::{
    ColumnStats, DatasetOverview, GroupColumn, GroupTotal, MeasureColumn, MonthlyTotal,
    SalesInsights,
    group_sum, group_sum_by_name, monthly_totals, total, mean,
};
pub use charts::{ChartStyle, render_dashboard};
pub use config::AnalysisConfig;
pub use dataset::{SalesRecord, YearMonth, load_csv, write_csv};
pub use error::{IngestError, UnknownColumn};
pub use generator::{SampleConfig, generate, write_sample};
pub use pipeline::{DataOrigin, RunOutcome, load_or_generate, run};
pub use report::{format_currency, render_summary, write_summary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
