// 📊 Aggregation Engine - grouped sums, monthly trend, descriptive stats
//
// Every insight the dashboard and summary show comes out of this module:
//   group_sum(records, G, M)  -> [(key, sum)] sorted desc, ties in encounter order
//   monthly_totals(records, M) -> [(YYYY-MM, sum)] chronological
//   total / mean               -> scalars over the whole collection

use crate::dataset::{SalesRecord, YearMonth};
use crate::error::UnknownColumn;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

// ============================================================================
// COLUMNS
// ============================================================================

/// Categorical columns a collection can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupColumn {
    Product,
    Region,
    Salesperson,
}

impl GroupColumn {
    /// CSV header name
    pub fn name(&self) -> &'static str {
        match self {
            GroupColumn::Product => "Product",
            GroupColumn::Region => "Region",
            GroupColumn::Salesperson => "Salesperson",
        }
    }

    fn key<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            GroupColumn::Product => &record.product,
            GroupColumn::Region => &record.region,
            GroupColumn::Salesperson => &record.salesperson,
        }
    }
}

impl FromStr for GroupColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Product" => Ok(GroupColumn::Product),
            "Region" => Ok(GroupColumn::Region),
            "Salesperson" => Ok(GroupColumn::Salesperson),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// Numeric columns that can be summed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureColumn {
    Quantity,
    UnitPrice,
    TotalSales,
}

impl MeasureColumn {
    /// CSV header name
    pub fn name(&self) -> &'static str {
        match self {
            MeasureColumn::Quantity => "Quantity",
            MeasureColumn::UnitPrice => "Unit_Price",
            MeasureColumn::TotalSales => "Total_Sales",
        }
    }

    /// `None` when the row has no value for this column
    pub fn value(&self, record: &SalesRecord) -> Option<f64> {
        match self {
            MeasureColumn::Quantity => record.quantity.map(f64::from),
            MeasureColumn::UnitPrice => record.unit_price,
            MeasureColumn::TotalSales => Some(record.total_sales),
        }
    }
}

impl FromStr for MeasureColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quantity" => Ok(MeasureColumn::Quantity),
            "Unit_Price" => Ok(MeasureColumn::UnitPrice),
            "Total_Sales" => Ok(MeasureColumn::TotalSales),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

// ============================================================================
// GROUPED SUMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: YearMonth,
    pub total: f64,
}

/// Sum `measure` per distinct `group` key, keys in first-encounter order.
/// Missing values count as zero; the key still gets an entry.
fn sums_in_encounter_order(
    records: &[SalesRecord],
    group: GroupColumn,
    measure: MeasureColumn,
) -> Vec<GroupTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<GroupTotal> = Vec::new();

    for record in records {
        let key = group.key(record);
        let value = measure.value(record).unwrap_or(0.0);

        match index.get(key) {
            Some(&i) => totals[i].total += value,
            None => {
                index.insert(key, totals.len());
                totals.push(GroupTotal {
                    key: key.to_string(),
                    total: value,
                });
            }
        }
    }

    totals
}

/// Grouped sums sorted by total, largest first.
/// `sort_by` is stable, so equal totals keep the order their keys were first seen.
pub fn group_sum(
    records: &[SalesRecord],
    group: GroupColumn,
    measure: MeasureColumn,
) -> Vec<GroupTotal> {
    let mut totals = sums_in_encounter_order(records, group, measure);
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Lookup by header names, e.g. `("Region", "Total_Sales")`
pub fn group_sum_by_name(
    records: &[SalesRecord],
    group: &str,
    measure: &str,
) -> Result<Vec<GroupTotal>, UnknownColumn> {
    Ok(group_sum(records, group.parse()?, measure.parse()?))
}

/// Sum per calendar month, oldest first
pub fn monthly_totals(records: &[SalesRecord], measure: MeasureColumn) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for record in records {
        *by_month.entry(record.year_month()).or_insert(0.0) +=
            measure.value(record).unwrap_or(0.0);
    }

    by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Sum over the rows that have a value
pub fn total(records: &[SalesRecord], measure: MeasureColumn) -> f64 {
    records.iter().filter_map(|r| measure.value(r)).sum()
}

/// Arithmetic mean over the rows that have a value; `None` if there are none
pub fn mean(records: &[SalesRecord], measure: MeasureColumn) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|r| measure.value(r)).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// ============================================================================
// SALES INSIGHTS
// ============================================================================

/// The five outputs carried into reporting and charting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesInsights {
    pub by_product: Vec<GroupTotal>,
    pub by_region: Vec<GroupTotal>,
    pub by_salesperson: Vec<GroupTotal>,
    pub monthly: Vec<MonthlyTotal>,
    pub total_sales: f64,
    /// NaN when there are no records
    pub avg_transaction: f64,
    pub record_count: usize,
}

impl SalesInsights {
    pub fn compute(records: &[SalesRecord]) -> Self {
        let measure = MeasureColumn::TotalSales;

        SalesInsights {
            by_product: group_sum(records, GroupColumn::Product, measure),
            by_region: group_sum(records, GroupColumn::Region, measure),
            by_salesperson: group_sum(records, GroupColumn::Salesperson, measure),
            monthly: monthly_totals(records, measure),
            total_sales: total(records, measure),
            avg_transaction: mean(records, measure).unwrap_or(f64::NAN),
            record_count: records.len(),
        }
    }

    pub fn best_product(&self) -> Option<&str> {
        self.by_product.first().map(|g| g.key.as_str())
    }

    pub fn top_region(&self) -> Option<&str> {
        self.by_region.first().map(|g| g.key.as_str())
    }

    pub fn top_salesperson(&self) -> Option<&str> {
        self.by_salesperson.first().map(|g| g.key.as_str())
    }
}

// ============================================================================
// DESCRIPTIVE STATISTICS
// ============================================================================

/// count / mean / std / min / quartiles / max for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Returns `None` for an empty slice.
    /// `std` is the sample standard deviation (n - 1); NaN for a single value.
    pub fn describe(column: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        Some(ColumnStats {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }

    /// Rows without a value are skipped; `None` if no row has one
    pub fn for_measure(records: &[SalesRecord], measure: MeasureColumn) -> Option<Self> {
        let values: Vec<f64> = records.iter().filter_map(|r| measure.value(r)).collect();
        Self::describe(measure.name(), &values)
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Stats for each numeric column that has at least one value
pub fn describe_all(records: &[SalesRecord]) -> Vec<ColumnStats> {
    [
        MeasureColumn::Quantity,
        MeasureColumn::UnitPrice,
        MeasureColumn::TotalSales,
    ]
    .into_iter()
    .filter_map(|m| ColumnStats::for_measure(records, m))
    .collect()
}

// ============================================================================
// DATASET OVERVIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub product_count: usize,
    pub region_count: usize,
    pub salesperson_count: usize,
}

impl DatasetOverview {
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let distinct = |col: GroupColumn| {
            records
                .iter()
                .map(|r| col.key(r))
                .collect::<HashSet<_>>()
                .len()
        };

        DatasetOverview {
            record_count: records.len(),
            first_date: records.iter().map(|r| r.date).min(),
            last_date: records.iter().map(|r| r.date).max(),
            product_count: distinct(GroupColumn::Product),
            region_count: distinct(GroupColumn::Region),
            salesperson_count: distinct(GroupColumn::Salesperson),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
