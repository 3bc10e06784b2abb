// 🎲 Sample Data Generator
// Used when no input CSV exists: 1000 reproducible synthetic sales rows.

use crate::dataset::{write_csv, SalesRecord};
use anyhow::{ensure, Result};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// CONFIG
// ============================================================================

/// Shape of the synthetic dataset. The seed is explicit so two generators
/// with the same config always produce the same rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    pub start_date: NaiveDate,
    /// Dates are drawn from `start_date + [0, span_days)`
    pub span_days: u32,
    pub products: Vec<String>,
    pub regions: Vec<String>,
    pub salespeople: Vec<String>,
    pub min_quantity: u32,
    pub max_quantity: u32,
    pub min_unit_price: f64,
    pub max_unit_price: f64,
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SampleConfig {
    fn default() -> Self {
        SampleConfig {
            rows: 1000,
            seed: 42,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            span_days: 365,
            products: labels(&[
                "Laptop",
                "Mouse",
                "Keyboard",
                "Monitor",
                "Headphones",
                "Webcam",
                "USB Cable",
                "Hard Drive",
            ]),
            regions: labels(&["North", "South", "East", "West"]),
            salespeople: labels(&["Alice", "Bob", "Charlie", "Diana", "Eve", "Frank"]),
            min_quantity: 1,
            max_quantity: 10,
            min_unit_price: 50.0,
            max_unit_price: 2000.0,
        }
    }
}

impl SampleConfig {
    fn validate(&self) -> Result<()> {
        ensure!(self.span_days > 0, "span_days must be at least 1");
        ensure!(!self.products.is_empty(), "products must not be empty");
        ensure!(!self.regions.is_empty(), "regions must not be empty");
        ensure!(!self.salespeople.is_empty(), "salespeople must not be empty");
        ensure!(
            self.min_quantity >= 1 && self.min_quantity <= self.max_quantity,
            "quantity range {}..={} is invalid",
            self.min_quantity,
            self.max_quantity
        );
        ensure!(
            self.min_unit_price >= 0.0 && self.min_unit_price < self.max_unit_price,
            "unit price range {}..{} is invalid",
            self.min_unit_price,
            self.max_unit_price
        );
        Ok(())
    }
}

// ============================================================================
// GENERATION
// ============================================================================

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate `config.rows` records from a freshly seeded RNG.
///
/// Unit price is rounded before the total is derived, so the stored columns
/// satisfy `Total_Sales == round2(Quantity * Unit_Price)` exactly.
pub fn generate(config: &SampleConfig) -> Result<Vec<SalesRecord>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.rows);

    for _ in 0..config.rows {
        records.push(generate_record(&mut rng, config));
    }

    Ok(records)
}

fn generate_record(rng: &mut StdRng, config: &SampleConfig) -> SalesRecord {
    let offset = rng.gen_range(0..config.span_days);
    let date = config.start_date + Duration::days(offset as i64);

    // validate() guarantees non-empty label sets
    let pick = |rng: &mut StdRng, items: &[String]| items.choose(rng).cloned().unwrap_or_default();
    let product = pick(rng, &config.products);
    let region = pick(rng, &config.regions);
    let salesperson = pick(rng, &config.salespeople);

    let quantity = rng.gen_range(config.min_quantity..=config.max_quantity);
    let unit_price = round2(rng.gen_range(config.min_unit_price..config.max_unit_price));
    let total_sales = round2(quantity as f64 * unit_price);

    SalesRecord {
        date,
        product,
        region,
        salesperson,
        quantity: Some(quantity),
        unit_price: Some(unit_price),
        total_sales,
    }
}

/// Generate and persist the sample dataset at `path`
pub fn write_sample(path: &Path, config: &SampleConfig) -> Result<usize> {
    let records = generate(config)?;
    write_csv(path, &records)?;
    Ok(records.len())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_csv, write_records};
    use std::fs;

    #[test]
    fn test_default_shape() {
        let config = SampleConfig::default();
        let records = generate(&config).unwrap();

        assert_eq!(records.len(), 1000);
        assert_eq!(config.products.len(), 8);
        assert_eq!(config.regions.len(), 4);
        assert_eq!(config.salespeople.len(), 6);
    }

    #[test]
    fn test_values_within_ranges() {
        let config = SampleConfig::default();
        let end = config.start_date + Duration::days(config.span_days as i64);

        for r in generate(&config).unwrap() {
            assert!(r.date >= config.start_date && r.date < end);
            assert!(config.products.contains(&r.product));
            assert!(config.regions.contains(&r.region));
            assert!(config.salespeople.contains(&r.salesperson));
            let quantity = r.quantity.unwrap();
            let unit_price = r.unit_price.unwrap();
            assert!((1..=10).contains(&quantity));
            assert!(unit_price >= 50.0 && unit_price <= 2000.0);
            assert!(r.total_sales >= 0.0);
        }
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        let config = SampleConfig::default();

        let mut a = Vec::new();
        let mut b = Vec::new();
        write_records(&mut a, &generate(&config).unwrap()).unwrap();
        write_records(&mut b, &generate(&config).unwrap()).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_differs() {
        let a = generate(&SampleConfig::default()).unwrap();
        let b = generate(&SampleConfig {
            seed: 7,
            ..SampleConfig::default()
        })
        .unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_total_is_rounded_product_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");

        write_sample(&path, &SampleConfig::default()).unwrap();
        let records = load_csv(&path).unwrap();

        assert_eq!(records.len(), 1000);
        for r in &records {
            let unit_price = r.unit_price.unwrap();
            assert_eq!(r.total_sales, round2(r.quantity.unwrap() as f64 * unit_price));
            assert_eq!(unit_price, round2(unit_price));
        }
    }

    #[test]
    fn test_written_file_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");

        write_sample(&first, &SampleConfig::default()).unwrap();
        write_sample(&second, &SampleConfig::default()).unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let empty_products = SampleConfig {
            products: vec![],
            ..SampleConfig::default()
        };
        assert!(generate(&empty_products).is_err());

        let bad_qty = SampleConfig {
            min_quantity: 5,
            max_quantity: 2,
            ..SampleConfig::default()
        };
        assert!(generate(&bad_qty).is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.235_000_1), 1.24);
        assert_eq!(round2(10.0), 10.0);
    }
}
