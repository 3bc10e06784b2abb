// 📈 Sales Dashboard - 2x2 PNG rendered with plotters
//
// ┌──────────────────────┬──────────────────────┐
// │ Sales by Product     │ Region share (pie)   │
// ├──────────────────────┼──────────────────────┤
// │ Sales by Salesperson │ Monthly trend (line) │
// └──────────────────────┴──────────────────────┘

use crate::aggregation::{GroupTotal, MonthlyTotal, SalesInsights};
use anyhow::{ensure, Context, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// ============================================================================
// STYLE
// ============================================================================

/// Everything visual about the dashboard. Passed explicitly into
/// [`render_dashboard`]; nothing is read from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub font_family: String,
    pub title_font_size: f64,
    pub caption_font_size: f64,
    pub label_font_size: f64,
    pub product_color: [u8; 3],
    pub salesperson_color: [u8; 3],
    pub trend_color: [u8; 3],
    /// Cycled through for pie slices
    pub palette: Vec<[u8; 3]>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            width: 1500,
            height: 1000,
            title: "Sales Data Analysis Dashboard".to_string(),
            font_family: "sans-serif".to_string(),
            title_font_size: 32.0,
            caption_font_size: 22.0,
            label_font_size: 14.0,
            product_color: [135, 206, 235],     // skyblue
            salesperson_color: [144, 238, 144], // lightgreen
            trend_color: [255, 127, 80],        // coral
            palette: vec![
                [76, 114, 176],
                [221, 132, 82],
                [85, 168, 104],
                [196, 78, 82],
                [129, 114, 179],
                [147, 120, 96],
            ],
        }
    }
}

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

impl ChartStyle {
    fn font(&self, size: f64) -> FontDesc<'_> {
        (self.font_family.as_str(), size).into_font()
    }

    fn slice_color(&self, i: usize) -> RGBColor {
        if self.palette.is_empty() {
            return rgb(self.product_color);
        }
        rgb(self.palette[i % self.palette.len()])
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Render the four panels from `insights` into a PNG at `path`
pub fn render_dashboard(path: &Path, insights: &SalesInsights, style: &ChartStyle) -> Result<()> {
    ensure!(
        style.width >= 200 && style.height >= 200,
        "chart size {}x{} is too small",
        style.width,
        style.height
    );

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let root = root.titled(&style.title, style.font(style.title_font_size))?;
    let panels = root.split_evenly((2, 2));

    draw_bar_panel(
        &panels[0],
        "Total Sales by Product",
        "Product",
        &insights.by_product,
        rgb(style.product_color),
        style,
    )?;
    draw_pie_panel(
        &panels[1],
        "Sales Distribution by Region",
        &region_shares(insights),
        style,
    )?;
    draw_bar_panel(
        &panels[2],
        "Total Sales by Salesperson",
        "Salesperson",
        &insights.by_salesperson,
        rgb(style.salesperson_color),
        style,
    )?;
    draw_trend_panel(&panels[3], "Monthly Sales Trend", &insights.monthly, style)?;

    root.present()
        .with_context(|| format!("Failed to save chart: {:?}", path))?;
    Ok(())
}

/// Pie slices go in key order, not ranking order
fn region_shares(insights: &SalesInsights) -> Vec<GroupTotal> {
    let mut shares = insights.by_region.clone();
    shares.sort_by(|a, b| a.key.cmp(&b.key));
    shares
}

/// Upper bound for a y axis starting at zero
fn axis_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn segment_label<S: AsRef<str>>(value: &SegmentValue<usize>, labels: &[S]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
            .get(*i)
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

// ============================================================================
// PANELS
// ============================================================================

fn draw_bar_panel(
    area: &Panel<'_>,
    title: &str,
    x_desc: &str,
    totals: &[GroupTotal],
    color: RGBColor,
    style: &ChartStyle,
) -> Result<()> {
    let labels: Vec<&str> = totals.iter().map(|g| g.key.as_str()).collect();
    let n = totals.len().max(1);
    let y_max = axis_max(totals.iter().map(|g| g.total));

    // integer ranges are inclusive on both ends in plotters
    let mut chart = ChartBuilder::on(area)
        .caption(title, style.font(style.caption_font_size))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n - 1).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(x_desc)
        .y_desc("Total Sales ($)")
        .label_style(style.font(style.label_font_size))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(8)
            .data(totals.iter().enumerate().map(|(i, g)| (i, g.total))),
    )?;

    Ok(())
}

fn draw_pie_panel(
    area: &Panel<'_>,
    title: &str,
    shares: &[GroupTotal],
    style: &ChartStyle,
) -> Result<()> {
    let area = area.titled(title, style.font(style.caption_font_size))?;

    // Nothing sensible to draw for an empty or all-zero collection
    if shares.iter().all(|g| g.total <= 0.0) {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = ((w / 2) as i32, (h / 2) as i32);
    let radius = w.min(h) as f64 * 0.35;

    let sizes: Vec<f64> = shares.iter().map(|g| g.total.max(0.0)).collect();
    let colors: Vec<RGBColor> = (0..shares.len()).map(|i| style.slice_color(i)).collect();
    let labels: Vec<&str> = shares.iter().map(|g| g.key.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(90.0);
    pie.label_style(style.font(style.label_font_size).color(&BLACK));
    pie.percentages(style.font(style.label_font_size).color(&WHITE));

    area.draw(&pie)?;
    Ok(())
}

fn draw_trend_panel(
    area: &Panel<'_>,
    title: &str,
    monthly: &[MonthlyTotal],
    style: &ChartStyle,
) -> Result<()> {
    let labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
    let n = monthly.len().max(1);
    let y_max = axis_max(monthly.iter().map(|m| m.total));
    let color = rgb(style.trend_color);

    let mut chart = ChartBuilder::on(area)
        .caption(title, style.font(style.caption_font_size))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n - 1).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc("Month")
        .y_desc("Total Sales ($)")
        .label_style(style.font(style.label_font_size))
        .draw()?;

    let points: Vec<(SegmentValue<usize>, f64)> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (SegmentValue::CenterOf(i), m.total))
        .collect();

    chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?;
    chart.draw_series(
        points
            .into_iter()
            .map(|p| Circle::new(p, 4, color.filled())),
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::YearMonth;

    fn create_test_insights() -> SalesInsights {
        SalesInsights {
            by_product: vec![
                GroupTotal { key: "Laptop".into(), total: 5000.0 },
                GroupTotal { key: "Mouse".into(), total: 250.0 },
            ],
            by_region: vec![
                GroupTotal { key: "West".into(), total: 3000.0 },
                GroupTotal { key: "East".into(), total: 2250.0 },
            ],
            by_salesperson: vec![
                GroupTotal { key: "Eve".into(), total: 4000.0 },
                GroupTotal { key: "Bob".into(), total: 1250.0 },
            ],
            monthly: vec![
                MonthlyTotal { month: YearMonth::new(2023, 1), total: 2000.0 },
                MonthlyTotal { month: YearMonth::new(2023, 2), total: 3250.0 },
            ],
            total_sales: 5250.0,
            avg_transaction: 1312.5,
            record_count: 4,
        }
    }

    #[test]
    fn test_default_build_has_font_backend() {
        // plotters panics on text drawing without one
        assert!(cfg!(feature = "fonts"));
    }

    #[test]
    fn test_render_dashboard_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.png");

        render_dashboard(&path, &create_test_insights(), &ChartStyle::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_render_dashboard_empty_insights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        render_dashboard(&path, &SalesInsights::compute(&[]), &ChartStyle::default()).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_dashboard_rejects_tiny_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let style = ChartStyle {
            width: 10,
            height: 10,
            ..ChartStyle::default()
        };

        assert!(render_dashboard(&dir.path().join("tiny.png"), &create_test_insights(), &style).is_err());
    }

    #[test]
    fn test_region_shares_sorted_by_key() {
        let keys: Vec<String> = region_shares(&create_test_insights())
            .into_iter()
            .map(|g| g.key)
            .collect();
        assert_eq!(keys, vec!["East", "West"]);
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(vec![]), 1.0);
        assert_eq!(axis_max(vec![0.0, 0.0]), 1.0);
        assert!((axis_max(vec![10.0, 100.0]) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_segment_label() {
        let labels = ["Laptop", "Mouse"];
        assert_eq!(segment_label(&SegmentValue::CenterOf(1), &labels), "Mouse");
        assert_eq!(segment_label(&SegmentValue::CenterOf(5), &labels), "");
        assert_eq!(segment_label(&SegmentValue::Last, &labels), "");
    }
}
