use anyhow::Result;
use tracing_subscriber::EnvFilter;

use sales_insights::{run, AnalysisConfig, DataOrigin};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    println!("📊 Starting Sales Data Analysis...");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = AnalysisConfig::default();
    let outcome = run(&config)?;

    if outcome.origin == DataOrigin::Generated {
        println!("\n🎲 Sample data created and saved to {:?}", config.data_path);
    }

    println!("\n{}", outcome.console_report);

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Charts saved to {:?}", outcome.chart_path);
    println!("✓ Summary saved to {:?}", outcome.summary_path);
    println!("\n✅ Analysis complete (v{})", sales_insights::VERSION);

    Ok(())
}
