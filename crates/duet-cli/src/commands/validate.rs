//! Validate command implementation

use anyhow::Result;
use duet_core::DuetConfig;

use super::{load, truncate};

pub async fn cmd_validate(config: &DuetConfig) -> Result<()> {
    let loaded = load(config).await?;
    let report = &loaded.report;

    println!();
    println!("🔍 Validation ({})", loaded.origin);
    println!("   Rows read: {}", report.total_rows());
    println!("   Accepted:  {}", report.records.len());
    println!("   Rejected:  {}", report.rejected.len());

    if report.rejected.is_empty() {
        println!("✅ Every row is valid");
        return Ok(());
    }

    println!();
    println!("   {:>5} │ {:10} │ {:30} │ Reason", "Row", "Field", "Description");
    println!("   ──────┼────────────┼────────────────────────────────┼───────────────────");
    for rejected in &report.rejected {
        // Header is line 1, so data row 0 is line 2
        println!(
            "   {:>5} │ {:10} │ {:30} │ {}",
            rejected.row + 2,
            rejected.error.field().as_str(),
            truncate(&rejected.raw.description, 30),
            rejected.error
        );
    }
    Ok(())
}
