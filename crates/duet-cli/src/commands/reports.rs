//! Report command implementations

use anyhow::{bail, Context, Result};
use duet_core::report::MonthlyReportModel;
use duet_core::{
    render_all, CsvTableRenderer, DuetConfig, JsonRenderer, ReportAssembler, ReportRenderer,
    YearMonth,
};

use super::load;

/// Build renderers for the requested formats
pub fn renderers_for(config: &DuetConfig, formats: &[String]) -> Result<Vec<Box<dyn ReportRenderer>>> {
    let mut renderers: Vec<Box<dyn ReportRenderer>> = Vec::new();
    for format in formats {
        match format.to_lowercase().as_str() {
            "json" => renderers.push(Box::new(JsonRenderer::new(&config.output_dir))),
            "csv" => renderers.push(Box::new(CsvTableRenderer::new(&config.output_dir))),
            other => bail!("Unknown format: {} (valid: json, csv)", other),
        }
    }
    if renderers.is_empty() {
        renderers.push(Box::new(JsonRenderer::new(&config.output_dir)));
    }
    Ok(renderers)
}

pub async fn cmd_report(
    config: &DuetConfig,
    month: Option<&str>,
    all: bool,
    formats: &[String],
) -> Result<()> {
    let month = month
        .map(|m| m.parse::<YearMonth>())
        .transpose()
        .context("Invalid --month (use YYYY-MM)")?;
    let renderers = renderers_for(config, formats)?;

    let loaded = load(config).await?;
    let assembler = ReportAssembler::new(
        loaded.report.records,
        config.people.clone(),
        config.insights,
    );

    let reports = match (month, all) {
        (Some(month), _) => vec![assembler.build_monthly_report(month)],
        (None, true) => assembler.build_all_monthly_reports(),
        (None, false) => bail!("Specify --month YYYY-MM or --all"),
    };

    if reports.is_empty() {
        println!("No months to report on.");
        return Ok(());
    }

    let renderer_refs: Vec<&dyn ReportRenderer> = renderers.iter().map(|r| r.as_ref()).collect();
    let artifacts = render_all(&renderer_refs, &reports).context("Failed to write reports")?;

    println!();
    println!("📄 Monthly Reports ({})", loaded.origin);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:8} │ {:>10} │ {:>5} │ {:>10} │ {:>6}",
        "Month", "Total", "Count", "Average", "Share"
    );
    println!("   ─────────┼────────────┼───────┼────────────┼────────");
    for report in &reports {
        print_report_row(report);
    }

    println!();
    println!("✅ Wrote {} files to {}", artifacts.len(), config.output_dir.display());
    Ok(())
}

fn print_report_row(report: &MonthlyReportModel) {
    let summary = &report.summary;
    println!(
        "   {:8} │ {:>10.2} │ {:>5} │ {:>10.2} │ {:>5.1}%",
        report.period.to_string(),
        summary.total,
        summary.transaction_count,
        summary.average_per_transaction,
        summary.share_of_global
    );
}
