//! Renderers: report models to files
//!
//! - `ReportRenderer` trait defines the interface for output formats
//! - `JsonRenderer` writes the whole model as pretty JSON
//! - `CsvTableRenderer` writes the category, person and distribution tables
//!   as one flat CSV
//!
//! File naming: `<dir>/expense_report_YYYY_MM.<ext>`

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::report::MonthlyReportModel;

/// A file produced by a renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifact {
    /// Renderer that produced it
    pub kind: String,
    pub path: PathBuf,
}

/// Trait for report output formats
pub trait ReportRenderer: Send + Sync {
    fn name(&self) -> &str;

    /// Render one report, returning the files written
    fn render(&self, report: &MonthlyReportModel) -> Result<Vec<RenderedArtifact>>;
}

/// Render every report with every renderer, stopping at the first failure
pub fn render_all(
    renderers: &[&dyn ReportRenderer],
    reports: &[MonthlyReportModel],
) -> Result<Vec<RenderedArtifact>> {
    let mut artifacts = Vec::new();
    for report in reports {
        for renderer in renderers {
            for artifact in renderer.render(report)? {
                info!(
                    renderer = renderer.name(),
                    month = %report.period,
                    path = %artifact.path.display(),
                    "Rendered report"
                );
                artifacts.push(artifact);
            }
        }
    }
    Ok(artifacts)
}

fn prepare_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Render(format!("Cannot create output directory {}: {}", dir.display(), e))
    })
}

/// Writes `<dir>/<file_stem>.json`
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    output_dir: PathBuf,
}

impl JsonRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ReportRenderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn render(&self, report: &MonthlyReportModel) -> Result<Vec<RenderedArtifact>> {
        prepare_dir(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.json", report.file_stem));
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&path, json)?;
        Ok(vec![RenderedArtifact {
            kind: self.name().to_string(),
            path,
        }])
    }
}

/// Writes `<dir>/<file_stem>.csv` with columns
/// `table,label,amount,percentage,count`
#[derive(Debug, Clone)]
pub struct CsvTableRenderer {
    output_dir: PathBuf,
}

impl CsvTableRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    table: &'a str,
    label: &'a str,
    amount: Option<f64>,
    percentage: f64,
    count: usize,
}

impl ReportRenderer for CsvTableRenderer {
    fn name(&self) -> &str {
        "csv"
    }

    fn render(&self, report: &MonthlyReportModel) -> Result<Vec<RenderedArtifact>> {
        prepare_dir(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.csv", report.file_stem));
        let mut writer = csv::Writer::from_path(&path)?;

        let tables = [("category", &report.category_table), ("person", &report.person_table)];
        for (table, rows) in tables {
            for row in rows {
                writer.serialize(CsvRow {
                    table,
                    label: &row.label,
                    amount: Some(row.amount),
                    percentage: row.percentage,
                    count: row.transaction_count,
                })?;
            }
        }
        for row in &report.distribution_table {
            writer.serialize(CsvRow {
                table: "distribution",
                label: &row.label,
                amount: None,
                percentage: row.percentage,
                count: row.count,
            })?;
        }
        writer.flush()?;

        Ok(vec![RenderedArtifact {
            kind: self.name().to_string(),
            path,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::InsightOptions;
    use crate::models::{Category, Payer, YearMonth};
    use crate::report::ReportAssembler;
    use crate::test_utils::{record, sample_people};

    fn reports() -> Vec<MonthlyReportModel> {
        let records = vec![
            record("Rent", 1000.0, Payer::PersonA, Category::Rent, "2024-03-01"),
            record("Groceries", 200.0, Payer::Shared, Category::Groceries, "2024-03-15"),
        ];
        ReportAssembler::new(records, sample_people(), InsightOptions::default())
            .build_all_monthly_reports()
    }

    #[test]
    fn test_json_renderer_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = JsonRenderer::new(dir.path().join("out"));
        let artifacts = renderer.render(&reports()[0]).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].kind, "json");
        assert!(artifacts[0].path.ends_with("expense_report_2024_03.json"));

        let contents = std::fs::read_to_string(&artifacts[0].path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["title"], "Expense Report - March 2024");
        assert_eq!(value["summary"]["total"], 1200.0);
        assert_eq!(value["period"]["month"], 3);
    }

    #[test]
    fn test_csv_renderer_rows() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CsvTableRenderer::new(dir.path());
        let artifacts = renderer.render(&reports()[0]).unwrap();

        let contents = std::fs::read_to_string(&artifacts[0].path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "table,label,amount,percentage,count");
        assert!(lines[1].starts_with("category,Rent,1000.0,"));
        // 2 categories, 2 people, 5 buckets
        assert_eq!(lines.len(), 1 + 2 + 2 + 5);
    }

    #[test]
    fn test_render_all() {
        let dir = tempfile::tempdir().unwrap();
        let json = JsonRenderer::new(dir.path());
        let csv = CsvTableRenderer::new(dir.path());
        let artifacts = render_all(&[&json, &csv], &reports()).unwrap();
        assert_eq!(artifacts.len(), 2);
        assert!(artifacts.iter().all(|a| a.path.exists()));
        let month = YearMonth::new(2024, 3).unwrap();
        assert!(artifacts[0].path.to_string_lossy().contains(&format!(
            "expense_report_{}_{:02}",
            month.year(),
            month.month()
        )));
    }
}
