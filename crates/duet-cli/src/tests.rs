//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::{Path, PathBuf};

use duet_core::test_utils::{sample_csv, sample_people};
use duet_core::{AttributionPolicy, DuetConfig, SourceConfig};

use crate::commands::{self, truncate, Overrides};

/// Config pointing at a CSV in `dir`, with cache and output under `dir`
fn setup_config(dir: &Path) -> DuetConfig {
    let csv = dir.join("expenses.csv");
    std::fs::write(&csv, sample_csv()).unwrap();

    DuetConfig {
        people: sample_people(),
        source: SourceConfig {
            csv_path: Some(csv),
            sheet_url: None,
            cache_path: Some(dir.join("cache.json")),
        },
        output_dir: dir.join("out"),
        ..DuetConfig::default()
    }
}

fn config_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("duet.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

// ========== Config Tests ==========

#[test]
fn test_resolve_config_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_file(
        dir.path(),
        "[source]\nsheet_url = \"https://docs.google.com/spreadsheets/d/abc/edit\"\n",
    );

    let config = commands::resolve_config(
        Some(&path),
        Overrides {
            csv: Some(PathBuf::from("local.csv")),
            attribution: Some("split-evenly".into()),
            top: Some(2),
            out: Some(PathBuf::from("reports")),
            ..Overrides::default()
        },
    )
    .unwrap();

    assert_eq!(config.source.csv_path, Some(PathBuf::from("local.csv")));
    assert_eq!(config.source.sheet_url, None);
    assert_eq!(config.insights.attribution, AttributionPolicy::SplitEvenly);
    assert_eq!(config.insights.top_n, 2);
    assert_eq!(config.output_dir, PathBuf::from("reports"));
}

#[test]
fn test_resolve_config_bad_attribution() {
    let dir = tempfile::tempdir().unwrap();
    let path = config_file(dir.path(), "");
    let result = commands::resolve_config(
        Some(&path),
        Overrides {
            attribution: Some("thirds".into()),
            ..Overrides::default()
        },
    );
    assert!(result.is_err());
}

#[test]
fn test_build_source_requires_a_source() {
    let config = DuetConfig::default();
    assert!(commands::build_source(&config).is_err());

    let mut config = DuetConfig::default();
    config.source.sheet_url = Some("https://docs.google.com/spreadsheets/d/abc/edit".into());
    assert_eq!(commands::build_source(&config).unwrap().name(), "sheet");

    config.source.csv_path = Some(PathBuf::from("x.csv"));
    assert_eq!(commands::build_source(&config).unwrap().name(), "csv");

    config.source.csv_path = None;
    config.source.sheet_url = Some("https://example.com/not-a-sheet".into());
    assert!(commands::build_source(&config).is_err());
}

// ========== Load Tests ==========

#[tokio::test]
async fn test_load_writes_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());

    let loaded = commands::load(&config).await.unwrap();
    assert_eq!(loaded.report.records.len(), 6);
    assert_eq!(loaded.report.rejected.len(), 1);
    assert!(dir.path().join("cache.json").exists());
}

#[tokio::test]
async fn test_load_with_no_valid_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup_config(dir.path());
    let csv = dir.path().join("bad.csv");
    std::fs::write(&csv, "description,amount,paid_by,category,date
Refund,-10,Bob,Other,2024-01-13
")
        .unwrap();
    config.source.csv_path = Some(csv);

    let loaded = commands::load(&config).await.unwrap();
    assert!(loaded.report.records.is_empty());
    assert_eq!(loaded.report.rejected.len(), 1);
    assert!(!dir.path().join("cache.json").exists());
}

#[tokio::test]
async fn test_load_falls_back_to_cache() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup_config(dir.path());
    commands::load(&config).await.unwrap();

    config.source.csv_path = Some(dir.path().join("deleted.csv"));
    let loaded = commands::load(&config).await.unwrap();
    assert_eq!(loaded.origin, duet_core::LoadOrigin::Cache);
    assert_eq!(loaded.report.records.len(), 6);
}

// ========== Command Tests ==========

#[tokio::test]
async fn test_cmd_validate() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());
    assert!(commands::cmd_validate(&config).await.is_ok());
}

#[tokio::test]
async fn test_cmd_insights() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());
    assert!(commands::cmd_insights(&config, None, None).await.is_ok());
    assert!(commands::cmd_insights(&config, Some("2024-03-01"), Some("2024-03-31"))
        .await
        .is_ok());
    // Nothing in range still succeeds
    assert!(commands::cmd_insights(&config, Some("2030-01-01"), None).await.is_ok());
}

#[tokio::test]
async fn test_cmd_insights_bad_dates() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());
    assert!(commands::cmd_insights(&config, Some("03/01/2024"), None).await.is_err());
    assert!(commands::cmd_insights(&config, Some("2024-03-31"), Some("2024-03-01"))
        .await
        .is_err());
}

#[tokio::test]
async fn test_cmd_report_all() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());

    commands::cmd_report(&config, None, true, &["json".into(), "csv".into()])
        .await
        .unwrap();

    let out = dir.path().join("out");
    for month in ["01", "02", "03"] {
        assert!(out.join(format!("expense_report_2024_{}.json", month)).exists());
        assert!(out.join(format!("expense_report_2024_{}.csv", month)).exists());
    }
}

#[tokio::test]
async fn test_cmd_report_single_month() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());

    commands::cmd_report(&config, Some("2024-02"), false, &["json".into()])
        .await
        .unwrap();

    let out = dir.path().join("out");
    assert!(out.join("expense_report_2024_02.json").exists());
    assert!(!out.join("expense_report_2024_01.json").exists());
}

#[tokio::test]
async fn test_cmd_report_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_config(dir.path());

    assert!(commands::cmd_report(&config, Some("2024-13"), false, &[]).await.is_err());
    assert!(commands::cmd_report(&config, None, false, &[]).await.is_err());
    assert!(commands::cmd_report(&config, None, true, &["pdf".into()]).await.is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer description", 10), "a much ...");
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
}

#[test]
fn test_parse_date_arg() {
    assert!(commands::parse_date_arg(None, "from").unwrap().is_none());
    assert!(commands::parse_date_arg(Some("2024-02-29"), "from").unwrap().is_some());
    assert!(commands::parse_date_arg(Some("2023-02-29"), "to").is_err());
}
