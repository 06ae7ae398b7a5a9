//! Integration tests for duet-core
//!
//! These tests exercise the full load → validate → insights → report → render
//! workflow through the public API.

use duet_core::{
    insights::AttributionPolicy,
    load_records,
    report::{ChartId, MISSING_VALUE},
    source::parse_csv,
    Category, CsvFileSource, InsightOptions, JsonCache, JsonRenderer, LoadOrigin, MockSource,
    Payer, People, ReportAssembler, ValidationContext, YearMonth,
};

/// January and March 2024 for Alice and Bob, nothing in February, plus two
/// rows that fail validation
fn household_csv() -> &'static str {
    r#"description,amount,paid_by,category,date
Rent,1000,Alice,Rent,2024-01-01
Groceries,"$85.20",Shared,Groceries,2024-01-06
Cinema,24,Bob,Entertainment,01/12/2024
Refund,-10,Bob,Other,2024-01-13
Rent,1000,Alice,Rent,2024-03-01
Power bill,140.50,Shared,Utilities,03/09/2024
Bus pass,55,Bob,Transport,2024-03-20
Mystery,12,Carol,Other,2024-03-21
"#
}

fn ctx() -> ValidationContext {
    ValidationContext::new(People::new("Alice", "Bob"), 2024)
}

// =============================================================================
// Load and validate
// =============================================================================

#[tokio::test]
async fn test_csv_file_to_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    std::fs::write(&path, household_csv()).unwrap();

    let loaded = load_records(&CsvFileSource::new(&path), None, &ctx())
        .await
        .expect("load should succeed");

    assert_eq!(loaded.origin, LoadOrigin::Source("csv".into()));
    assert_eq!(loaded.report.total_rows(), 8);
    assert_eq!(loaded.report.records.len(), 6);
    assert_eq!(loaded.report.rejected.len(), 2);
    assert_eq!(loaded.report.rejected[0].error.field().as_str(), "amount");
    assert_eq!(loaded.report.rejected[1].error.field().as_str(), "paid_by");
}

#[tokio::test]
async fn test_cache_fallback_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cache = JsonCache::new(dir.path().join("cache.json"));
    let rows = parse_csv(household_csv().as_bytes()).unwrap();

    let fresh = load_records(&MockSource::new(rows), Some(&cache), &ctx())
        .await
        .unwrap();
    let cached = load_records(&MockSource::failing("sheet unreachable"), Some(&cache), &ctx())
        .await
        .unwrap();

    assert_eq!(cached.origin, LoadOrigin::Cache);
    assert_eq!(cached.report.records, fresh.report.records);
}

// =============================================================================
// Insights and reports
// =============================================================================

#[test]
fn test_reports_cover_every_month() {
    let rows = parse_csv(household_csv().as_bytes()).unwrap();
    let records = duet_core::ingest(&rows, &ctx()).records;
    let assembler = ReportAssembler::new(records, People::new("Alice", "Bob"), InsightOptions::default());

    let global = assembler.global();
    assert!((global.total_spending - 2304.70).abs() < 1e-9);
    assert_eq!(global.monthly_trend.len(), 3);
    assert_eq!(global.spending_by_person[&Payer::Shared], 85.20 + 140.50);
    assert_eq!(global.top_expenses[0].description, "Rent");
    assert_eq!(global.top_expenses[0].position, 0);
    assert_eq!(global.top_expenses[1].position, 3);

    let reports = assembler.build_all_monthly_reports();
    let periods: Vec<YearMonth> = reports.iter().map(|r| r.period).collect();
    assert_eq!(
        periods,
        vec![
            YearMonth::new(2024, 1).unwrap(),
            YearMonth::new(2024, 2).unwrap(),
            YearMonth::new(2024, 3).unwrap(),
        ]
    );

    let feb = &reports[1];
    assert_eq!(feb.summary.total, 0.0);
    assert_eq!(feb.insights.budget_insights.std_dev, 0.0);
    assert!(feb.category_table.iter().all(|r| r.percentage == 0.0));
    assert!(feb.budget_table.iter().all(|r| r.value == MISSING_VALUE));

    for report in reports.iter().filter(|r| !r.is_empty()) {
        let sum: f64 = report.category_table.iter().map(|r| r.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6, "{} sums to {}", report.period, sum);
    }

    let shares: f64 = reports.iter().map(|r| r.summary.share_of_global).sum();
    assert!((shares - 100.0).abs() < 1e-6);

    let trend = reports[2].chart(ChartId::TrendLine).unwrap();
    assert_eq!(trend.series[1].value, 0.0);
}

#[test]
fn test_split_evenly_keeps_totals() {
    let rows = parse_csv(household_csv().as_bytes()).unwrap();
    let records = duet_core::ingest(&rows, &ctx()).records;
    let options = InsightOptions {
        attribution: AttributionPolicy::SplitEvenly,
        top_n: 3,
    };
    let snapshot = duet_core::compute_insights(&records, &options);

    assert_eq!(snapshot.top_expenses.len(), 3);
    assert!(!snapshot.spending_by_person.contains_key(&Payer::Shared));
    let by_person: f64 = snapshot.spending_by_person.values().sum();
    let by_category: f64 = snapshot.spending_by_category.values().sum();
    assert!((by_person - snapshot.total_spending).abs() < 1e-9);
    assert!((by_category - snapshot.total_spending).abs() < 1e-9);
    assert_eq!(snapshot.spending_by_category[&Category::Rent], 2000.0);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_every_month_to_json() {
    let rows = parse_csv(household_csv().as_bytes()).unwrap();
    let records = duet_core::ingest(&rows, &ctx()).records;
    let reports =
        ReportAssembler::new(records, People::new("Alice", "Bob"), InsightOptions::default())
            .build_all_monthly_reports();

    let dir = tempfile::tempdir().unwrap();
    let renderer = JsonRenderer::new(dir.path());
    let artifacts = duet_core::render_all(&[&renderer], &reports).unwrap();

    let names: Vec<String> = artifacts
        .iter()
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "expense_report_2024_01.json",
            "expense_report_2024_02.json",
            "expense_report_2024_03.json",
        ]
    );

    let feb: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&artifacts[1].path).unwrap()).unwrap();
    assert_eq!(feb["title"], "Expense Report - February 2024");
    assert_eq!(feb["summary"]["transaction_count"], 0);
}
