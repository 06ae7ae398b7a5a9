//! Report assembler: records to per-month report models

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::insights::{compute_insights, percentage, GroupStats, InsightOptions, InsightsSnapshot};
use crate::models::{weekday_name, ExpenseRecord, People, YearMonth};

use super::types::{
    ChartId, ChartKind, ChartSpec, DataPoint, DistributionRow, MetricRow, MonthlyReportModel,
    SummaryBlock, TableRow,
};

/// Placeholder for a statistic that has no value (empty month)
pub const MISSING_VALUE: &str = "-";

/// Builds monthly reports over one validated record set.
///
/// The global snapshot is computed once on construction and shared by every
/// report it builds.
pub struct ReportAssembler {
    records: Vec<ExpenseRecord>,
    people: People,
    options: InsightOptions,
    global: Arc<InsightsSnapshot>,
}

impl ReportAssembler {
    pub fn new(records: Vec<ExpenseRecord>, people: People, options: InsightOptions) -> Self {
        let global = Arc::new(compute_insights(&records, &options));
        Self {
            records,
            people,
            options,
            global,
        }
    }

    pub fn global(&self) -> &Arc<InsightsSnapshot> {
        &self.global
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// Every month from the first to the last record month
    pub fn months(&self) -> Vec<YearMonth> {
        self.global
            .monthly_trend
            .iter()
            .map(|point| point.month)
            .collect()
    }

    /// Build the report for one month. A month without records still gets a
    /// full model with zero totals.
    pub fn build_monthly_report(&self, month: YearMonth) -> MonthlyReportModel {
        let month_records: Vec<ExpenseRecord> = self
            .records
            .iter()
            .filter(|r| month.contains(r.date()))
            .cloned()
            .collect();
        let insights = compute_insights(&month_records, &self.options);

        debug!(
            month = %month,
            records = month_records.len(),
            "Assembling monthly report"
        );

        MonthlyReportModel {
            period: month,
            title: format!("Expense Report - {} {}", month.month_name(), month.year()),
            file_stem: format!("expense_report_{}_{:02}", month.year(), month.month()),
            summary: self.summary(&insights),
            category_table: table(&insights.patterns.category_breakdown, |c| {
                c.as_str().to_string()
            }),
            person_table: table(&insights.patterns.person_breakdown, |p| {
                self.people.label(*p).to_string()
            }),
            distribution_table: distribution_table(&insights),
            budget_table: budget_table(&insights),
            charts: Vec::new(),
            insights,
            global: Arc::clone(&self.global),
        }
        .with_charts()
    }

    /// One report per month of the dataset span, in chronological order.
    ///
    /// Months are independent, so they are built in parallel.
    pub fn build_all_monthly_reports(&self) -> Vec<MonthlyReportModel> {
        let months = self.months();
        let reports: Vec<MonthlyReportModel> = months
            .par_iter()
            .map(|&month| self.build_monthly_report(month))
            .collect();

        info!(months = reports.len(), "Built monthly reports");
        reports
    }

    fn summary(&self, insights: &InsightsSnapshot) -> SummaryBlock {
        SummaryBlock {
            total: insights.total_spending,
            transaction_count: insights.transaction_count,
            average_per_transaction: insights.patterns.average_expense,
            share_of_global: percentage(insights.total_spending, self.global.total_spending),
        }
    }
}

/// Table rows ordered by amount descending, ties by label
fn table<K>(groups: &[GroupStats<K>], label: impl Fn(&K) -> String) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = groups
        .iter()
        .map(|g| TableRow {
            label: label(&g.key),
            amount: g.total,
            percentage: g.percentage,
            transaction_count: g.count,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.label.cmp(&b.label))
    });
    rows
}

fn distribution_table(insights: &InsightsSnapshot) -> Vec<DistributionRow> {
    let count = insights.transaction_count as f64;
    insights
        .budget_insights
        .distribution
        .iter()
        .map(|b| DistributionRow {
            label: b.bucket.label().to_string(),
            count: b.count,
            percentage: percentage(b.count as f64, count),
        })
        .collect()
}

fn budget_table(insights: &InsightsSnapshot) -> Vec<MetricRow> {
    let budget = &insights.budget_insights;
    let amount = |value: f64| {
        if insights.is_empty() {
            MISSING_VALUE.to_string()
        } else {
            format!("{:.2}", value)
        }
    };

    let rows = [
        ("Highest single expense", amount(budget.highest_single_expense)),
        ("Lowest single expense", amount(budget.lowest_single_expense)),
        ("Expense range", amount(budget.expense_range)),
        ("Standard deviation", amount(budget.std_dev)),
        (
            "Most common category",
            budget
                .most_common_category
                .map_or_else(|| MISSING_VALUE.to_string(), |c| c.as_str().to_string()),
        ),
        (
            "Most common day",
            budget
                .most_common_day
                .map_or_else(|| MISSING_VALUE.to_string(), |d| weekday_name(d).to_string()),
        ),
    ];

    rows.into_iter()
        .map(|(metric, value)| MetricRow {
            metric: metric.to_string(),
            value,
        })
        .collect()
}

impl MonthlyReportModel {
    fn with_charts(mut self) -> Self {
        fn points(rows: &[TableRow]) -> Vec<DataPoint> {
            rows.iter()
                .map(|r| DataPoint {
                    label: r.label.clone(),
                    value: r.amount,
                })
                .collect()
        }

        self.charts = vec![
            ChartSpec {
                id: ChartId::CategoryPie,
                kind: ChartKind::Pie,
                title: "Spending by Category".to_string(),
                x_label: None,
                y_label: None,
                series: points(&self.category_table),
            },
            ChartSpec {
                id: ChartId::PersonBar,
                kind: ChartKind::Bar,
                title: "Spending by Person".to_string(),
                x_label: Some("Person".to_string()),
                y_label: Some("Amount".to_string()),
                series: points(&self.person_table),
            },
            ChartSpec {
                id: ChartId::DistributionBar,
                kind: ChartKind::Bar,
                title: "Expense Distribution".to_string(),
                x_label: Some("Amount range".to_string()),
                y_label: Some("Number of expenses".to_string()),
                series: self
                    .distribution_table
                    .iter()
                    .map(|r| DataPoint {
                        label: r.label.clone(),
                        value: r.count as f64,
                    })
                    .collect(),
            },
            ChartSpec {
                id: ChartId::TrendLine,
                kind: ChartKind::Line,
                title: "Monthly Spending Trend".to_string(),
                x_label: Some("Month".to_string()),
                y_label: Some("Amount".to_string()),
                series: self
                    .global
                    .monthly_trend
                    .iter()
                    .map(|p| DataPoint {
                        label: p.month.to_string(),
                        value: p.amount,
                    })
                    .collect(),
            },
        ];
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::AttributionPolicy;
    use crate::models::{Category, Payer};
    use crate::test_utils::{record, sample_people};

    fn assembler(records: Vec<ExpenseRecord>) -> ReportAssembler {
        ReportAssembler::new(records, sample_people(), InsightOptions::default())
    }

    fn jan_and_mar() -> Vec<ExpenseRecord> {
        vec![
            record("Rent", 1000.0, Payer::PersonA, Category::Rent, "2024-01-01"),
            record("Groceries", 200.0, Payer::Shared, Category::Groceries, "2024-01-15"),
            record("Cinema", 40.0, Payer::PersonB, Category::Entertainment, "2024-03-09"),
        ]
    }

    #[test]
    fn test_all_reports_include_empty_month() {
        let reports = assembler(jan_and_mar()).build_all_monthly_reports();
        let months: Vec<String> = reports.iter().map(|r| r.period.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);

        let feb = &reports[1];
        assert!(feb.is_empty());
        assert_eq!(feb.summary.total, 0.0);
        assert_eq!(feb.summary.average_per_transaction, 0.0);
        assert_eq!(feb.summary.share_of_global, 0.0);
        assert!(feb.category_table.is_empty());
        assert!(feb.person_table.is_empty());
        assert!(feb.distribution_table.iter().all(|r| r.count == 0 && r.percentage == 0.0));
        assert!(feb.budget_table.iter().all(|r| r.value == MISSING_VALUE));
    }

    #[test]
    fn test_report_for_month_outside_span() {
        let report = assembler(jan_and_mar()).build_monthly_report(YearMonth::new(2030, 6).unwrap());
        assert!(report.is_empty());
        assert_eq!(report.title, "Expense Report - June 2030");
        assert_eq!(report.file_stem, "expense_report_2030_06");
    }

    #[test]
    fn test_empty_dataset_has_no_reports() {
        let assembler = assembler(Vec::new());
        assert!(assembler.build_all_monthly_reports().is_empty());
        assert!(assembler.global().is_empty());
    }

    #[test]
    fn test_tables_and_percentages() {
        let report = assembler(jan_and_mar()).build_monthly_report(YearMonth::new(2024, 1).unwrap());

        assert_eq!(report.title, "Expense Report - January 2024");
        assert_eq!(report.summary.total, 1200.0);
        assert_eq!(report.summary.transaction_count, 2);
        assert_eq!(report.summary.average_per_transaction, 600.0);
        assert!((report.summary.share_of_global - 1200.0 / 1240.0 * 100.0).abs() < 1e-9);

        let labels: Vec<&str> = report.category_table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Rent", "Groceries"]);
        let sum: f64 = report.category_table.iter().map(|r| r.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let people: Vec<&str> = report.person_table.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(people, vec!["Alice", "Shared"]);
        let sum: f64 = report.person_table.iter().map(|r| r.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_table_ties_ordered_by_label() {
        let records = vec![
            record("b", 10.0, Payer::PersonB, Category::Shopping, "2024-01-01"),
            record("a", 10.0, Payer::PersonA, Category::Dining, "2024-01-02"),
        ];
        let report = assembler(records).build_monthly_report(YearMonth::new(2024, 1).unwrap());
        assert_eq!(report.category_table[0].label, "Dining");
        assert_eq!(report.person_table[0].label, "Alice");
    }

    #[test]
    fn test_split_evenly_person_table() {
        let assembler = ReportAssembler::new(
            jan_and_mar(),
            sample_people(),
            InsightOptions {
                attribution: AttributionPolicy::SplitEvenly,
                ..InsightOptions::default()
            },
        );
        let report = assembler.build_monthly_report(YearMonth::new(2024, 1).unwrap());
        assert_eq!(report.person_table.len(), 2);
        assert_eq!(report.person_table[0].label, "Alice");
        assert_eq!(report.person_table[0].amount, 1100.0);
        assert_eq!(report.person_table[1].amount, 100.0);
    }

    #[test]
    fn test_budget_table_values() {
        let report = assembler(jan_and_mar()).build_monthly_report(YearMonth::new(2024, 1).unwrap());
        let value = |metric: &str| {
            report
                .budget_table
                .iter()
                .find(|r| r.metric == metric)
                .map(|r| r.value.clone())
                .unwrap()
        };
        assert_eq!(value("Highest single expense"), "1000.00");
        assert_eq!(value("Lowest single expense"), "200.00");
        assert_eq!(value("Expense range"), "800.00");
        assert_eq!(value("Standard deviation"), "400.00");
        // 2024-01-01 Monday and 2024-01-15 Monday
        assert_eq!(value("Most common day"), "Monday");
        assert_eq!(value("Most common category"), "Groceries");
    }

    #[test]
    fn test_charts_are_data_only() {
        let report = assembler(jan_and_mar()).build_monthly_report(YearMonth::new(2024, 3).unwrap());
        assert_eq!(report.charts.len(), 4);

        let pie = report.chart(ChartId::CategoryPie).unwrap();
        assert_eq!(pie.kind, ChartKind::Pie);
        assert_eq!(pie.series, vec![DataPoint { label: "Entertainment".into(), value: 40.0 }]);

        // The trend line always covers the whole dataset
        let trend = report.chart(ChartId::TrendLine).unwrap();
        let labels: Vec<&str> = trend.series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-03"]);

        let distribution = report.chart(ChartId::DistributionBar).unwrap();
        assert_eq!(distribution.series.len(), 5);
    }

    #[test]
    fn test_global_snapshot_shared() {
        let assembler = assembler(jan_and_mar());
        let reports = assembler.build_all_monthly_reports();
        assert!(reports.iter().all(|r| Arc::ptr_eq(&r.global, assembler.global())));
        assert_eq!(reports[0].global.total_spending, 1240.0);
    }
}
