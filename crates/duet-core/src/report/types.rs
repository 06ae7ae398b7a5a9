//! Report model types
//!
//! Everything a renderer needs for one month, as plain data. Nothing here
//! knows about pixels or files.

use std::sync::Arc;

use serde::Serialize;

use crate::insights::InsightsSnapshot;
use crate::models::YearMonth;

/// One month's report, ready for a renderer
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReportModel {
    pub period: YearMonth,
    /// "Expense Report - March 2024"
    pub title: String,
    /// "expense_report_2024_03", without extension
    pub file_stem: String,
    pub summary: SummaryBlock,
    pub category_table: Vec<TableRow>,
    pub person_table: Vec<TableRow>,
    pub distribution_table: Vec<DistributionRow>,
    pub budget_table: Vec<MetricRow>,
    pub charts: Vec<ChartSpec>,
    /// Statistics over this month's records only
    pub insights: InsightsSnapshot,
    /// Statistics over the whole dataset, shared by every month
    pub global: Arc<InsightsSnapshot>,
}

impl MonthlyReportModel {
    pub fn is_empty(&self) -> bool {
        self.summary.transaction_count == 0
    }

    pub fn chart(&self, id: ChartId) -> Option<&ChartSpec> {
        self.charts.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryBlock {
    pub total: f64,
    pub transaction_count: usize,
    /// 0 for a month without records
    pub average_per_transaction: f64,
    /// This month's total as a percentage of the global total
    pub share_of_global: f64,
}

/// A labelled amount with its share of the month total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionRow {
    pub label: String,
    pub count: usize,
    /// Share of the month's transactions
    pub percentage: f64,
}

/// A budget statistic already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    CategoryPie,
    PersonBar,
    DistributionBar,
    TrendLine,
}

impl ChartId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CategoryPie => "category_pie",
            Self::PersonBar => "person_bar",
            Self::DistributionBar => "distribution_bar",
            Self::TrendLine => "trend_line",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
}

/// A chart described as data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}
