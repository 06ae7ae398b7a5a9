//! Core types for the insights engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Payer, YearMonth};

/// Default number of expenses kept in `top_expenses`
pub const DEFAULT_TOP_N: usize = 5;

/// How expenses paid from the shared pot show up in per-person totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionPolicy {
    /// Shared expenses get their own `Shared` bucket. Report readers settle
    /// shared costs between themselves.
    #[default]
    #[serde(rename = "shared_bucket")]
    AttributeToSharedBucket,
    /// Shared expenses are halved between Person A and Person B
    SplitEvenly,
}

impl AttributionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AttributeToSharedBucket => "shared_bucket",
            Self::SplitEvenly => "split_evenly",
        }
    }
}

impl fmt::Display for AttributionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttributionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared_bucket" | "shared-bucket" => Ok(Self::AttributeToSharedBucket),
            "split_evenly" | "split-evenly" => Ok(Self::SplitEvenly),
            _ => Err(format!(
                "Unknown attribution policy: {} (valid: shared_bucket, split_evenly)",
                s
            )),
        }
    }
}

/// Tunables for a snapshot computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightOptions {
    pub attribution: AttributionPolicy,
    pub top_n: usize,
}

impl Default for InsightOptions {
    fn default() -> Self {
        Self {
            attribution: AttributionPolicy::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Fixed amount ranges used for the expense distribution.
///
/// Lower bounds are inclusive, upper bounds exclusive; `Over200` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountBucket {
    Under10,
    From10To50,
    From50To100,
    From100To200,
    Over200,
}

impl AmountBucket {
    pub fn all() -> &'static [AmountBucket] {
        &[
            Self::Under10,
            Self::From10To50,
            Self::From50To100,
            Self::From100To200,
            Self::Over200,
        ]
    }

    pub fn lower(&self) -> f64 {
        match self {
            Self::Under10 => 0.0,
            Self::From10To50 => 10.0,
            Self::From50To100 => 50.0,
            Self::From100To200 => 100.0,
            Self::Over200 => 200.0,
        }
    }

    pub fn upper(&self) -> Option<f64> {
        match self {
            Self::Under10 => Some(10.0),
            Self::From10To50 => Some(50.0),
            Self::From50To100 => Some(100.0),
            Self::From100To200 => Some(200.0),
            Self::Over200 => None,
        }
    }

    pub fn for_amount(amount: f64) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|b| b.upper().map_or(true, |upper| amount < upper))
            .unwrap_or(Self::Over200)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under10 => "Under 10",
            Self::From10To50 => "10 to 50",
            Self::From50To100 => "50 to 100",
            Self::From100To200 => "100 to 200",
            Self::Over200 => "200 and over",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub bucket: AmountBucket,
    pub count: usize,
}

/// Total spending for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrendPoint {
    pub month: YearMonth,
    pub amount: f64,
    pub transaction_count: usize,
}

/// One of the largest expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopExpense {
    /// Position of the record in the input sequence
    pub position: usize,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub payer: Payer,
    pub date: NaiveDate,
}

/// Extremes and spread of individual expenses.
///
/// With no records every amount is 0 and the "most common" fields are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetInsights {
    pub highest_single_expense: f64,
    pub lowest_single_expense: f64,
    pub expense_range: f64,
    /// Population standard deviation; 0 with fewer than two records
    pub std_dev: f64,
    pub most_common_category: Option<Category>,
    pub most_common_day: Option<Weekday>,
    pub distribution: Vec<BucketCount>,
}

impl BudgetInsights {
    pub fn empty() -> Self {
        Self {
            highest_single_expense: 0.0,
            lowest_single_expense: 0.0,
            expense_range: 0.0,
            std_dev: 0.0,
            most_common_category: None,
            most_common_day: None,
            distribution: AmountBucket::all()
                .iter()
                .map(|&bucket| BucketCount { bucket, count: 0 })
                .collect(),
        }
    }
}

/// Total, share, average and count for one group (category or person)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats<K> {
    pub key: K,
    pub total: f64,
    pub percentage: f64,
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: Category,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdaySpending {
    pub day: Weekday,
    pub amount: f64,
    pub transaction_count: usize,
}

/// Percentage of spending paid from the shared pot vs by individuals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SharedRatio {
    pub shared: f64,
    pub individual: f64,
}

/// Average spending per active day, ISO week and month
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpendingVelocity {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingPatterns {
    pub average_expense: f64,
    pub average_monthly_spend: f64,
    pub most_expensive_category: Option<CategoryAmount>,
    pub highest_spending_month: Option<MonthlyTrendPoint>,
    /// Monday first; weekdays without spending are omitted
    pub spending_by_weekday: Vec<WeekdaySpending>,
    pub category_breakdown: Vec<GroupStats<Category>>,
    pub person_breakdown: Vec<GroupStats<Payer>>,
    pub shared_vs_individual: SharedRatio,
    pub velocity: SpendingVelocity,
}

/// Every statistic computed over one record collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsSnapshot {
    pub attribution: AttributionPolicy,
    pub total_spending: f64,
    pub transaction_count: usize,
    pub spending_by_person: BTreeMap<Payer, f64>,
    pub spending_by_category: BTreeMap<Category, f64>,
    /// Chronological, gap-free between the first and last record month
    pub monthly_trend: Vec<MonthlyTrendPoint>,
    pub top_expenses: Vec<TopExpense>,
    pub budget_insights: BudgetInsights,
    pub patterns: SpendingPatterns,
}

impl InsightsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    /// First and last month of the trend, if any records exist
    pub fn month_span(&self) -> Option<(YearMonth, YearMonth)> {
        match (self.monthly_trend.first(), self.monthly_trend.last()) {
            (Some(first), Some(last)) => Some((first.month, last.month)),
            _ => None,
        }
    }
}

/// `part` as a percentage of `total`; 0 when the total is 0
pub fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
