//! Insights Engine - statistics over a collection of expense records
//!
//! Every function here is pure: no I/O, no clock, no global state. The same
//! records and options always produce the same [`InsightsSnapshot`], which
//! is what lets monthly reports be built in parallel from one shared global
//! snapshot.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duet_core::insights::{InsightEngine, InsightOptions};
//!
//! let engine = InsightEngine::new(InsightOptions::default());
//! let snapshot = engine.compute(&records);
//! println!("{} spent over {} months", snapshot.total_spending, snapshot.monthly_trend.len());
//! ```

pub mod budget;
pub mod engine;
pub mod patterns;
pub mod types;

pub use budget::{compute_budget_insights, population_std_dev};
pub use engine::{compute_insights, monthly_trend, top_expenses, InsightEngine};
pub use patterns::compute_patterns;
pub use types::{
    percentage, AmountBucket, AttributionPolicy, BucketCount, BudgetInsights, CategoryAmount,
    GroupStats, InsightOptions, InsightsSnapshot, MonthlyTrendPoint, SharedRatio,
    SpendingPatterns, SpendingVelocity, TopExpense, WeekdaySpending, DEFAULT_TOP_N,
};
