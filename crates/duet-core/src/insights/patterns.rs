//! Spending patterns: averages, breakdowns, weekday spread and velocity

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use crate::models::{Category, ExpenseRecord, Payer};

use super::budget::WEEK;
use super::types::{
    percentage, CategoryAmount, GroupStats, MonthlyTrendPoint, SharedRatio, SpendingPatterns,
    SpendingVelocity, WeekdaySpending,
};

/// Per-group (total, count) accumulated in input order
pub(crate) type GroupTotals<K> = BTreeMap<K, (f64, usize)>;

pub fn compute_patterns(
    records: &[ExpenseRecord],
    total: f64,
    by_category: &GroupTotals<Category>,
    by_person: &GroupTotals<Payer>,
    monthly_trend: &[MonthlyTrendPoint],
) -> SpendingPatterns {
    let count = records.len();

    SpendingPatterns {
        average_expense: if count > 0 { total / count as f64 } else { 0.0 },
        average_monthly_spend: if monthly_trend.is_empty() {
            0.0
        } else {
            total / monthly_trend.len() as f64
        },
        most_expensive_category: most_expensive_category(by_category),
        highest_spending_month: highest_spending_month(monthly_trend),
        spending_by_weekday: spending_by_weekday(records),
        category_breakdown: breakdown(by_category, total),
        person_breakdown: breakdown(by_person, total),
        shared_vs_individual: shared_ratio(records, total),
        velocity: velocity(records, total),
    }
}

/// Largest category by total; ties go to the alphabetically first name
fn most_expensive_category(by_category: &GroupTotals<Category>) -> Option<CategoryAmount> {
    let mut best: Option<CategoryAmount> = None;
    for (&category, &(amount, _)) in by_category {
        let better = match &best {
            None => true,
            Some(b) => {
                amount > b.amount || (amount == b.amount && category.as_str() < b.category.as_str())
            }
        };
        if better {
            best = Some(CategoryAmount { category, amount });
        }
    }
    best
}

/// Month with the largest total; ties go to the earliest month
fn highest_spending_month(trend: &[MonthlyTrendPoint]) -> Option<MonthlyTrendPoint> {
    let mut best: Option<&MonthlyTrendPoint> = None;
    for point in trend {
        if best.map_or(true, |b| point.amount > b.amount) {
            best = Some(point);
        }
    }
    best.cloned()
}

fn spending_by_weekday(records: &[ExpenseRecord]) -> Vec<WeekdaySpending> {
    let mut totals = [(0.0f64, 0usize); 7];
    for record in records {
        let slot = &mut totals[record.date().weekday().num_days_from_monday() as usize];
        slot.0 += record.amount();
        slot.1 += 1;
    }
    WEEK.iter()
        .zip(totals)
        .filter(|(_, (_, n))| *n > 0)
        .map(|(&day, (amount, transaction_count))| WeekdaySpending {
            day,
            amount,
            transaction_count,
        })
        .collect()
}

/// Groups ordered by total descending, then by key order
fn breakdown<K: Copy + Ord>(groups: &GroupTotals<K>, total: f64) -> Vec<GroupStats<K>> {
    let mut stats: Vec<GroupStats<K>> = groups
        .iter()
        .map(|(&key, &(amount, count))| GroupStats {
            key,
            total: amount,
            percentage: percentage(amount, total),
            average: if count > 0 { amount / count as f64 } else { 0.0 },
            count,
        })
        .collect();
    stats.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    stats
}

/// Split by who actually paid, regardless of the attribution policy
fn shared_ratio(records: &[ExpenseRecord], total: f64) -> SharedRatio {
    if total <= 0.0 {
        return SharedRatio::default();
    }
    let shared: f64 = records
        .iter()
        .filter(|r| r.payer() == Payer::Shared)
        .map(|r| r.amount())
        .sum();
    SharedRatio {
        shared: percentage(shared, total),
        individual: percentage(total - shared, total),
    }
}

fn velocity(records: &[ExpenseRecord], total: f64) -> SpendingVelocity {
    if records.is_empty() {
        return SpendingVelocity::default();
    }
    let days: BTreeSet<_> = records.iter().map(|r| r.date()).collect();
    let weeks: BTreeSet<_> = records
        .iter()
        .map(|r| {
            let week = r.date().iso_week();
            (week.year(), week.week())
        })
        .collect();
    let months: BTreeSet<_> = records.iter().map(|r| r.year_month()).collect();

    SpendingVelocity {
        daily: total / days.len() as f64,
        weekly: total / weeks.len() as f64,
        monthly: total / months.len() as f64,
    }
}
