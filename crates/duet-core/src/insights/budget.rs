//! Budget insights: extremes, spread, most common category/day and the
//! amount distribution

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};

use crate::models::{weekday_name, Category, ExpenseRecord};

use super::types::{AmountBucket, BucketCount, BudgetInsights};

pub fn compute_budget_insights(records: &[ExpenseRecord]) -> BudgetInsights {
    if records.is_empty() {
        return BudgetInsights::empty();
    }

    let amounts: Vec<f64> = records.iter().map(|r| r.amount()).collect();
    let highest = amounts.iter().copied().fold(f64::MIN, f64::max);
    let lowest = amounts.iter().copied().fold(f64::MAX, f64::min);

    BudgetInsights {
        highest_single_expense: highest,
        lowest_single_expense: lowest,
        expense_range: highest - lowest,
        std_dev: population_std_dev(&amounts),
        most_common_category: most_common_category(records),
        most_common_day: most_common_day(records),
        distribution: distribution(&amounts),
    }
}

/// Population standard deviation, 0 for fewer than two values
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Most frequent category; ties go to the alphabetically first name
fn most_common_category(records: &[ExpenseRecord]) -> Option<Category> {
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category()).or_insert(0) += 1;
    }
    pick_most_common(counts.into_iter(), |c| c.as_str())
}

/// Most frequent day of week; ties go to the alphabetically first name
fn most_common_day(records: &[ExpenseRecord]) -> Option<Weekday> {
    let mut counts = [0usize; 7];
    for record in records {
        counts[record.date().weekday().num_days_from_monday() as usize] += 1;
    }
    let days = WEEK
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(&day, count)| (day, count));
    pick_most_common(days, weekday_name)
}

pub(crate) const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn pick_most_common<K: Copy>(
    counts: impl Iterator<Item = (K, usize)>,
    name: impl Fn(K) -> &'static str,
) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for (key, count) in counts {
        best = match best {
            None => Some((key, count)),
            Some((best_key, best_count)) => {
                if count > best_count || (count == best_count && name(key) < name(best_key)) {
                    Some((key, count))
                } else {
                    Some((best_key, best_count))
                }
            }
        };
    }
    best.map(|(key, _)| key)
}

fn distribution(amounts: &[f64]) -> Vec<BucketCount> {
    let mut counts: BTreeMap<AmountBucket, usize> = BTreeMap::new();
    for &amount in amounts {
        *counts.entry(AmountBucket::for_amount(amount)).or_insert(0) += 1;
    }
    AmountBucket::all()
        .iter()
        .map(|&bucket| BucketCount {
            bucket,
            count: counts.get(&bucket).copied().unwrap_or(0),
        })
        .collect()
}
