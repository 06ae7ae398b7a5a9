//! Insights engine - pure computation from records to a snapshot

use std::collections::BTreeMap;

use crate::models::{Category, ExpenseRecord, Payer, YearMonth};

use super::budget::compute_budget_insights;
use super::patterns::{compute_patterns, GroupTotals};
use super::types::{
    AttributionPolicy, InsightOptions, InsightsSnapshot, MonthlyTrendPoint, TopExpense,
};

/// Computes insight snapshots with a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    options: InsightOptions,
}

impl InsightEngine {
    pub fn new(options: InsightOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InsightOptions {
        &self.options
    }

    pub fn compute(&self, records: &[ExpenseRecord]) -> InsightsSnapshot {
        compute_insights(records, &self.options)
    }
}

/// Compute every statistic over `records`.
///
/// Never fails: an empty slice yields zero totals, empty maps and an empty
/// budget block. The result depends only on the records and options, so the
/// same input always serializes to the same bytes.
pub fn compute_insights(records: &[ExpenseRecord], options: &InsightOptions) -> InsightsSnapshot {
    let mut total = 0.0;
    let mut by_category: GroupTotals<Category> = BTreeMap::new();
    for record in records {
        total += record.amount();
        let entry = by_category.entry(record.category()).or_insert((0.0, 0));
        entry.0 += record.amount();
        entry.1 += 1;
    }

    let by_person = attribute(records, options.attribution);
    let monthly_trend = monthly_trend(records);
    let patterns = compute_patterns(records, total, &by_category, &by_person, &monthly_trend);

    tracing::debug!(
        records = records.len(),
        months = monthly_trend.len(),
        attribution = options.attribution.as_str(),
        "Computed insights"
    );

    InsightsSnapshot {
        attribution: options.attribution,
        total_spending: total,
        transaction_count: records.len(),
        spending_by_person: by_person.iter().map(|(&k, &(v, _))| (k, v)).collect(),
        spending_by_category: by_category.iter().map(|(&k, &(v, _))| (k, v)).collect(),
        top_expenses: top_expenses(records, options.top_n),
        budget_insights: compute_budget_insights(records),
        monthly_trend,
        patterns,
    }
}

/// Per-person totals under the given attribution policy
fn attribute(records: &[ExpenseRecord], policy: AttributionPolicy) -> GroupTotals<Payer> {
    let mut totals: GroupTotals<Payer> = BTreeMap::new();
    let mut add = |payer: Payer, amount: f64| {
        let entry = totals.entry(payer).or_insert((0.0, 0));
        entry.0 += amount;
        entry.1 += 1;
    };

    for record in records {
        match (record.payer(), policy) {
            (Payer::Shared, AttributionPolicy::SplitEvenly) => {
                let half = record.amount() / 2.0;
                add(Payer::PersonA, half);
                add(Payer::PersonB, half);
            }
            (payer, _) => add(payer, record.amount()),
        }
    }
    totals
}

/// Month-by-month totals from the first to the last record month, with
/// zero entries for months that have no records
pub fn monthly_trend(records: &[ExpenseRecord]) -> Vec<MonthlyTrendPoint> {
    let mut by_month: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = by_month.entry(record.year_month()).or_insert((0.0, 0));
        entry.0 += record.amount();
        entry.1 += 1;
    }

    let (first, last) = match (by_month.keys().next(), by_month.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    YearMonth::range_inclusive(first, last)
        .into_iter()
        .map(|month| {
            let (amount, transaction_count) = by_month.get(&month).copied().unwrap_or((0.0, 0));
            MonthlyTrendPoint {
                month,
                amount,
                transaction_count,
            }
        })
        .collect()
}

/// The `n` largest expenses: amount descending, then older first, then input order
pub fn top_expenses(records: &[ExpenseRecord], n: usize) -> Vec<TopExpense> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        let (ra, rb) = (&records[a], &records[b]);
        rb.amount()
            .total_cmp(&ra.amount())
            .then_with(|| ra.date().cmp(&rb.date()))
            .then_with(|| a.cmp(&b))
    });

    order
        .into_iter()
        .take(n)
        .map(|position| {
            let record = &records[position];
            TopExpense {
                position,
                description: record.description().to_string(),
                amount: record.amount(),
                category: record.category(),
                payer: record.payer(),
                date: record.date(),
            }
        })
        .collect()
}
