//! Insights command implementation

use anyhow::{Context, Result};
use chrono::NaiveDate;
use duet_core::insights::InsightsSnapshot;
use duet_core::models::{filter_by_date, weekday_name};
use duet_core::{compute_insights, DuetConfig, People};

use super::{load, truncate};

/// Parse an optional YYYY-MM-DD argument
pub fn parse_date_arg(value: Option<&str>, flag: &str) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid --{} date format (use YYYY-MM-DD)", flag))
        })
        .transpose()
}

pub async fn cmd_insights(config: &DuetConfig, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let from = parse_date_arg(from, "from")?;
    let to = parse_date_arg(to, "to")?;
    if let (Some(f), Some(t)) = (from, to) {
        anyhow::ensure!(f <= t, "--from {} is after --to {}", f, t);
    }

    let loaded = load(config).await?;
    let records = filter_by_date(&loaded.report.records, from, to);
    let snapshot = compute_insights(&records, &config.insights);

    print_snapshot(&snapshot, &config.people);
    Ok(())
}

/// Print a snapshot as terminal tables
pub fn print_snapshot(snapshot: &InsightsSnapshot, people: &People) {
    println!();
    println!("📊 Expense Insights");
    if let Some((first, last)) = snapshot.month_span() {
        println!("   Period: {} to {}", first, last);
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if snapshot.is_empty() {
        println!("   No expenses found.");
        return;
    }

    println!(
        "   Total: ${:.2} across {} expenses (avg ${:.2})",
        snapshot.total_spending, snapshot.transaction_count, snapshot.patterns.average_expense
    );
    println!(
        "   Attribution: {}",
        snapshot.attribution
    );

    println!();
    println!("   {:20} │ {:>10} │ {:>6} │ {:>5}", "Person", "Amount", "%", "Count");
    println!("   ─────────────────────┼────────────┼────────┼───────");
    for group in &snapshot.patterns.person_breakdown {
        println!(
            "   {:20} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(people.label(group.key), 20),
            group.total,
            group.percentage,
            group.count
        );
    }

    println!();
    println!("   {:20} │ {:>10} │ {:>6} │ {:>5}", "Category", "Amount", "%", "Count");
    println!("   ─────────────────────┼────────────┼────────┼───────");
    for group in &snapshot.patterns.category_breakdown {
        println!(
            "   {:20} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            group.key.as_str(),
            group.total,
            group.percentage,
            group.count
        );
    }

    println!();
    println!("📈 Monthly Trend");
    for point in &snapshot.monthly_trend {
        println!(
            "   {} │ {:>10.2} │ {:>3} expenses",
            point.month, point.amount, point.transaction_count
        );
    }

    if !snapshot.top_expenses.is_empty() {
        println!();
        println!("💸 Top Expenses");
        for (rank, expense) in snapshot.top_expenses.iter().enumerate() {
            println!(
                "   {}. {} {:30} ${:>9.2}  {} / {}",
                rank + 1,
                expense.date,
                truncate(&expense.description, 30),
                expense.amount,
                expense.category,
                people.label(expense.payer)
            );
        }
    }

    let budget = &snapshot.budget_insights;
    let patterns = &snapshot.patterns;
    println!();
    println!("🔎 Patterns");
    println!(
        "   Highest / lowest expense: ${:.2} / ${:.2} (std dev {:.2})",
        budget.highest_single_expense, budget.lowest_single_expense, budget.std_dev
    );
    println!("   Average per month: ${:.2}", patterns.average_monthly_spend);
    if let Some(month) = &patterns.highest_spending_month {
        println!("   Highest month: {} (${:.2})", month.month, month.amount);
    }
    if let Some(category) = budget.most_common_category {
        println!("   Most common category: {}", category);
    }
    if let Some(day) = budget.most_common_day {
        println!("   Most common day: {}", weekday_name(day));
    }
    println!(
        "   Shared vs individual: {:.1}% / {:.1}%",
        patterns.shared_vs_individual.shared, patterns.shared_vs_individual.individual
    );
    println!(
        "   Velocity: ${:.2}/day, ${:.2}/week, ${:.2}/month",
        patterns.velocity.daily, patterns.velocity.weekly, patterns.velocity.monthly
    );

    println!();
    println!("   Amount distribution:");
    for bucket in &budget.distribution {
        println!("   {:>14} │ {}", bucket.bucket.label(), bucket.count);
    }
}
