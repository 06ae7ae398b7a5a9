//! Test utilities for duet-core
//!
//! Record builders and a small sample household, shared by unit tests and
//! the CLI tests (through the `test-utils` feature).

use chrono::NaiveDate;

use crate::models::{Category, ExpenseRecord, Payer, People, RawExpense};

/// Build a valid record. Panics on bad input, which in a test is what we want.
pub fn record(
    description: &str,
    amount: f64,
    payer: Payer,
    category: Category,
    date: &str,
) -> ExpenseRecord {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("bad test date {}: {}", date, e));
    ExpenseRecord::new(description, amount, payer, category, date)
        .unwrap_or_else(|e| panic!("bad test record {}: {}", description, e))
}

pub fn sample_people() -> People {
    People::new("Alice", "Bob")
}

/// Three months of rows for [`sample_people`], with February empty and one
/// invalid row
pub fn sample_rows() -> Vec<RawExpense> {
    vec![
        RawExpense::new("Rent", "1000", "Alice", "Rent", "2024-01-01"),
        RawExpense::new("Groceries", "$85.20", "Shared", "Groceries", "2024-01-06"),
        RawExpense::new("Cinema", "24", "Bob", "Entertainment", "2024-01-12"),
        RawExpense::new("Refund", "-10", "Bob", "Other", "2024-01-13"),
        RawExpense::new("Rent", "1000", "Alice", "Rent", "2024-03-01"),
        RawExpense::new("Power bill", "140.5", "Shared", "Utilities", "03/09/2024"),
        RawExpense::new("Bus pass", "55", "Bob", "Transport", "2024-03-20"),
    ]
}

/// CSV rendering of [`sample_rows`]
pub fn sample_csv() -> String {
    let mut csv = String::from("description,amount,paid_by,category,date\n");
    for row in sample_rows() {
        csv.push_str(&format!(
            "{},\"{}\",{},{},{}\n",
            row.description, row.amount, row.paid_by, row.category, row.date
        ));
    }
    csv
}
