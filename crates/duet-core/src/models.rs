//! Domain models for duet

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Expense categories shared by both people
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Utilities,
    Entertainment,
    Rent,
    Dining,
    Transport,
    /// Expenses that belong to the household as a whole
    Shared,
    Shopping,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Rent => "Rent",
            Self::Dining => "Dining",
            Self::Transport => "Transport",
            Self::Shared => "Shared",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// Get all categories
    pub fn all() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::Utilities,
            Self::Entertainment,
            Self::Rent,
            Self::Dining,
            Self::Transport,
            Self::Shared,
            Self::Shopping,
            Self::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Who paid for an expense
///
/// `Shared` is a payer in its own right: money that came out of a joint pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payer {
    PersonA,
    PersonB,
    Shared,
}

impl Payer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonA => "person_a",
            Self::PersonB => "person_b",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display names for the two people sharing expenses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct People {
    pub person_a: String,
    pub person_b: String,
}

impl Default for People {
    fn default() -> Self {
        Self {
            person_a: "Person A".to_string(),
            person_b: "Person B".to_string(),
        }
    }
}

impl People {
    pub const SHARED_LABEL: &'static str = "Shared";

    pub fn new(person_a: impl Into<String>, person_b: impl Into<String>) -> Self {
        Self {
            person_a: person_a.into(),
            person_b: person_b.into(),
        }
    }

    /// Human-readable label for a payer
    pub fn label(&self, payer: Payer) -> &str {
        match payer {
            Payer::PersonA => &self.person_a,
            Payer::PersonB => &self.person_b,
            Payer::Shared => Self::SHARED_LABEL,
        }
    }

    /// Resolve a raw `paid_by` value onto the closed payer set.
    ///
    /// Configured names, the generic "Person A"/"Person B" labels and
    /// "Shared" are accepted, case-insensitively.
    pub fn resolve(&self, raw: &str) -> Option<Payer> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let matches = |name: &str| name.trim().eq_ignore_ascii_case(raw);
        if matches(&self.person_a) || matches("Person A") || matches("person_a") {
            Some(Payer::PersonA)
        } else if matches(&self.person_b) || matches("Person B") || matches("person_b") {
            Some(Payer::PersonB)
        } else if matches(Self::SHARED_LABEL) {
            Some(Payer::Shared)
        } else {
            None
        }
    }
}

/// A validated expense. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRecord {
    description: String,
    amount: f64,
    payer: Payer,
    category: Category,
    date: NaiveDate,
}

impl ExpenseRecord {
    /// Build a record from already-typed fields, enforcing the record invariants.
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        payer: Payer,
        category: Category,
        date: NaiveDate,
    ) -> std::result::Result<Self, crate::validate::ValidationError> {
        use crate::validate::ValidationError;

        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(amount.to_string()));
        }
        Ok(Self {
            description: description.trim().to_string(),
            amount,
            payer,
            category,
            date,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn payer(&self) -> Payer {
        self.payer
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    /// Convert back to a raw row (ISO date, payer display name)
    pub fn to_raw(&self, people: &People) -> RawExpense {
        RawExpense {
            description: self.description.clone(),
            amount: self.amount.to_string(),
            paid_by: people.label(self.payer).to_string(),
            category: self.category.as_str().to_string(),
            date: self.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// An unvalidated row as delivered by a record source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExpense {
    pub description: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub paid_by: String,
    pub category: String,
    pub date: String,
}

impl RawExpense {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        paid_by: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            paid_by: paid_by.into(),
            category: category.into(),
            date: date.into(),
        }
    }
}

/// Sheets and caches hand amounts over as either JSON numbers or text
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Number(f64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidData(format!(
                "Invalid month: {}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Every month from `start` to `end`, inclusive. Empty when `start > end`.
    pub fn range_inclusive(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            current = current.succ();
        }
        months
    }

    pub fn month_name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            _ => "December",
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidData(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Full English weekday name
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Keep records dated within `[from, to]`; either bound may be open
pub fn filter_by_date(
    records: &[ExpenseRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<ExpenseRecord> {
    records
        .iter()
        .filter(|r| from.map_or(true, |f| r.date() >= f))
        .filter(|r| to.map_or(true, |t| r.date() <= t))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_from_str_case_insensitive() {
        assert_eq!(Category::from_str("groceries").unwrap(), Category::Groceries);
        assert_eq!(Category::from_str(" Rent ").unwrap(), Category::Rent);
        assert!(Category::from_str("Travel").is_err());
    }

    #[test]
    fn test_people_resolve() {
        let people = People::new("Alice", "Bob");
        assert_eq!(people.resolve("alice"), Some(Payer::PersonA));
        assert_eq!(people.resolve("Bob "), Some(Payer::PersonB));
        assert_eq!(people.resolve("Person A"), Some(Payer::PersonA));
        assert_eq!(people.resolve("SHARED"), Some(Payer::Shared));
        assert_eq!(people.resolve("Carol"), None);
        assert_eq!(people.resolve(""), None);
        assert_eq!(people.label(Payer::PersonB), "Bob");
    }

    #[test]
    fn test_record_rejects_non_positive_amount() {
        let d = date(2024, 1, 1);
        assert!(ExpenseRecord::new("x", 0.0, Payer::Shared, Category::Other, d).is_err());
        assert!(ExpenseRecord::new("x", -3.0, Payer::Shared, Category::Other, d).is_err());
        assert!(ExpenseRecord::new("x", f64::NAN, Payer::Shared, Category::Other, d).is_err());
        assert!(ExpenseRecord::new("  ", 3.0, Payer::Shared, Category::Other, d).is_err());
    }

    #[test]
    fn test_record_to_raw() {
        let people = People::new("Alice", "Bob");
        let record =
            ExpenseRecord::new("Rent", 1000.0, Payer::PersonA, Category::Rent, date(2024, 3, 1))
                .unwrap();
        let raw = record.to_raw(&people);
        assert_eq!(raw.paid_by, "Alice");
        assert_eq!(raw.date, "2024-03-01");
        assert_eq!(raw.amount, "1000");
    }

    #[test]
    fn test_raw_expense_accepts_numeric_amount() {
        let json = r#"{"description":"Tea","amount":4.5,"paid_by":"Shared","category":"Dining","date":"2024-01-02"}"#;
        let raw: RawExpense = serde_json::from_str(json).unwrap();
        assert_eq!(raw.amount, "4.5");
    }

    #[test]
    fn test_year_month_range_spans_year_boundary() {
        let start = YearMonth::new(2023, 11).unwrap();
        let end = YearMonth::new(2024, 2).unwrap();
        let months: Vec<String> = YearMonth::range_inclusive(start, end)
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
        assert!(YearMonth::range_inclusive(end, start).is_empty());
    }

    #[test]
    fn test_year_month_parse() {
        let ym: YearMonth = "2024-03".parse().unwrap();
        assert_eq!((ym.year(), ym.month()), (2024, 3));
        assert_eq!(ym.month_name(), "March");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
        assert!(YearMonth::new(2024, 0).is_err());
    }

    #[test]
    fn test_filter_by_date_inclusive() {
        let records: Vec<ExpenseRecord> = [1, 10, 20]
            .iter()
            .map(|d| {
                ExpenseRecord::new("x", 1.0, Payer::Shared, Category::Other, date(2024, 1, *d))
                    .unwrap()
            })
            .collect();
        let kept = filter_by_date(&records, Some(date(2024, 1, 10)), Some(date(2024, 1, 20)));
        assert_eq!(kept.len(), 2);
        assert_eq!(filter_by_date(&records, None, None).len(), 3);
    }
}
