use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::TallyError;

/// Whether a transaction moves money in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl FromStr for TxKind {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(TallyError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories carry a kind too; `Both` exists only on shared seed
/// categories (e.g. "Other"). Aggregation always matches on the
/// transaction's own kind, so `Both` never affects the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    Both,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
            CategoryKind::Both => "both",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            "both" => Ok(CategoryKind::Both),
            other => Err(TallyError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: CategoryKind,
    /// None = shared/system-wide category visible to every user.
    pub user_id: Option<i64>,
}

/// One ledger entry. Amounts are stored positive; the kind carries the
/// direction.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub amount: f64,
    pub kind: TxKind,
    pub category_id: i64,
    pub date: NaiveDate,
}

/// Inclusive date range scoping an aggregation. An absent bound means the
/// range is open on that end ("all time").
#[derive(Debug, Clone, Copy, Default)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn all_time() -> Self {
        Period::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Period { start, end }
    }

    /// First of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        Period { start: Some(first), end: Some(today) }
    }

    /// `months` calendar months back from `today` through `today`.
    /// Component-wise month subtraction, rolling the year on underflow.
    pub fn trailing_months(today: NaiveDate, months: u32) -> Self {
        let start = today
            .checked_sub_months(chrono::Months::new(months))
            .unwrap_or(today);
        Period { start: Some(start), end: Some(today) }
    }

    #[allow(dead_code)]
    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("income".parse::<TxKind>().unwrap(), TxKind::Income);
        assert_eq!("expense".parse::<TxKind>().unwrap(), TxKind::Expense);
        assert_eq!(TxKind::Income.as_str(), "income");
        assert!("transfer".parse::<TxKind>().is_err());
    }

    #[test]
    fn test_category_kind_accepts_both() {
        assert_eq!("both".parse::<CategoryKind>().unwrap(), CategoryKind::Both);
        assert!("neither".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_period_all_time_contains_everything() {
        let p = Period::all_time();
        assert!(p.contains(d("1970-01-01")));
        assert!(p.contains(d("2099-12-31")));
    }

    #[test]
    fn test_period_bounds_are_inclusive() {
        let p = Period::new(Some(d("2024-01-01")), Some(d("2024-01-31")));
        assert!(p.contains(d("2024-01-01")));
        assert!(p.contains(d("2024-01-31")));
        assert!(!p.contains(d("2023-12-31")));
        assert!(!p.contains(d("2024-02-01")));
    }

    #[test]
    fn test_month_to_date() {
        let p = Period::month_to_date(d("2024-03-15"));
        assert_eq!(p.start, Some(d("2024-03-01")));
        assert_eq!(p.end, Some(d("2024-03-15")));
    }

    #[test]
    fn test_trailing_months_rolls_year() {
        let p = Period::trailing_months(d("2024-02-10"), 3);
        assert_eq!(p.start, Some(d("2023-11-10")));
        assert_eq!(p.end, Some(d("2024-02-10")));
    }

    #[test]
    fn test_trailing_months_clamps_short_month() {
        // Mar 31 minus 1 month clamps to Feb 29 (2024 is a leap year).
        let p = Period::trailing_months(d("2024-03-31"), 1);
        assert_eq!(p.start, Some(d("2024-02-29")));
    }
}
