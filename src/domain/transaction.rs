use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Cents;

/// A single ledger entry. Positive amounts are income, negative are expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Cents,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: impl Into<String>, amount: Cents) -> Self {
        Self {
            date,
            category: category.into(),
            amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0
    }

    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

/// Calendar month. Ordering follows the calendar, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn of(date: NaiveDate) -> Self {
        // month0() is always in 0..12
        Self::ALL[date.month0() as usize]
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_month_of_date() {
        assert_eq!(Month::of(date("2024-01-05")), Month::January);
        assert_eq!(Month::of(date("2023-12-31")), Month::December);
        assert_eq!(Month::of(date("2024-02-29")), Month::February);
    }

    #[test]
    fn test_month_order_is_calendar_order() {
        let mut months = vec![Month::December, Month::March, Month::January];
        months.sort();
        assert_eq!(months, vec![Month::January, Month::March, Month::December]);
        assert_eq!(Month::January.number(), 1);
        assert_eq!(Month::December.number(), 12);
    }

    #[test]
    fn test_month_serializes_as_name() {
        let json = serde_json::to_string(&Month::September).unwrap();
        assert_eq!(json, "\"September\"");
        assert_eq!(Month::September.to_string(), "September");
    }

    #[test]
    fn test_transaction_sign() {
        let income = Transaction::new(date("2024-01-05"), "Salary", 200000);
        let expense = Transaction::new(date("2024-01-10"), "Rent", -80000);
        let zero = Transaction::new(date("2024-01-11"), "Refund", 0);

        assert!(income.is_income() && !income.is_expense());
        assert!(expense.is_expense() && !expense.is_income());
        assert!(!zero.is_income() && !zero.is_expense());
        assert_eq!(expense.month(), Month::January);
    }
}
