use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Cents, Month};

/// Category name kept out of the expense breakdown unless configured otherwise.
pub const DEFAULT_EXCLUDED_CATEGORY: &str = "Savings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
}

/// Income, expenses and net for one month bucket.
/// `expenses` is stored negative, so `net == income + expenses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: Month,
    /// Only set when bucketing by year and month.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub year: Option<i32>,
    pub net: Cents,
    pub income: Cents,
    pub expenses: Cents,
}

impl MonthlySummary {
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{} {}", self.month, year),
            None => self.month.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSummary {
    pub total_income: Cents,
    pub total_expenses: Cents,
    pub total_savings: Cents,
    /// `None` when there is no income to divide by.
    pub savings_percentage: Option<f64>,
}

impl GlobalSummary {
    /// Savings as a percentage of income.
    pub fn savings_rate(&self) -> Result<f64, SavingsRateError> {
        self.savings_percentage.ok_or(SavingsRateError::ZeroIncome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub category: String,
    /// Absolute value of the category's (negative) total.
    pub amount: Cents,
}

/// How transactions are bucketed into months.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthBucketing {
    /// Year is discarded: January 2023 and January 2024 share one row.
    #[default]
    MonthOfYear,
    YearMonth,
}

impl MonthBucketing {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonthBucketing::MonthOfYear => "month_of_year",
            MonthBucketing::YearMonth => "year_month",
        }
    }
}

/// Categories hidden from the expense breakdown. Matching is exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExcludedCategories(BTreeSet<String>);

impl ExcludedCategories {
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExcludedCategories {
    fn default() -> Self {
        [DEFAULT_EXCLUDED_CATEGORY].into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludedCategories {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavingsRateError {
    ZeroIncome,
}

impl fmt::Display for SavingsRateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SavingsRateError::ZeroIncome => {
                write!(f, "savings rate is undefined: total income is zero")
            }
        }
    }
}

impl std::error::Error for SavingsRateError {}

/// The combined size of a ledger does not fit in `Cents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountOverflowError;

impl fmt::Display for AmountOverflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ledger totals exceed the representable amount range")
    }
}

impl std::error::Error for AmountOverflowError {}
