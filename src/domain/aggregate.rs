use chrono::Datelike;
use std::collections::BTreeMap;

use super::{
    AmountOverflowError, CategorySummary, Cents, ExcludedCategories, ExpenseBreakdown, GlobalSummary, Month,
    MonthBucketing, MonthlySummary, Transaction,
};

/// Sum of absolute amounts. Every total the aggregator produces (per
/// category, per month, income, expenses, savings) is bounded by this
/// value, so when it fits in `Cents` none of them can overflow.
pub fn ledger_volume(transactions: &[Transaction]) -> Result<Cents, AmountOverflowError> {
    transactions.iter().try_fold(0 as Cents, |volume, transaction| {
        add_volume(volume, transaction.amount)
    })
}

/// Add one amount's magnitude to a running volume.
pub fn add_volume(volume: Cents, amount: Cents) -> Result<Cents, AmountOverflowError> {
    amount
        .checked_abs()
        .and_then(|magnitude| volume.checked_add(magnitude))
        .ok_or(AmountOverflowError)
}

/// Sum amounts per category. Grouping is by exact string equality.
/// Rows are sorted by category name; zero totals are kept.
pub fn compute_category_summary(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut totals: BTreeMap<&str, Cents> = BTreeMap::new();

    for transaction in transactions {
        *totals.entry(transaction.category.as_str()).or_insert(0) += transaction.amount;
    }

    totals
        .into_iter()
        .map(|(category, total)| CategorySummary {
            category: category.to_string(),
            total,
        })
        .collect()
}

/// Split each month's amounts into income, expenses and net.
///
/// With `MonthBucketing::MonthOfYear` the year is dropped, so the same
/// calendar month from different years lands in one row. Only months with
/// at least one transaction are returned, in calendar order.
pub fn compute_monthly_summary(
    transactions: &[Transaction],
    bucketing: MonthBucketing,
) -> Vec<MonthlySummary> {
    // Month first so that rows come out January..December, then by year
    let mut buckets: BTreeMap<(Month, Option<i32>), MonthlySummary> = BTreeMap::new();

    for transaction in transactions {
        let month = transaction.month();
        let year = match bucketing {
            MonthBucketing::MonthOfYear => None,
            MonthBucketing::YearMonth => Some(transaction.date.year()),
        };

        let row = buckets
            .entry((month, year))
            .or_insert_with(|| MonthlySummary {
                month,
                year,
                net: 0,
                income: 0,
                expenses: 0,
            });

        row.net += transaction.amount;
        if transaction.is_income() {
            row.income += transaction.amount;
        } else if transaction.is_expense() {
            row.expenses += transaction.amount;
        }
    }

    buckets.into_values().collect()
}

/// Overall income, expenses, savings and savings rate.
pub fn compute_global_summary(transactions: &[Transaction]) -> GlobalSummary {
    let (total_income, total_expenses) =
        transactions
            .iter()
            .fold((0, 0), |(income, expenses), transaction| {
                if transaction.is_income() {
                    (income + transaction.amount, expenses)
                } else if transaction.is_expense() {
                    (income, expenses + transaction.amount)
                } else {
                    (income, expenses)
                }
            });

    let total_savings = total_income - total_expenses.abs();
    let savings_percentage = savings_percentage(total_savings, total_income);

    GlobalSummary {
        total_income,
        total_expenses,
        total_savings,
        savings_percentage,
    }
}

/// Savings as a percentage of income, `None` when income is zero.
pub fn savings_percentage(total_savings: Cents, total_income: Cents) -> Option<f64> {
    if total_income == 0 {
        return None;
    }
    Some(total_savings as f64 / total_income as f64 * 100.0)
}

/// Expense categories for a pie chart: negative totals only, excluded
/// categories dropped, amounts made positive.
pub fn compute_expense_breakdown(
    categories: &[CategorySummary],
    excluded: &ExcludedCategories,
) -> Vec<ExpenseBreakdown> {
    categories
        .iter()
        .filter(|c| c.total < 0 && !excluded.contains(&c.category))
        .map(|c| ExpenseBreakdown {
            category: c.category.clone(),
            amount: c.total.abs(),
        })
        .collect()
}
