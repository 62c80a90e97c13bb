// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;
use tally::domain::{Cents, Transaction};
use tempfile::TempDir;

pub const HEADER: &str = "Date,Category,Amount";

/// The household ledger used across scenarios: two salaries, rent and a
/// transfer to savings.
pub const STANDARD_LEDGER: &str = "Date,Category,Amount
2024-01-05,Salary,2000
2024-01-10,Rent,-800
2024-02-01,Salary,2000
2024-02-15,Savings,-200
";

/// Build a CSV ledger from (date, category, amount) rows.
pub fn ledger_csv(rows: &[(&str, &str, &str)]) -> String {
    let mut csv = format!("{}\n", HEADER);
    for (date, category, amount) in rows {
        csv.push_str(&format!("{},{},{}\n", date, category, amount));
    }
    csv
}

/// Write `contents` into a fresh temporary directory and return its path.
pub fn write_ledger(contents: &str) -> Result<(PathBuf, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("ledger.csv");
    let mut file = std::fs::File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok((path, temp_dir))
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

pub fn tx(date: &str, category: &str, amount: Cents) -> Transaction {
    Transaction::new(parse_date(date), category, amount)
}
