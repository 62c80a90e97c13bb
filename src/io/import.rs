use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::io::Read;
use tracing::{debug, warn};

use crate::application::{ImportError, RowErrorPolicy, SkippedRow, SummaryConfig};
use crate::domain::{add_volume, parse_cents, Cents, Transaction};

pub const DATE_COLUMN: &str = "Date";
pub const CATEGORY_COLUMN: &str = "Category";
pub const AMOUNT_COLUMN: &str = "Amount";

/// Date-only layouts tried in order after RFC 3339.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

/// Options for import operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub on_row_error: RowErrorPolicy,
    pub reject_empty: bool,
}

impl From<&SummaryConfig> for ImportOptions {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            on_row_error: config.on_row_error,
            reject_empty: config.reject_empty,
        }
    }
}

/// Reads a `Date,Category,Amount` ledger into transactions.
pub struct Importer {
    options: ImportOptions,
}

/// Positions of the required columns in the header row.
struct Columns {
    date: usize,
    category: usize,
    amount: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
        })
    }
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    /// Import transactions from CSV. Input order is preserved.
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<ImportResult, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|source| ImportError::Csv { line: 1, source })?
            .clone();

        let mut result = ImportResult::default();

        // A completely blank input has no header row and no data
        if headers.is_empty() {
            return self.finish(result);
        }

        let columns = Columns::locate(&headers)?;
        // Running sum of magnitudes; keeps every aggregate within `Cents`
        let mut volume: Cents = 0;

        for (line_num, record) in csv_reader.records().enumerate() {
            let fallback_line = line_num + 2; // +2 for header and 0-indexing

            let parsed = match record {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(fallback_line);
                    parse_row(&record, &columns, line).and_then(|transaction| {
                        add_volume(volume, transaction.amount)
                            .map(|volume| (transaction, volume))
                            .map_err(|_| ImportError::TotalOutOfRange { line })
                    })
                }
                Err(source) => {
                    let line = source
                        .position()
                        .map(|p| p.line() as usize)
                        .unwrap_or(fallback_line);
                    Err(ImportError::Csv { line, source })
                }
            };

            match parsed {
                Ok((transaction, new_volume)) => {
                    volume = new_volume;
                    result.transactions.push(transaction);
                }
                Err(e) => match self.options.on_row_error {
                    RowErrorPolicy::Abort => return Err(e),
                    RowErrorPolicy::Skip => {
                        let line = e.line().unwrap_or(fallback_line);
                        warn!(line, error = %e, "skipping ledger row");
                        result.skipped.push(SkippedRow {
                            line,
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        self.finish(result)
    }

    fn finish(&self, result: ImportResult) -> Result<ImportResult, ImportError> {
        debug!(
            imported = result.transactions.len(),
            skipped = result.skipped.len(),
            "ledger import finished"
        );

        if self.options.reject_empty && result.transactions.is_empty() {
            return Err(ImportError::EmptyInput);
        }
        Ok(result)
    }
}

fn parse_row(record: &StringRecord, columns: &Columns, line: usize) -> Result<Transaction, ImportError> {
    let date_str = record.get(columns.date).unwrap_or("");
    let category = record.get(columns.category).unwrap_or("");
    let amount_str = record.get(columns.amount).unwrap_or("");

    let date = parse_date(date_str).ok_or_else(|| ImportError::MalformedDate {
        line,
        value: date_str.to_string(),
    })?;

    // Category is kept verbatim; only an all-blank value is rejected
    if category.trim().is_empty() {
        return Err(ImportError::MissingCategory { line });
    }

    let amount = parse_cents(amount_str).map_err(|source| ImportError::MalformedAmount {
        line,
        value: amount_str.to_string(),
        source,
    })?;

    Ok(Transaction::new(date, category, amount))
}

/// Parse a calendar date from the textual forms commonly found in ledger exports.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Try RFC3339 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseCentsError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn import(csv: &str, options: ImportOptions) -> Result<ImportResult, ImportError> {
        Importer::new(options).import_csv(csv.as_bytes())
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024/01/05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("01/05/2024"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("05.01.2024"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 13:45:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T13:45:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T23:30:00+02:00"), Some(date(2024, 1, 5)));
        assert_eq!(parse_date(" 2024-01-05 "), Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_import_basic() {
        let result = import(
            "Date,Category,Amount\n2024-01-05,Salary,2000\n2024-01-10,Rent,-800.50\n",
            ImportOptions::default(),
        )
        .unwrap();

        assert_eq!(
            result.transactions,
            vec![
                Transaction::new(date(2024, 1, 5), "Salary", 200000),
                Transaction::new(date(2024, 1, 10), "Rent", -80050),
            ]
        );
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_import_columns_in_any_order_with_extras() {
        let result = import(
            "Amount,Note,Category,Date\n-12.5,coffee beans,Groceries,2024-03-02\n",
            ImportOptions::default(),
        )
        .unwrap();
        assert_eq!(
            result.transactions,
            vec![Transaction::new(date(2024, 3, 2), "Groceries", -1250)]
        );
    }

    #[test]
    fn test_import_keeps_category_verbatim() {
        let result = import(
            "Date,Category,Amount\n2024-03-02, Food ,-1\n",
            ImportOptions::default(),
        )
        .unwrap();
        assert_eq!(result.transactions[0].category, " Food ");
    }

    #[test]
    fn test_import_header_only_is_empty() {
        let result = import("Date,Category,Amount\n", ImportOptions::default()).unwrap();
        assert!(result.transactions.is_empty());

        let result = import("", ImportOptions::default()).unwrap();
        assert!(result.transactions.is_empty());
    }

    #[test]
    fn test_import_reject_empty() {
        let options = ImportOptions {
            reject_empty: true,
            ..Default::default()
        };
        let err = import("Date,Category,Amount\n", options).unwrap_err();
        assert!(matches!(err, ImportError::EmptyInput));
    }

    #[test]
    fn test_import_missing_column() {
        let err = import("Date,Amount\n2024-01-01,5\n", ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(ref c) if c == "Category"));
    }

    #[test]
    fn test_import_aborts_on_first_bad_row() {
        let csv = "Date,Category,Amount\n\
                   2024-01-01,Salary,100\n\
                   not-a-date,Rent,-5\n\
                   2024-01-03,,-5\n";
        let err = import(csv, ImportOptions::default()).unwrap_err();
        match err {
            ImportError::MalformedDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_import_missing_category() {
        let err = import(
            "Date,Category,Amount\n2024-01-03,   ,-5\n",
            ImportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingCategory { line: 2 }));
    }

    #[test]
    fn test_import_malformed_amount() {
        let err = import(
            "Date,Category,Amount\n2024-01-03,Rent,12abc\n",
            ImportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::MalformedAmount { line: 2, .. }));
    }

    #[test]
    fn test_import_short_row_reports_missing_field() {
        let err = import("Date,Category,Amount\n2024-01-03,Rent\n", ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::MalformedAmount { line: 2, .. }));
    }

    #[test]
    fn test_import_sub_cent_amount_is_malformed() {
        let err = import(
            "Date,Category,Amount\n2024-01-01,Interest,0.004\n",
            ImportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::MalformedAmount { line: 2, source: ParseCentsError::SubCent, .. }
        ));
    }

    #[test]
    fn test_import_rejects_totals_out_of_range() {
        let csv = "Date,Category,Amount\n\
                   2024-01-01,Salary,90000000000000000\n\
                   2024-01-02,Salary,90000000000000000\n";
        let err = import(csv, ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::TotalOutOfRange { line: 3 }));

        // Skipping the offending row keeps the rest within range
        let options = ImportOptions {
            on_row_error: RowErrorPolicy::Skip,
            ..Default::default()
        };
        let result = import(csv, options).unwrap();
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.skipped[0].line, 3);
    }

    #[test]
    fn test_import_skip_policy_collects_errors() {
        let csv = "Date,Category,Amount\n\
                   2024-01-01,Salary,100\n\
                   not-a-date,Rent,-5\n\
                   2024-01-03,,-5\n\
                   2024-01-04,Food,oops\n\
                   2024-01-05,Food,-3\n";
        let options = ImportOptions {
            on_row_error: RowErrorPolicy::Skip,
            ..Default::default()
        };
        let result = import(csv, options).unwrap();

        assert_eq!(result.transactions.len(), 2);
        let lines: Vec<usize> = result.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(result.skipped[1].reason.contains("missing category"));
    }
}
