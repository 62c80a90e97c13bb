use serde::{Deserialize, Serialize};

use crate::domain::{CategorySummary, ExpenseBreakdown, GlobalSummary, MonthlySummary};

/// Everything a dashboard needs, computed from one ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub transaction_count: usize,
    pub categories: Vec<CategorySummary>,
    pub monthly: Vec<MonthlySummary>,
    pub summary: GlobalSummary,
    pub expense_breakdown: Vec<ExpenseBreakdown>,
    /// Rows dropped under the skip policy.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedRow>,
}

/// A row that was left out of the summary and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}
