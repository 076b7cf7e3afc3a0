use crate::domain::model::{OptionalColumn, TransactionTable};
use std::collections::BTreeMap;

pub const DEFAULT_INDUSTRY: &str = "General";

/// Column-wise reductions over the transaction table.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub revenue: f64,
    pub expense: f64,
    pub profit: f64,
    /// Profit over revenue as a percentage, unrounded. Zero when revenue is not positive.
    pub margin: f64,
    pub expense_categories: BTreeMap<String, f64>,
    pub receivable: f64,
    pub payable: f64,
    pub inventory: f64,
    pub loan_total: f64,
    pub gst_collected: f64,
    pub gst_paid: f64,
    pub industry: String,
}

pub fn aggregate(table: &TransactionTable) -> Totals {
    let revenue: f64 = table.rows().iter().map(|r| r.revenue).sum();
    let expense: f64 = table.rows().iter().map(|r| r.expense).sum();
    let profit = revenue - expense;
    let margin = if revenue > 0.0 {
        profit / revenue * 100.0
    } else {
        0.0
    };

    let (receivable, payable) = outstanding(table);

    Totals {
        revenue,
        expense,
        profit,
        margin,
        expense_categories: expense_by_category(table),
        receivable,
        payable,
        inventory: closing_inventory(table),
        loan_total: largest_loan(table),
        gst_collected: table.sum_of(OptionalColumn::GstCollected, |r| r.gst_collected),
        gst_paid: table.sum_of(OptionalColumn::GstPaid, |r| r.gst_paid),
        industry: industry(table),
    }
}

fn expense_by_category(table: &TransactionTable) -> BTreeMap<String, f64> {
    let mut categories = BTreeMap::new();
    if !table.has(OptionalColumn::ExpenseCategory) {
        return categories;
    }
    for row in table.rows() {
        if let Some(category) = &row.expense_category {
            *categories.entry(category.clone()).or_insert(0.0) += row.expense;
        }
    }
    categories
}

fn outstanding(table: &TransactionTable) -> (f64, f64) {
    if !(table.has(OptionalColumn::EntryType) && table.has(OptionalColumn::Amount)) {
        return (0.0, 0.0);
    }

    let sum_for = |kind: &str| -> f64 {
        table
            .rows()
            .iter()
            .filter(|r| r.entry_type.as_deref() == Some(kind))
            .filter_map(|r| r.amount)
            .sum()
    };

    (sum_for("receivable"), sum_for("payable"))
}

/// Closing stock is whatever the last row reports.
fn closing_inventory(table: &TransactionTable) -> f64 {
    if !table.has(OptionalColumn::InventoryClosing) {
        return 0.0;
    }
    table
        .rows()
        .last()
        .and_then(|r| r.inventory_closing)
        .unwrap_or(0.0)
}

fn largest_loan(table: &TransactionTable) -> f64 {
    if !table.has(OptionalColumn::LoanAmount) {
        return 0.0;
    }
    table
        .rows()
        .iter()
        .filter_map(|r| r.loan_amount)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

fn industry(table: &TransactionTable) -> String {
    if !table.has(OptionalColumn::Industry) {
        return DEFAULT_INDUSTRY.to_string();
    }
    table
        .rows()
        .first()
        .and_then(|r| r.industry.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_INDUSTRY)
        .to_string()
}
