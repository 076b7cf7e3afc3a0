use crate::core::advisor;
use crate::core::aggregate::aggregate;
use crate::core::scoring::{self, round2};
use crate::core::thresholds::Thresholds;
use crate::domain::model::{Metrics, TransactionTable};

/// Single pass over the table: aggregate, score, classify.
///
/// Infallible by contract. Missing optional columns fall back to their
/// documented defaults; required columns are checked by the reader before
/// the table is built.
pub fn compute_metrics(table: &TransactionTable, thresholds: &Thresholds) -> Metrics {
    let totals = aggregate(table);

    let health_score = scoring::health_score(totals.margin, &thresholds.health);
    let credit_score = scoring::compute_credit_score(table, &totals);
    let risk_level = advisor::risk_level(credit_score, &thresholds.credit);
    let benchmark = advisor::benchmark(totals.margin, &totals.industry);
    let suggestions = advisor::suggestions(
        totals.margin,
        totals.revenue,
        totals.expense,
        credit_score,
        &thresholds.suggestions,
    );

    tracing::debug!(
        rows = table.len(),
        credit_score,
        health_score,
        %risk_level,
        "metrics computed"
    );

    Metrics {
        revenue: totals.revenue,
        expense: totals.expense,
        profit: totals.profit,
        margin: round2(totals.margin),
        health_score,
        credit_score,
        risk_level,
        forecast: scoring::forecast(table),
        benchmark,
        industry: totals.industry,
        expense_categories: totals.expense_categories,
        suggestions,
        receivable: totals.receivable,
        payable: totals.payable,
        inventory: totals.inventory,
        loan_total: totals.loan_total,
        gst_collected: totals.gst_collected,
        gst_paid: totals.gst_paid,
    }
}
