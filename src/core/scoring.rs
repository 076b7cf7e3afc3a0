//! Sub-scores and the weighted credit score.
//!
//! Every sub-score lives on 0..=100. The credit score is a heuristic blend,
//! not a calibrated model.

use crate::core::aggregate::Totals;
use crate::core::thresholds::HealthThresholds;
use crate::domain::model::{OptionalColumn, TransactionTable};
use serde::Serialize;

pub const MARGIN_WEIGHT: f64 = 0.30;
pub const CASHFLOW_WEIGHT: f64 = 0.25;
pub const EXPENSE_WEIGHT: f64 = 0.20;
pub const GROWTH_WEIGHT: f64 = 0.15;
pub const DEBT_WEIGHT: f64 = 0.10;

/// Debt sub-score when the table carries no EMI data.
pub const DEFAULT_DEBT_SCORE: f64 = 80.0;

/// Forecast is the average period revenue grown by 5%.
pub const FORECAST_GROWTH: f64 = 1.05;

const MARGIN_RANGE: (f64, f64) = (0.0, 40.0);
const CASHFLOW_STD_RANGE: (f64, f64) = (0.0, 20_000.0);
const EXPENSE_RATIO_RANGE: (f64, f64) = (0.3, 1.0);
const GROWTH_RANGE: (f64, f64) = (-0.2, 0.3);
const DEBT_RATIO_RANGE: (f64, f64) = (0.0, 0.5);

/// Linear rescale of `value` from `[min, max]` onto `[0, 100]`, clamped.
/// A degenerate range yields the midpoint.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 50.0;
    }
    let score = (value - min) / (max - min) * 100.0;
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditBreakdown {
    pub margin_score: f64,
    pub cashflow_score: f64,
    pub expense_score: f64,
    pub growth_score: f64,
    pub debt_score: f64,
}

impl CreditBreakdown {
    pub fn weighted(&self) -> f64 {
        self.margin_score * MARGIN_WEIGHT
            + self.cashflow_score * CASHFLOW_WEIGHT
            + self.expense_score * EXPENSE_WEIGHT
            + self.growth_score * GROWTH_WEIGHT
            + self.debt_score * DEBT_WEIGHT
    }

    pub fn score(&self) -> u8 {
        self.weighted().round_ties_even().clamp(0.0, 100.0) as u8
    }
}

pub fn credit_breakdown(table: &TransactionTable, totals: &Totals) -> CreditBreakdown {
    let margin_score = normalize(totals.margin, MARGIN_RANGE.0, MARGIN_RANGE.1);

    let volatility = population_std_dev(table.rows().iter().map(|r| r.cashflow()));
    let cashflow_score = 100.0 - normalize(volatility, CASHFLOW_STD_RANGE.0, CASHFLOW_STD_RANGE.1);

    let expense_ratio = if totals.revenue > 0.0 {
        totals.expense / totals.revenue
    } else {
        1.0
    };
    let expense_score =
        100.0 - normalize(expense_ratio, EXPENSE_RATIO_RANGE.0, EXPENSE_RATIO_RANGE.1);

    let growth_score = if table.len() < 2 {
        0.0
    } else {
        normalize(mean_growth(table), GROWTH_RANGE.0, GROWTH_RANGE.1)
    };

    let debt_score = if table.has(OptionalColumn::EmiAmount) {
        let emi = table.sum_of(OptionalColumn::EmiAmount, |r| r.emi_amount);
        let debt_ratio = if totals.revenue > 0.0 {
            emi / totals.revenue
        } else {
            1.0
        };
        100.0 - normalize(debt_ratio, DEBT_RATIO_RANGE.0, DEBT_RATIO_RANGE.1)
    } else {
        DEFAULT_DEBT_SCORE
    };

    CreditBreakdown {
        margin_score,
        cashflow_score,
        expense_score,
        growth_score,
        debt_score,
    }
}

pub fn compute_credit_score(table: &TransactionTable, totals: &Totals) -> u8 {
    credit_breakdown(table, totals).score()
}

/// Coarse health proxy driven by margin alone. Rounds to the nearest integer
/// rather than truncating, so margin 19.6 scores 70, not 69.
pub fn health_score(margin: f64, thresholds: &HealthThresholds) -> u8 {
    (margin + thresholds.margin_offset)
        .clamp(0.0, 100.0)
        .round() as u8
}

pub fn forecast(table: &TransactionTable) -> f64 {
    if table.is_empty() {
        return 0.0;
    }
    let mean = table.rows().iter().map(|r| r.revenue).sum::<f64>() / table.len() as f64;
    round2(mean * FORECAST_GROWTH)
}

fn population_std_dev(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Mean period-over-period revenue growth. Periods following a zero-revenue
/// period have no defined rate and are skipped, so `[0, 1000, 1000]` averages
/// the single defined rate (0.0) instead of saturating growth to 100 through
/// an infinite percentage change.
fn mean_growth(table: &TransactionTable) -> f64 {
    let rates: Vec<f64> = table
        .rows()
        .windows(2)
        .filter(|pair| pair[0].revenue != 0.0)
        .map(|pair| (pair[1].revenue - pair[0].revenue) / pair[0].revenue)
        .collect();

    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}
