use crate::core::thresholds::{CreditTierThresholds, RiskThresholds, SuggestionThresholds};
use crate::domain::model::{Benchmark, Metrics, RiskLevel};

pub const SUGGEST_REDUCE_EXPENSES: &str = "Reduce unnecessary expenses";
pub const SUGGEST_HIGH_COSTS: &str = "High operating costs detected";
pub const SUGGEST_IMPROVE_BEFORE_LOANS: &str = "Improve profitability before taking loans";
pub const SUGGEST_HEALTHY: &str = "Financial performance looks healthy";

pub const RISK_OPERATING_LOSS: &str = "Business operating at loss";
pub const RISK_LOW_PROFITABILITY: &str = "Low profitability";
pub const RISK_LOW_CREDITWORTHINESS: &str = "Low creditworthiness";
pub const RISK_HIGH_PAYABLES: &str = "High outstanding payables";
pub const RISK_STABLE: &str = "Financial position stable";

/// Average margin (percent) per industry. Anything unlisted uses the
/// `General` target.
const INDUSTRY_AVERAGE_MARGIN: &[(&str, f64)] = &[
    ("Retail", 20.0),
    ("Manufacturing", 25.0),
    ("Services", 30.0),
    ("Logistics", 18.0),
    ("Agriculture", 15.0),
    ("E-commerce", 22.0),
];

const GENERAL_AVERAGE_MARGIN: f64 = 20.0;

pub fn risk_level(credit_score: u8, tiers: &CreditTierThresholds) -> RiskLevel {
    if credit_score >= tiers.low_risk_min {
        RiskLevel::Low
    } else if credit_score >= tiers.medium_risk_min {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

pub fn industry_target(industry: &str) -> f64 {
    INDUSTRY_AVERAGE_MARGIN
        .iter()
        .find(|(name, _)| *name == industry)
        .map(|(_, target)| *target)
        .unwrap_or(GENERAL_AVERAGE_MARGIN)
}

pub fn benchmark(margin: f64, industry: &str) -> Benchmark {
    if margin >= industry_target(industry) {
        Benchmark::Above
    } else {
        Benchmark::Below
    }
}

/// Cost-optimisation advice. Never empty.
pub fn suggestions(
    margin: f64,
    revenue: f64,
    expense: f64,
    credit_score: u8,
    thresholds: &SuggestionThresholds,
) -> Vec<String> {
    let mut out = Vec::new();

    if margin < thresholds.low_margin {
        out.push(SUGGEST_REDUCE_EXPENSES.to_string());
    }
    if expense > revenue * thresholds.expense_ratio {
        out.push(SUGGEST_HIGH_COSTS.to_string());
    }
    if credit_score < thresholds.weak_credit {
        out.push(SUGGEST_IMPROVE_BEFORE_LOANS.to_string());
    }

    if out.is_empty() {
        out.push(SUGGEST_HEALTHY.to_string());
    }
    out
}

/// Risk flags read off an assembled result. Never empty.
pub fn detect_risks(metrics: &Metrics, thresholds: &RiskThresholds) -> Vec<String> {
    let mut risks = Vec::new();

    if metrics.profit < 0.0 {
        risks.push(RISK_OPERATING_LOSS.to_string());
    }
    if metrics.margin < thresholds.low_margin {
        risks.push(RISK_LOW_PROFITABILITY.to_string());
    }
    if metrics.credit_score < thresholds.weak_credit {
        risks.push(RISK_LOW_CREDITWORTHINESS.to_string());
    }
    if metrics.payable > metrics.receivable {
        risks.push(RISK_HIGH_PAYABLES.to_string());
    }

    if risks.is_empty() {
        risks.push(RISK_STABLE.to_string());
    }
    risks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn metrics() -> Metrics {
        Metrics {
            revenue: 10_000.0,
            expense: 6_000.0,
            profit: 4_000.0,
            margin: 40.0,
            health_score: 90,
            credit_score: 85,
            risk_level: RiskLevel::Low,
            forecast: 5_250.0,
            benchmark: Benchmark::Above,
            industry: "General".to_string(),
            expense_categories: BTreeMap::new(),
            suggestions: vec![SUGGEST_HEALTHY.to_string()],
            receivable: 0.0,
            payable: 0.0,
            inventory: 0.0,
            loan_total: 0.0,
            gst_collected: 0.0,
            gst_paid: 0.0,
        }
    }

    #[test]
    fn test_risk_tiers_are_inclusive_lower_bounds() {
        let tiers = CreditTierThresholds::default();
        assert_eq!(risk_level(100, &tiers), RiskLevel::Low);
        assert_eq!(risk_level(80, &tiers), RiskLevel::Low);
        assert_eq!(risk_level(79, &tiers), RiskLevel::Medium);
        assert_eq!(risk_level(60, &tiers), RiskLevel::Medium);
        assert_eq!(risk_level(59, &tiers), RiskLevel::High);
        assert_eq!(risk_level(0, &tiers), RiskLevel::High);
    }

    #[test]
    fn test_benchmark_targets() {
        assert_eq!(industry_target("Services"), 30.0);
        assert_eq!(industry_target("E-commerce"), 22.0);
        assert_eq!(industry_target("General"), 20.0);
        assert_eq!(industry_target("Mining"), 20.0);
        assert_eq!(benchmark(30.0, "Services"), Benchmark::Above);
        assert_eq!(benchmark(29.99, "Services"), Benchmark::Below);
        assert_eq!(benchmark(15.0, "Agriculture"), Benchmark::Above);
    }

    #[test]
    fn test_suggestions_boundary_margin_does_not_trigger() {
        let t = SuggestionThresholds::default();
        let out = suggestions(20.0, 2000.0, 1600.0, 60, &t);
        assert!(!out.contains(&SUGGEST_REDUCE_EXPENSES.to_string()));
        // 1600 is not > 1600
        assert_eq!(out, vec![SUGGEST_HEALTHY.to_string()]);
    }

    #[test]
    fn test_suggestions_all_conditions_in_order() {
        let t = SuggestionThresholds::default();
        let out = suggestions(5.0, 1000.0, 950.0, 30, &t);
        assert_eq!(
            out,
            vec![
                SUGGEST_REDUCE_EXPENSES.to_string(),
                SUGGEST_HIGH_COSTS.to_string(),
                SUGGEST_IMPROVE_BEFORE_LOANS.to_string(),
            ]
        );
    }

    #[test]
    fn test_risks_fallback_when_nothing_triggers() {
        let risks = detect_risks(&metrics(), &RiskThresholds::default());
        assert_eq!(risks, vec![RISK_STABLE.to_string()]);
    }

    #[test]
    fn test_risks_all_conditions_in_order() {
        let mut m = metrics();
        m.profit = -100.0;
        m.margin = -1.0;
        m.credit_score = 40;
        m.payable = 500.0;
        m.receivable = 100.0;
        let risks = detect_risks(&m, &RiskThresholds::default());
        assert_eq!(
            risks,
            vec![
                RISK_OPERATING_LOSS.to_string(),
                RISK_LOW_PROFITABILITY.to_string(),
                RISK_LOW_CREDITWORTHINESS.to_string(),
                RISK_HIGH_PAYABLES.to_string(),
            ]
        );
    }

    #[test]
    fn test_equal_payables_do_not_flag() {
        let mut m = metrics();
        m.payable = 250.0;
        m.receivable = 250.0;
        let risks = detect_risks(&m, &RiskThresholds::default());
        assert!(!risks.contains(&RISK_HIGH_PAYABLES.to_string()));
    }
}
