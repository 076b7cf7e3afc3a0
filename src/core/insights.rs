use crate::core::thresholds::NarrativeThresholds;
use crate::domain::model::{FallbackReason, InsightOutcome, InsightSource, Metrics, RiskLevel};
use crate::domain::ports::InsightProvider;
use async_trait::async_trait;

pub const TIP_LOW_MARGIN: &str = "Profit margin is low. Reduce costs immediately.";
pub const TIP_HIGH_RISK: &str = "High financial risk detected. Avoid new loans.";
pub const TIP_COLLECTIONS: &str = "Improve collection speed to strengthen cashflow.";
pub const TIP_HEALTHY: &str = "Financial performance looks healthy.";

/// Prompt sent to the language model: instructions followed by the figures it
/// should reason about.
pub fn build_prompt(metrics: &Metrics) -> String {
    format!(
        "You are a financial advisor.\n\n\
         Analyze this SME data and give:\n\
         1. Financial health summary\n\
         2. Risks\n\
         3. Cost optimization tips\n\
         4. Short actionable advice\n\n\
         DATA:\n\
         Revenue: {}\n\
         Expense: {}\n\
         Profit: {}\n\
         Margin: {}%\n\
         Credit Score: {}\n\
         Risk Level: {}\n\
         GST Collected: {}\n\
         GST Paid: {}\n\
         Receivable: {}\n\
         Payable: {}\n",
        metrics.revenue,
        metrics.expense,
        metrics.profit,
        metrics.margin,
        metrics.credit_score,
        metrics.risk_level,
        metrics.gst_collected,
        metrics.gst_paid,
        metrics.receivable,
        metrics.payable,
    )
}

/// Local narrative built from the same fields. Always non-empty.
pub fn rule_based_insights(metrics: &Metrics, thresholds: &NarrativeThresholds) -> String {
    let mut tips = Vec::new();

    if metrics.margin < thresholds.low_margin {
        tips.push(TIP_LOW_MARGIN);
    }
    if metrics.risk_level == RiskLevel::High {
        tips.push(TIP_HIGH_RISK);
    }
    if metrics.receivable > metrics.payable {
        tips.push(TIP_COLLECTIONS);
    }
    if tips.is_empty() {
        tips.push(TIP_HEALTHY);
    }

    tips.join(" ")
}

/// Turns a provider outcome into the text stored on the report.
pub fn resolve_insights(
    outcome: InsightOutcome,
    metrics: &Metrics,
    thresholds: &NarrativeThresholds,
) -> (String, InsightSource) {
    match outcome {
        InsightOutcome::Generated(text) if !text.trim().is_empty() => (text, InsightSource::Ai),
        InsightOutcome::Generated(_) => {
            tracing::warn!("Insight provider returned blank text, using rule-based insights");
            (rule_based_insights(metrics, thresholds), InsightSource::RuleBased)
        }
        InsightOutcome::Unavailable(FallbackReason::Disabled) => {
            tracing::debug!("AI insights disabled, using rule-based insights");
            (rule_based_insights(metrics, thresholds), InsightSource::RuleBased)
        }
        InsightOutcome::Unavailable(reason) => {
            tracing::warn!("⚠️ AI insights unavailable ({}), using rule-based insights", reason);
            (rule_based_insights(metrics, thresholds), InsightSource::RuleBased)
        }
    }
}

/// Provider used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledInsights;

#[async_trait]
impl InsightProvider for DisabledInsights {
    async fn generate(&self, _metrics: &Metrics) -> InsightOutcome {
        InsightOutcome::Unavailable(FallbackReason::Disabled)
    }
}
