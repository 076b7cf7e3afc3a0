//! Named cutoffs for every rule in the engine.
//!
//! The health proxy, the credit tiers, the suggestion list, the risk list and
//! the rule-based narrative each carry their own numbers. They are kept apart
//! on purpose: tightening one set must not move another.

use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthThresholds {
    /// Added to the margin percentage before clamping to 0..=100.
    pub margin_offset: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            margin_offset: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditTierThresholds {
    /// Credit score at or above which risk is `Low`.
    pub low_risk_min: u8,
    /// Credit score at or above which risk is `Medium`.
    pub medium_risk_min: u8,
}

impl Default for CreditTierThresholds {
    fn default() -> Self {
        Self {
            low_risk_min: 80,
            medium_risk_min: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionThresholds {
    pub low_margin: f64,
    /// Expense as a fraction of revenue above which costs are flagged.
    pub expense_ratio: f64,
    pub weak_credit: u8,
}

impl Default for SuggestionThresholds {
    fn default() -> Self {
        Self {
            low_margin: 20.0,
            expense_ratio: 0.8,
            weak_credit: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub low_margin: f64,
    pub weak_credit: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_margin: 10.0,
            weak_credit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeThresholds {
    pub low_margin: f64,
}

impl Default for NarrativeThresholds {
    fn default() -> Self {
        Self { low_margin: 15.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub health: HealthThresholds,
    pub credit: CreditTierThresholds,
    pub suggestions: SuggestionThresholds,
    pub risks: RiskThresholds,
    pub narrative: NarrativeThresholds,
}

impl Validate for Thresholds {
    fn validate(&self) -> Result<()> {
        validate_range("thresholds.credit.low_risk_min", self.credit.low_risk_min, 0, 100)?;
        validate_range(
            "thresholds.credit.medium_risk_min",
            self.credit.medium_risk_min,
            0,
            self.credit.low_risk_min,
        )?;
        validate_range("thresholds.suggestions.weak_credit", self.suggestions.weak_credit, 0, 100)?;
        validate_range("thresholds.risks.weak_credit", self.risks.weak_credit, 0, 100)?;
        validate_range("thresholds.suggestions.expense_ratio", self.suggestions.expense_ratio, 0.0, 10.0)?;
        Ok(())
    }
}
