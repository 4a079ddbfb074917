//! Expense anomaly detection
//!
//! Flags a single expense as unusual relative to its category history and
//! budget. Rules are evaluated independently:
//! - Z-score: more than 3 standard deviations from the category mean
//! - Multiple of average: more than 3x the category mean
//! - Budget share: more than half of the category's budget limit
//! - Round number: a large amount that is an exact multiple of $1,000
//! - Category ceiling: above a fixed per-category dollar ceiling
//!
//! Every rule that fires contributes a reason; reasons are joined with `"; "`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{format_money, ExpenseCategory};
use crate::stats::{mean, std_dev};

/// Fixed dollar ceiling for a category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryCeiling {
    pub category: ExpenseCategory,
    pub ceiling: f64,
}

/// Anomaly detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Minimum history length before statistical rules apply
    pub min_history: usize,
    /// Absolute z-score above which an amount is flagged
    pub z_score_threshold: f64,
    /// Flag amounts above this multiple of the category mean
    pub average_multiplier: f64,
    /// Flag single expenses above this fraction of the budget limit
    pub budget_fraction: f64,
    /// Smallest amount checked by the round-number rule
    pub round_number_min: f64,
    /// Round-number rule divisor
    pub round_number_step: f64,
    /// Per-category ceilings, ordered by category
    pub category_ceilings: Vec<CategoryCeiling>,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_history: 3,
            z_score_threshold: 3.0,
            average_multiplier: 3.0,
            budget_fraction: 0.5,
            round_number_min: 10_000.0,
            round_number_step: 1_000.0,
            category_ceilings: vec![
                CategoryCeiling {
                    category: ExpenseCategory::Travel,
                    ceiling: 5000.0,
                },
                CategoryCeiling {
                    category: ExpenseCategory::Office,
                    ceiling: 2000.0,
                },
                CategoryCeiling {
                    category: ExpenseCategory::Food,
                    ceiling: 500.0,
                },
            ],
        }
    }
}

/// Which rule flagged an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRule {
    ZScore,
    AverageMultiple,
    BudgetShare,
    RoundNumber,
    CategoryCeiling,
}

impl AnomalyRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZScore => "z_score",
            Self::AverageMultiple => "average_multiple",
            Self::BudgetShare => "budget_share",
            Self::RoundNumber => "round_number",
            Self::CategoryCeiling => "category_ceiling",
        }
    }
}

impl std::fmt::Display for AnomalyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of checking one expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyCheck {
    pub is_anomaly: bool,
    /// All fired reasons joined with "; ", or None when nothing fired
    pub reason: Option<String>,
    /// Rules that fired, in evaluation order
    pub rules: Vec<AnomalyRule>,
}

impl AnomalyCheck {
    fn from_findings(findings: Vec<(AnomalyRule, String)>) -> Self {
        if findings.is_empty() {
            return Self {
                is_anomaly: false,
                reason: None,
                rules: Vec::new(),
            };
        }

        let (rules, reasons): (Vec<_>, Vec<_>) = findings.into_iter().unzip();
        Self {
            is_anomaly: true,
            reason: Some(reasons.join("; ")),
            rules,
        }
    }
}

/// Rule-based anomaly detector
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnomalyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnomalyConfig {
        &self.config
    }

    /// Check an expense against its category history and optional budget limit
    pub fn detect(
        &self,
        amount: f64,
        category: ExpenseCategory,
        historical_amounts: &[f64],
        budget_limit: Option<f64>,
    ) -> AnomalyCheck {
        let cfg = &self.config;
        let mut findings: Vec<(AnomalyRule, String)> = Vec::new();

        if historical_amounts.len() >= cfg.min_history {
            let avg = mean(historical_amounts);
            let sd = std_dev(historical_amounts);

            if sd > 0.0 {
                let z_score = (amount - avg) / sd;
                if z_score.abs() > cfg.z_score_threshold {
                    findings.push((
                        AnomalyRule::ZScore,
                        format!(
                            "Amount {} is {:.1} std deviations from average {}",
                            format_money(amount),
                            z_score.abs(),
                            format_money(avg)
                        ),
                    ));
                }
            }

            if amount > avg * cfg.average_multiplier {
                findings.push((
                    AnomalyRule::AverageMultiple,
                    format!(
                        "Amount {} is {}x higher than category average {}",
                        format_money(amount),
                        cfg.average_multiplier,
                        format_money(avg)
                    ),
                ));
            }
        }

        if let Some(limit) = budget_limit.filter(|l| *l > 0.0) {
            if amount > limit * cfg.budget_fraction {
                findings.push((
                    AnomalyRule::BudgetShare,
                    format!(
                        "Single expense {} exceeds {}% of budget limit {}",
                        format_money(amount),
                        cfg.budget_fraction * 100.0,
                        format_money(limit)
                    ),
                ));
            }
        }

        if amount >= cfg.round_number_min && amount % cfg.round_number_step == 0.0 {
            findings.push((
                AnomalyRule::RoundNumber,
                format!("Unusually round large amount: {}", format_money(amount)),
            ));
        }

        if let Some(ceiling) = cfg
            .category_ceilings
            .iter()
            .find(|c| c.category == category)
        {
            if amount > ceiling.ceiling {
                findings.push((
                    AnomalyRule::CategoryCeiling,
                    format!(
                        "Amount {} exceeds typical {} expense threshold {}",
                        format_money(amount),
                        category,
                        format_money(ceiling.ceiling)
                    ),
                ));
            }
        }

        if !findings.is_empty() {
            debug!(
                category = category.as_str(),
                amount,
                rules = findings.len(),
                "Expense flagged as anomalous"
            );
        }

        AnomalyCheck::from_findings(findings)
    }
}
