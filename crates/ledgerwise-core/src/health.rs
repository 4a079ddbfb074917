//! Financial health scoring
//!
//! Starts from a perfect 10 and subtracts fixed penalties for budget usage,
//! cash flow, anomalies, approval backlog and runway. Each penalty that
//! applies is itemized as a [`HealthFactor`]; most also add a recommendation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HealthSettings;
use crate::models::{format_money, HealthFactor};
use crate::stats::round_to;

const MAX_SCORE: f64 = 10.0;
const DEFAULT_RECOMMENDATION: &str = "Maintain current financial practices";

/// The conditions that lower the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthFactorKind {
    BudgetOverrun,
    NearBudgetLimit,
    NegativeCashFlow,
    LowProfitMargin,
    HighAnomalies,
    SomeAnomalies,
    ManyPendingApprovals,
    LowRunway,
}

impl HealthFactorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BudgetOverrun => "Budget Overrun",
            Self::NearBudgetLimit => "Near Budget Limit",
            Self::NegativeCashFlow => "Negative Cash Flow",
            Self::LowProfitMargin => "Low Profit Margin",
            Self::HighAnomalies => "High Anomalies",
            Self::SomeAnomalies => "Some Anomalies",
            Self::ManyPendingApprovals => "Many Pending Approvals",
            Self::LowRunway => "Low Runway",
        }
    }

    /// Points subtracted from the score (negative)
    pub fn impact(&self) -> f64 {
        match self {
            Self::BudgetOverrun | Self::NegativeCashFlow => -3.0,
            Self::HighAnomalies => -2.0,
            Self::NearBudgetLimit | Self::LowProfitMargin => -1.5,
            Self::SomeAnomalies | Self::ManyPendingApprovals | Self::LowRunway => -1.0,
        }
    }

    /// Canned advice for this factor; the margin and near-limit warnings
    /// carry none of their own
    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            Self::BudgetOverrun => Some("Review and reduce non-essential expenses"),
            Self::NegativeCashFlow => Some("Increase revenue or reduce operating costs"),
            Self::HighAnomalies | Self::SomeAnomalies => {
                Some("Investigate and approve/reject flagged expenses")
            }
            Self::ManyPendingApprovals => Some("Process pending expense approvals"),
            Self::LowRunway => Some("Seek additional funding or reduce burn rate"),
            Self::NearBudgetLimit | Self::LowProfitMargin => None,
        }
    }

    fn factor(&self, detail: String) -> HealthFactor {
        HealthFactor {
            name: self.name().to_string(),
            impact: self.impact(),
            detail,
        }
    }
}

impl std::fmt::Display for HealthFactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Letter-style grade for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::Excellent
        } else if score >= 6.0 {
            Self::Good
        } else if score >= 4.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Display color used by dashboards
    pub fn color(&self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::Good => "blue",
            Self::Fair => "yellow",
            Self::Poor => "red",
        }
    }
}

impl std::fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current-month figures the score is computed from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthInputs {
    /// Monthly spend as a percentage of the monthly limit, if a limit is set
    pub budget_usage_pct: Option<f64>,
    pub cash_flow: f64,
    pub monthly_revenue: f64,
    pub anomaly_count: u32,
    pub pending_count: u32,
    /// Months of total budget left at this month's spend, if known
    pub runway_months: Option<f64>,
}

impl HealthInputs {
    /// Derive the inputs from raw monthly totals
    ///
    /// Usage is only known with a positive monthly limit; runway only with a
    /// non-zero total budget and some spending this month.
    pub fn from_totals(
        monthly_expenses: f64,
        monthly_revenue: f64,
        monthly_budget_limit: Option<f64>,
        total_budget: Option<f64>,
        anomaly_count: u32,
        pending_count: u32,
    ) -> Self {
        let budget_usage_pct = monthly_budget_limit
            .filter(|limit| *limit > 0.0)
            .map(|limit| monthly_expenses * 100.0 / limit);

        let runway_months = total_budget
            .filter(|budget| *budget != 0.0 && monthly_expenses > 0.0)
            .map(|budget| budget / monthly_expenses);

        Self {
            budget_usage_pct,
            cash_flow: monthly_revenue - monthly_expenses,
            monthly_revenue,
            anomaly_count,
            pending_count,
            runway_months,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: f64,
    pub grade: HealthGrade,
    pub color: String,
    pub factors: Vec<HealthFactor>,
    pub recommendations: Vec<String>,
}

/// Composite 0-10 health scorer
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    settings: HealthSettings,
}

impl HealthScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: HealthSettings) -> Self {
        Self { settings }
    }

    pub fn score(&self, inputs: &HealthInputs) -> HealthReport {
        let s = &self.settings;
        let mut fired: Vec<(HealthFactorKind, String)> = Vec::new();

        if let Some(usage) = inputs.budget_usage_pct {
            let detail = format!("{:.1}% of budget used", usage);
            if usage > s.over_budget_percent {
                fired.push((HealthFactorKind::BudgetOverrun, detail));
            } else if usage > s.near_budget_percent {
                fired.push((HealthFactorKind::NearBudgetLimit, detail));
            }
        }

        if inputs.cash_flow < 0.0 {
            fired.push((
                HealthFactorKind::NegativeCashFlow,
                format!("{} deficit", format_money(inputs.cash_flow.abs())),
            ));
        } else if inputs.monthly_revenue > 0.0 {
            let margin = inputs.cash_flow / inputs.monthly_revenue;
            if margin < s.low_margin_ratio {
                fired.push((
                    HealthFactorKind::LowProfitMargin,
                    format!("{:.1}% margin", margin * 100.0),
                ));
            }
        }

        let anomalies = inputs.anomaly_count;
        if anomalies > s.high_anomalies {
            fired.push((
                HealthFactorKind::HighAnomalies,
                format!("{} unusual expenses", anomalies),
            ));
        } else if anomalies > s.some_anomalies {
            fired.push((
                HealthFactorKind::SomeAnomalies,
                format!("{} unusual expenses", anomalies),
            ));
        }

        if inputs.pending_count > s.pending_backlog {
            fired.push((
                HealthFactorKind::ManyPendingApprovals,
                format!("{} expenses pending", inputs.pending_count),
            ));
        }

        if let Some(runway) = inputs.runway_months {
            if runway < s.low_runway_months {
                fired.push((
                    HealthFactorKind::LowRunway,
                    format!("{:.1} months remaining", runway),
                ));
            }
        }

        let penalty: f64 = fired.iter().map(|(kind, _)| kind.impact()).sum();
        let score = round_to((MAX_SCORE + penalty).clamp(0.0, MAX_SCORE), 1);
        let grade = HealthGrade::from_score(score);

        let mut recommendations: Vec<String> = Vec::new();
        for text in fired.iter().filter_map(|(kind, _)| kind.recommendation()) {
            if !recommendations.iter().any(|r| r == text) {
                recommendations.push(text.to_string());
            }
        }
        if recommendations.is_empty() {
            recommendations.push(DEFAULT_RECOMMENDATION.to_string());
        }

        debug!(score, grade = grade.as_str(), factors = fired.len(), "Scored financial health");

        HealthReport {
            score,
            grade,
            color: grade.color().to_string(),
            factors: fired
                .into_iter()
                .map(|(kind, detail)| kind.factor(detail))
                .collect(),
            recommendations,
        }
    }
}
