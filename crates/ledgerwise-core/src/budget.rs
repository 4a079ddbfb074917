//! Budget utilization against a category budget

use serde::{Deserialize, Serialize};

use crate::models::{BudgetConfig, ExpenseCategory};
use crate::stats::round_to;

/// Where monthly spending stands relative to the alert threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Alert,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Alert => "alert",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetUtilization {
    pub category: ExpenseCategory,
    pub monthly_limit: f64,
    pub monthly_spent: f64,
    pub monthly_remaining: f64,
    pub monthly_usage_percent: f64,
    pub yearly_spent: f64,
    /// Yearly limit minus yearly spend (a missing yearly limit counts as 0)
    pub yearly_remaining: f64,
    pub status: BudgetStatus,
}

/// Compare this month's and this year's spend against a budget
///
/// A budget with no positive monthly limit has no usage percentage; any
/// spending against it counts as exceeded.
pub fn budget_utilization(
    budget: &BudgetConfig,
    monthly_spent: f64,
    yearly_spent: f64,
) -> BudgetUtilization {
    let limit = budget.monthly_limit;

    let (usage, status) = if limit > 0.0 {
        let usage = monthly_spent * 100.0 / limit;
        let status = if usage > 100.0 {
            BudgetStatus::Exceeded
        } else if usage >= budget.alert_threshold {
            BudgetStatus::Alert
        } else {
            BudgetStatus::OnTrack
        };
        (usage, status)
    } else if monthly_spent > 0.0 {
        (0.0, BudgetStatus::Exceeded)
    } else {
        (0.0, BudgetStatus::OnTrack)
    };

    BudgetUtilization {
        category: budget.category,
        monthly_limit: round_to(limit, 2),
        monthly_spent: round_to(monthly_spent, 2),
        monthly_remaining: round_to(limit - monthly_spent, 2),
        monthly_usage_percent: round_to(usage, 1),
        yearly_spent: round_to(yearly_spent, 2),
        yearly_remaining: round_to(budget.yearly_limit.unwrap_or(0.0) - yearly_spent, 2),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marketing_budget() -> BudgetConfig {
        BudgetConfig {
            category: ExpenseCategory::Marketing,
            year: 2026,
            monthly_limit: 5000.0,
            yearly_limit: Some(60000.0),
            alert_threshold: 80.0,
        }
    }

    #[test]
    fn test_on_track() {
        let u = budget_utilization(&marketing_budget(), 2000.0, 21000.0);
        assert_eq!(u.status, BudgetStatus::OnTrack);
        assert_eq!(u.monthly_remaining, 3000.0);
        assert_eq!(u.monthly_usage_percent, 40.0);
        assert_eq!(u.yearly_remaining, 39000.0);
    }

    #[test]
    fn test_alert_band_is_inclusive() {
        assert_eq!(
            budget_utilization(&marketing_budget(), 4000.0, 0.0).status,
            BudgetStatus::Alert
        );
        assert_eq!(
            budget_utilization(&marketing_budget(), 5000.0, 0.0).status,
            BudgetStatus::Alert
        );
    }

    #[test]
    fn test_exceeded() {
        let u = budget_utilization(&marketing_budget(), 5500.0, 0.0);
        assert_eq!(u.status, BudgetStatus::Exceeded);
        assert_eq!(u.monthly_remaining, -500.0);
        assert_eq!(u.monthly_usage_percent, 110.0);
    }

    #[test]
    fn test_missing_yearly_limit() {
        let budget = BudgetConfig {
            yearly_limit: None,
            ..marketing_budget()
        };
        assert_eq!(budget_utilization(&budget, 0.0, 1200.0).yearly_remaining, -1200.0);
    }

    #[test]
    fn test_zero_monthly_limit() {
        let budget = BudgetConfig {
            monthly_limit: 0.0,
            ..marketing_budget()
        };
        assert_eq!(
            budget_utilization(&budget, 0.0, 0.0).status,
            BudgetStatus::OnTrack
        );
        let spent = budget_utilization(&budget, 10.0, 10.0);
        assert_eq!(spent.status, BudgetStatus::Exceeded);
        assert_eq!(spent.monthly_usage_percent, 0.0);
    }
}
