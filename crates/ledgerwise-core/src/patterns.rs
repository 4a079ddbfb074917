//! Per-category spending breakdown over a window of months

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ExpenseCategory;
use crate::stats::{all_finite, round_to};

/// Last month above this multiple of the earlier monthly average is increasing
const INCREASING_RATIO: f64 = 1.2;
/// Last month below this multiple of the earlier monthly average is decreasing
const DECREASING_RATIO: f64 = 0.8;

/// Aggregated spend for one category over the analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub category: ExpenseCategory,
    pub total: f64,
    pub count: u32,
    /// Spend in the most recent month of the window
    #[serde(default)]
    pub last_month_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl SpendingTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Stable => "stable",
            Self::Decreasing => "decreasing",
        }
    }

    /// Compare the latest month against the average of the earlier months
    fn classify(last_month: f64, previous_average: f64) -> Self {
        if last_month < previous_average * DECREASING_RATIO {
            Self::Decreasing
        } else if last_month > previous_average * INCREASING_RATIO {
            Self::Increasing
        } else {
            Self::Stable
        }
    }
}

impl std::fmt::Display for SpendingTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPattern {
    pub category: ExpenseCategory,
    pub total_spent: f64,
    /// Share of all spending in the window, in percent
    pub percentage: f64,
    pub transaction_count: u32,
    pub average_amount: f64,
    pub trend: SpendingTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPatternReport {
    /// Largest category first
    pub patterns: Vec<SpendingPattern>,
    pub total_analyzed: f64,
    pub period_months: u32,
}

/// Break spending down by category and label each category's trend
pub fn analyze_spending_patterns(
    totals: &[CategoryTotals],
    months: u32,
) -> Result<SpendingPatternReport> {
    if months == 0 {
        return Err(Error::InvalidInput(
            "analysis window must cover at least one month".to_string(),
        ));
    }
    let amounts: Vec<f64> = totals
        .iter()
        .flat_map(|t| [t.total, t.last_month_total])
        .collect();
    if !all_finite(&amounts) {
        return Err(Error::InvalidInput(
            "category totals contain a non-finite value".to_string(),
        ));
    }

    let grand_total: f64 = totals.iter().map(|t| t.total).sum();

    let mut patterns: Vec<SpendingPattern> = totals
        .iter()
        .map(|t| {
            let percentage = if grand_total > 0.0 {
                t.total / grand_total * 100.0
            } else {
                0.0
            };
            let average_amount = if t.count > 0 {
                t.total / t.count as f64
            } else {
                0.0
            };
            let previous_average = if months > 1 {
                (t.total - t.last_month_total) / (months - 1) as f64
            } else {
                t.total
            };

            SpendingPattern {
                category: t.category,
                total_spent: round_to(t.total, 2),
                percentage: round_to(percentage, 1),
                transaction_count: t.count,
                average_amount: round_to(average_amount, 2),
                trend: SpendingTrend::classify(t.last_month_total, previous_average),
            }
        })
        .collect();

    patterns.sort_by(|a, b| {
        b.total_spent
            .partial_cmp(&a.total_spent)
            .unwrap_or(Ordering::Equal)
    });

    Ok(SpendingPatternReport {
        patterns,
        total_analyzed: round_to(grand_total, 2),
        period_months: months,
    })
}
