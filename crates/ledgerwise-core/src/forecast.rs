//! Cash-flow, burn-rate and budget forecasting
//!
//! Projections start from the mean of the most recent months and add the
//! least squares trend of the full history. Months are approximated as 30
//! days when computing target months and depletion dates; downstream
//! consumers depend on that cadence, so it is kept rather than made
//! calendar-accurate.
//!
//! All amounts are rounded to cents, confidences to two decimals and
//! runway to one decimal.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{ExpenseCategory, Prediction};
use crate::stats::{all_finite, coefficient_of_variation, mean, round_to, std_dev, trend};

/// Days per forecast step
pub const DAYS_PER_MONTH: i64 = 30;
/// Months of history averaged to form the projection base
const RECENT_WINDOW: usize = 3;
/// Minimum history for a trend-based projection
const MIN_TREND_HISTORY: usize = 3;
/// Confidence used for flat projections from short history
pub const FLAT_CONFIDENCE: f64 = 0.4;

const BASE_CONFIDENCE: f64 = 0.3;
const MAX_PREDICTION_CONFIDENCE: f64 = 0.95;

/// Projected figures for one future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPrediction {
    pub month: u32,
    pub year: i32,
    pub predicted_expense: f64,
    pub predicted_revenue: f64,
    pub predicted_cash_flow: f64,
    pub confidence: f64,
}

/// Monthly burn and how long the budget lasts at that pace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnRate {
    pub burn_rate: f64,
    pub runway_months: Option<f64>,
    pub depletion_date: Option<NaiveDate>,
    pub confidence: f64,
}

/// End-of-month projection for a single budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverrun {
    pub predicted_total: f64,
    pub overrun_amount: f64,
    pub probability: f64,
    pub days_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Positive,
    Negative,
}

impl Outlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Outlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub average_predicted_cash_flow: f64,
    pub positive_cash_flow_months: usize,
    pub total_months_forecast: u32,
    pub outlook: Outlook,
}

/// Cash-flow predictions, burn rate and outlook in one payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub cash_flow_predictions: Vec<CashFlowPrediction>,
    pub burn_rate: BurnRate,
    pub summary: ForecastSummary,
}

/// Forecaster anchored at an as-of date
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    as_of: NaiveDate,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Forecaster {
    /// Forecaster anchored at today's date (UTC)
    pub fn new() -> Self {
        Self::as_of(Utc::now().date_naive())
    }

    /// Forecaster anchored at a fixed date
    pub fn as_of(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of
    }

    /// Project monthly expense, revenue and cash flow `months_ahead` months out
    ///
    /// With fewer than 3 points in either series the projection is flat at
    /// the plain mean (0 when empty) with low confidence.
    pub fn forecast(
        &self,
        expenses: &[f64],
        revenues: &[f64],
        months_ahead: u32,
    ) -> Result<Vec<CashFlowPrediction>> {
        validate_horizon(months_ahead)?;
        validate_series("expenses", expenses)?;
        validate_series("revenues", revenues)?;

        if expenses.len() < MIN_TREND_HISTORY || revenues.len() < MIN_TREND_HISTORY {
            let avg_expense = mean(expenses);
            let avg_revenue = mean(revenues);
            debug!(
                expense_points = expenses.len(),
                revenue_points = revenues.len(),
                "Short history, using flat projection"
            );

            return (1..=months_ahead)
                .map(|i| {
                    let (month, year) = self.target_month(i)?;
                    Ok(CashFlowPrediction {
                        month,
                        year,
                        predicted_expense: round_to(avg_expense, 2),
                        predicted_revenue: round_to(avg_revenue, 2),
                        predicted_cash_flow: round_to(avg_revenue - avg_expense, 2),
                        confidence: FLAT_CONFIDENCE,
                    })
                })
                .collect();
        }

        let expense_trend = trend(expenses);
        let revenue_trend = trend(revenues);
        let expense_base = mean(recent(expenses));
        let revenue_base = mean(recent(revenues));

        let combined: Vec<f64> = expenses.iter().chain(revenues).copied().collect();
        let confidence = round_to(prediction_confidence(&combined, expenses.len()), 2);

        debug!(
            expense_trend,
            revenue_trend, confidence, "Projecting cash flow from trend"
        );

        (1..=months_ahead)
            .map(|i| {
                let step = i as f64;
                let predicted_expense = (expense_base + expense_trend * step).max(0.0);
                let predicted_revenue = (revenue_base + revenue_trend * step).max(0.0);
                let (month, year) = self.target_month(i)?;

                Ok(CashFlowPrediction {
                    month,
                    year,
                    predicted_expense: round_to(predicted_expense, 2),
                    predicted_revenue: round_to(predicted_revenue, 2),
                    predicted_cash_flow: round_to(predicted_revenue - predicted_expense, 2),
                    confidence,
                })
            })
            .collect()
    }

    /// Monthly burn rate, weighted toward the latest month, and the runway it leaves
    pub fn burn_rate(&self, expenses: &[f64], total_budget: f64) -> Result<BurnRate> {
        validate_series("expenses", expenses)?;
        if !total_budget.is_finite() {
            return Err(Error::InvalidInput(
                "total budget must be a finite number".to_string(),
            ));
        }

        if expenses.is_empty() {
            return Ok(BurnRate {
                burn_rate: 0.0,
                runway_months: None,
                depletion_date: None,
                confidence: 0.0,
            });
        }

        let n = expenses.len();
        let burn_rate = if n >= 3 {
            expenses[n - 1] * 0.5 + mean(&expenses[n - 3..n - 1]) * 0.5
        } else {
            mean(expenses)
        };

        let (runway_months, depletion_date) = if burn_rate > 0.0 {
            let runway = total_budget / burn_rate;
            let days = (runway * DAYS_PER_MONTH as f64).floor();
            let depletion = Duration::try_days(days as i64)
                .and_then(|d| self.as_of.checked_add_signed(d));
            (Some(round_to(runway, 1)), depletion)
        } else {
            (None, None)
        };

        Ok(BurnRate {
            burn_rate: round_to(burn_rate, 2),
            runway_months,
            depletion_date,
            confidence: round_to(prediction_confidence(expenses, n), 2),
        })
    }

    /// Project this month's spend from the pace so far
    pub fn budget_overrun(
        &self,
        spent_so_far: f64,
        budget_limit: f64,
        days_elapsed: u32,
        days_in_month: u32,
    ) -> Result<BudgetOverrun> {
        if days_in_month == 0 {
            return Err(Error::InvalidInput(
                "days in month must be positive".to_string(),
            ));
        }
        if days_elapsed > days_in_month {
            return Err(Error::InvalidInput(format!(
                "days elapsed ({}) exceeds days in month ({})",
                days_elapsed, days_in_month
            )));
        }
        if !spent_so_far.is_finite() || !budget_limit.is_finite() {
            return Err(Error::InvalidInput(
                "spend and limit must be finite numbers".to_string(),
            ));
        }

        if days_elapsed == 0 {
            return Ok(BudgetOverrun {
                predicted_total: 0.0,
                overrun_amount: 0.0,
                probability: 0.0,
                days_remaining: days_in_month,
            });
        }

        let daily_rate = spent_so_far / days_elapsed as f64;
        let predicted_total = daily_rate * days_in_month as f64;
        let overrun_amount = (predicted_total - budget_limit).max(0.0);

        let probability = if predicted_total > budget_limit {
            let time_factor = days_elapsed as f64 / days_in_month as f64;
            (0.5 + time_factor * 0.5).min(0.95)
        } else {
            0.0
        };

        Ok(BudgetOverrun {
            predicted_total: round_to(predicted_total, 2),
            overrun_amount: round_to(overrun_amount, 2),
            probability: round_to(probability, 2),
            days_remaining: days_in_month - days_elapsed,
        })
    }

    /// Predict each category's spend `months_ahead` months out
    ///
    /// Categories with no history are skipped. Bounds are one sample
    /// standard deviation either side (20% of the base for a single point).
    pub fn predict_category_spending(
        &self,
        history: &BTreeMap<ExpenseCategory, Vec<f64>>,
        months_ahead: u32,
    ) -> Result<BTreeMap<ExpenseCategory, Prediction>> {
        validate_horizon(months_ahead)?;

        let mut predictions = BTreeMap::new();
        for (category, amounts) in history {
            if amounts.is_empty() {
                continue;
            }
            validate_series(category.as_str(), amounts)?;

            let slope = trend(amounts);
            let base = mean(recent(amounts));
            let value = (base + slope * months_ahead as f64).max(0.0);

            let spread = if amounts.len() > 1 {
                std_dev(amounts)
            } else {
                base * 0.2
            };

            predictions.insert(
                *category,
                Prediction {
                    value: round_to(value, 2),
                    confidence: round_to(prediction_confidence(amounts, amounts.len()), 2),
                    lower_bound: round_to((value - spread).max(0.0), 2),
                    upper_bound: round_to(value + spread, 2),
                },
            );
        }

        Ok(predictions)
    }

    /// Cash-flow forecast, burn rate and outlook summary together
    pub fn forecast_report(
        &self,
        expenses: &[f64],
        revenues: &[f64],
        total_budget: f64,
        months_ahead: u32,
    ) -> Result<ForecastReport> {
        let cash_flow_predictions = self.forecast(expenses, revenues, months_ahead)?;
        let burn_rate = self.burn_rate(expenses, total_budget)?;

        let flows: Vec<f64> = cash_flow_predictions
            .iter()
            .map(|p| p.predicted_cash_flow)
            .collect();
        let average = mean(&flows);
        let positive_months = flows.iter().filter(|f| **f > 0.0).count();

        Ok(ForecastReport {
            cash_flow_predictions,
            burn_rate,
            summary: ForecastSummary {
                average_predicted_cash_flow: round_to(average, 2),
                positive_cash_flow_months: positive_months,
                total_months_forecast: months_ahead,
                outlook: if average > 0.0 {
                    Outlook::Positive
                } else {
                    Outlook::Negative
                },
            },
        })
    }

    /// Month and year `step` 30-day periods after the as-of date
    fn target_month(&self, step: u32) -> Result<(u32, i32)> {
        let target = Duration::try_days(DAYS_PER_MONTH * step as i64)
            .and_then(|d| self.as_of.checked_add_signed(d))
            .ok_or_else(|| Error::InvalidInput("forecast horizon out of range".to_string()))?;
        Ok((target.month(), target.year()))
    }
}

/// Heuristic confidence from history length and consistency
///
/// Starts at 0.3, adds 0.2 / 0.3 / 0.4 for at least 3 / 6 / 12 points, then
/// 0.1 or 0.2 when the coefficient of variation is under 0.5 or 0.2.
fn prediction_confidence(data: &[f64], sample_size: usize) -> f64 {
    let mut confidence = BASE_CONFIDENCE;

    confidence += match sample_size {
        n if n >= 12 => 0.4,
        n if n >= 6 => 0.3,
        n if n >= 3 => 0.2,
        _ => 0.0,
    };

    if let Some(cv) = coefficient_of_variation(data) {
        if cv < 0.2 {
            confidence += 0.2;
        } else if cv < 0.5 {
            confidence += 0.1;
        }
    }

    confidence.min(MAX_PREDICTION_CONFIDENCE)
}

/// The last few points of a series (the whole series when shorter)
fn recent(series: &[f64]) -> &[f64] {
    &series[series.len().saturating_sub(RECENT_WINDOW)..]
}

fn validate_horizon(months_ahead: u32) -> Result<()> {
    if months_ahead == 0 {
        return Err(Error::InvalidInput(
            "months ahead must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_series(name: &str, series: &[f64]) -> Result<()> {
    if !all_finite(series) {
        return Err(Error::InvalidInput(format!(
            "{} series contains a non-finite value",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecaster() -> Forecaster {
        Forecaster::as_of(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
    }

    #[test]
    fn test_forecast_empty_history() {
        let predictions = forecaster().forecast(&[], &[], 3).unwrap();
        assert_eq!(predictions.len(), 3);
        for p in &predictions {
            assert_eq!(p.predicted_expense, 0.0);
            assert_eq!(p.predicted_revenue, 0.0);
            assert_eq!(p.predicted_cash_flow, 0.0);
            assert_eq!(p.confidence, 0.4);
        }
    }

    #[test]
    fn test_forecast_short_history_is_flat() {
        let predictions = forecaster()
            .forecast(&[1000.0, 2000.0], &[5000.0, 5000.0, 5000.0], 2)
            .unwrap();
        for p in &predictions {
            assert_eq!(p.predicted_expense, 1500.0);
            assert_eq!(p.predicted_revenue, 5000.0);
            assert_eq!(p.predicted_cash_flow, 3500.0);
            assert_eq!(p.confidence, FLAT_CONFIDENCE);
        }
    }

    #[test]
    fn test_forecast_follows_trend() {
        let predictions = forecaster()
            .forecast(&[100.0, 200.0, 300.0], &[1000.0, 1000.0, 1000.0], 2)
            .unwrap();

        assert_eq!(predictions[0].predicted_expense, 300.0);
        assert_eq!(predictions[1].predicted_expense, 400.0);
        assert_eq!(predictions[0].predicted_revenue, 1000.0);
        assert_eq!(predictions[0].predicted_cash_flow, 700.0);
        assert_eq!(predictions[1].predicted_cash_flow, 600.0);
        // 3 points (+0.2), combined history too spread out for a consistency bonus
        assert_eq!(predictions[0].confidence, 0.5);
    }

    #[test]
    fn test_forecast_floors_at_zero() {
        let predictions = forecaster()
            .forecast(&[300.0, 200.0, 100.0], &[50.0, 50.0, 50.0], 3)
            .unwrap();
        let expenses: Vec<f64> = predictions.iter().map(|p| p.predicted_expense).collect();
        assert_eq!(expenses, vec![100.0, 0.0, 0.0]);
    }

    #[test]
    fn test_forecast_target_months_use_30_day_steps() {
        let predictions = forecaster().forecast(&[], &[], 12).unwrap();
        assert_eq!((predictions[0].month, predictions[0].year), (2, 2026));
        assert_eq!((predictions[11].month, predictions[11].year), (1, 2027));
    }

    #[test]
    fn test_forecast_confidence_with_long_consistent_history() {
        let flat = vec![1000.0; 12];
        let predictions = forecaster().forecast(&flat, &flat, 1).unwrap();
        assert_eq!(predictions[0].confidence, 0.9);
    }

    #[test]
    fn test_forecast_rejects_bad_input() {
        assert!(matches!(
            forecaster().forecast(&[], &[], 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            forecaster().forecast(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0], 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let f = forecaster();
        let expenses = [9000.0, 9500.0, 11000.0, 10500.0];
        let revenues = [14000.0, 15500.0, 15000.0, 16000.0];
        assert_eq!(
            f.forecast(&expenses, &revenues, 6).unwrap(),
            f.forecast(&expenses, &revenues, 6).unwrap()
        );
    }

    #[test]
    fn test_burn_rate_weighted_toward_last_month() {
        let f = Forecaster::as_of(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        let burn = f
            .burn_rate(&[10000.0, 12000.0, 11000.0], 200_000.0)
            .unwrap();

        assert_eq!(burn.burn_rate, 11000.0);
        assert_eq!(burn.runway_months, Some(18.2));
        // floor(30 * 18.18...) = 545 days
        assert_eq!(
            burn.depletion_date,
            Some(NaiveDate::from_ymd_opt(2027, 6, 30).unwrap())
        );
        assert_eq!(burn.confidence, 0.7);
    }

    #[test]
    fn test_burn_rate_short_and_empty_history() {
        let f = forecaster();
        assert_eq!(f.burn_rate(&[100.0, 300.0], 1000.0).unwrap().burn_rate, 200.0);

        let empty = f.burn_rate(&[], 1000.0).unwrap();
        assert_eq!(empty.burn_rate, 0.0);
        assert_eq!(empty.runway_months, None);
        assert_eq!(empty.depletion_date, None);
        assert_eq!(empty.confidence, 0.0);
    }

    #[test]
    fn test_burn_rate_zero_spend_has_no_runway() {
        let burn = forecaster().burn_rate(&[0.0, 0.0, 0.0], 5000.0).unwrap();
        assert_eq!(burn.burn_rate, 0.0);
        assert_eq!(burn.runway_months, None);
        assert_eq!(burn.depletion_date, None);
    }

    #[test]
    fn test_budget_overrun_projection() {
        let overrun = forecaster()
            .budget_overrun(6000.0, 10000.0, 15, 30)
            .unwrap();
        assert_eq!(overrun.predicted_total, 12000.0);
        assert_eq!(overrun.overrun_amount, 2000.0);
        assert_eq!(overrun.probability, 0.75);
        assert_eq!(overrun.days_remaining, 15);
    }

    #[test]
    fn test_budget_overrun_on_track() {
        let overrun = forecaster().budget_overrun(3000.0, 10000.0, 15, 30).unwrap();
        assert_eq!(overrun.predicted_total, 6000.0);
        assert_eq!(overrun.overrun_amount, 0.0);
        assert_eq!(overrun.probability, 0.0);
    }

    #[test]
    fn test_budget_overrun_probability_caps() {
        let overrun = forecaster().budget_overrun(20000.0, 1000.0, 30, 30).unwrap();
        assert_eq!(overrun.probability, 0.95);
        assert_eq!(overrun.days_remaining, 0);
    }

    #[test]
    fn test_budget_overrun_first_day() {
        let overrun = forecaster().budget_overrun(500.0, 100.0, 0, 31).unwrap();
        assert_eq!(overrun.predicted_total, 0.0);
        assert_eq!(overrun.probability, 0.0);
        assert_eq!(overrun.days_remaining, 31);
    }

    #[test]
    fn test_budget_overrun_invalid_days() {
        let f = forecaster();
        assert!(f.budget_overrun(1.0, 1.0, 31, 30).is_err());
        assert!(f.budget_overrun(1.0, 1.0, 0, 0).is_err());
    }

    #[test]
    fn test_predict_category_spending() {
        let mut history = BTreeMap::new();
        history.insert(ExpenseCategory::Software, vec![100.0, 100.0, 100.0, 100.0]);
        history.insert(ExpenseCategory::Travel, vec![500.0]);
        history.insert(ExpenseCategory::Legal, vec![]);

        let predictions = forecaster().predict_category_spending(&history, 1).unwrap();
        assert_eq!(predictions.len(), 2);

        let software = predictions[&ExpenseCategory::Software];
        assert_eq!(software.value, 100.0);
        assert_eq!(software.lower_bound, 100.0);
        assert_eq!(software.upper_bound, 100.0);
        assert_eq!(software.confidence, 0.7);

        let travel = predictions[&ExpenseCategory::Travel];
        assert_eq!(travel.value, 500.0);
        assert_eq!(travel.lower_bound, 400.0);
        assert_eq!(travel.upper_bound, 600.0);
        assert_eq!(travel.confidence, 0.3);
    }

    #[test]
    fn test_predict_category_spending_lower_bound_floor() {
        let mut history = BTreeMap::new();
        history.insert(ExpenseCategory::Marketing, vec![10.0, 500.0, 20.0]);
        let predictions = forecaster().predict_category_spending(&history, 2).unwrap();
        assert_eq!(predictions[&ExpenseCategory::Marketing].lower_bound, 0.0);
    }

    #[test]
    fn test_forecast_report_summary() {
        let report = forecaster()
            .forecast_report(&[100.0, 200.0, 300.0], &[1000.0, 1000.0, 1000.0], 10000.0, 3)
            .unwrap();

        assert_eq!(report.cash_flow_predictions.len(), 3);
        assert_eq!(report.summary.average_predicted_cash_flow, 600.0);
        assert_eq!(report.summary.positive_cash_flow_months, 3);
        assert_eq!(report.summary.total_months_forecast, 3);
        assert_eq!(report.summary.outlook, Outlook::Positive);
        assert_eq!(report.burn_rate.burn_rate, 225.0);
    }

    #[test]
    fn test_forecast_report_negative_outlook() {
        let report = forecaster()
            .forecast_report(&[5000.0], &[1000.0], 0.0, 2)
            .unwrap();
        assert_eq!(report.summary.outlook, Outlook::Negative);
        assert_eq!(report.summary.positive_cash_flow_months, 0);
    }
}
