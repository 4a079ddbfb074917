//! Ledgerwise Core Library
//!
//! Forecasting and anomaly-scoring engine for a small-business back office:
//! - Expense categorization from free text (keyword weighting)
//! - Anomaly detection against category history and budgets
//! - Linear trend estimation over monthly series
//! - Cash-flow, burn-rate, runway and budget-overrun forecasting
//! - Composite financial health score with recommendations
//! - Spending-pattern, budget-utilization and payroll calculations
//!
//! Every component is a pure computation over caller-supplied numbers.
//! Persistence, HTTP and authentication live in the surrounding application.

pub mod budget;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod forecast;
pub mod health;
pub mod models;
pub mod patterns;
pub mod payroll;
pub mod stats;

pub use budget::{budget_utilization, BudgetStatus, BudgetUtilization};
pub use classify::{extract_keywords, suggest_vendors, Classification, Classifier};
pub use config::{BudgetSettings, EngineConfig, ForecastSettings, HealthSettings};
pub use detect::{AnomalyCheck, AnomalyConfig, AnomalyDetector, AnomalyRule, CategoryCeiling};
pub use error::{Error, Result};
pub use forecast::{
    BudgetOverrun, BurnRate, CashFlowPrediction, ForecastReport, ForecastSummary, Forecaster,
    Outlook,
};
pub use health::{HealthFactorKind, HealthGrade, HealthInputs, HealthReport, HealthScorer};
pub use models::{BudgetConfig, ExpenseCategory, ExpenseSample, HealthFactor, Prediction};
pub use patterns::{
    analyze_spending_patterns, CategoryTotals, SpendingPattern, SpendingPatternReport,
    SpendingTrend,
};
pub use payroll::{PayrollBreakdown, PayrollInput};
pub use stats::trend;
