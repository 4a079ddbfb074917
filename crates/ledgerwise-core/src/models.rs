//! Domain models for Ledgerwise

use serde::{Deserialize, Serialize};

/// Expense categories known to the classifier
///
/// Declaration order matters: it is the iteration order of the keyword
/// profile table, so the first category reaching the top score wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Marketing,
    Software,
    Travel,
    Office,
    Payroll,
    Food,
    Equipment,
    Legal,
    Consulting,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Software => "software",
            Self::Travel => "travel",
            Self::Office => "office",
            Self::Payroll => "payroll",
            Self::Food => "food",
            Self::Equipment => "equipment",
            Self::Legal => "legal",
            Self::Consulting => "consulting",
            Self::Other => "other",
        }
    }

    /// Get all categories in definition order
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Marketing,
            Self::Software,
            Self::Travel,
            Self::Office,
            Self::Payroll,
            Self::Food,
            Self::Equipment,
            Self::Legal,
            Self::Consulting,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "marketing" => Ok(Self::Marketing),
            "software" => Ok(Self::Software),
            "travel" => Ok(Self::Travel),
            "office" => Ok(Self::Office),
            "payroll" => Ok(Self::Payroll),
            "food" => Ok(Self::Food),
            "equipment" => Ok(Self::Equipment),
            "legal" => Ok(Self::Legal),
            "consulting" => Ok(Self::Consulting),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown expense category: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense as submitted by the caller, before it is stored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseSample {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vendor: String,
    pub amount: f64,
    /// Category chosen by the submitter, if any
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
}

impl ExpenseSample {
    pub fn new(title: impl Into<String>, amount: f64) -> Self {
        Self {
            title: title.into(),
            amount,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Budget limits for one category and year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetConfig {
    pub category: ExpenseCategory,
    pub year: i32,
    pub monthly_limit: f64,
    #[serde(default)]
    pub yearly_limit: Option<f64>,
    /// Percentage of the monthly limit at which an alert is raised
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

pub(crate) fn default_alert_threshold() -> f64 {
    80.0
}

/// A single forecast value with its uncertainty band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub value: f64,
    /// Heuristic trust in the value (0.0 to 1.0)
    pub confidence: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// One itemized contribution to the health score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFactor {
    #[serde(rename = "factor")]
    pub name: String,
    /// Signed change applied to the score
    pub impact: f64,
    #[serde(rename = "details")]
    pub detail: String,
}

/// Format an amount as US dollars with thousands separators, e.g. `$15,000.00`
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("${}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_round_trip_names() {
        for category in ExpenseCategory::all() {
            assert_eq!(
                ExpenseCategory::from_str(category.as_str()).unwrap(),
                *category
            );
        }
        assert_eq!(
            ExpenseCategory::from_str(" Travel ").unwrap(),
            ExpenseCategory::Travel
        );
        assert!(ExpenseCategory::from_str("groceries").is_err());
    }

    #[test]
    fn test_category_serde_is_snake_case() {
        let json = serde_json::to_string(&ExpenseCategory::Equipment).unwrap();
        assert_eq!(json, "\"equipment\"");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(2375.0), "$2,375.00");
        assert_eq!(format_money(15000.0), "$15,000.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(-500.0), "$-500.00");
    }

    #[test]
    fn test_expense_sample_builder() {
        let sample = ExpenseSample::new("AWS invoice", 120.0)
            .with_vendor("Amazon Web Services")
            .with_category(ExpenseCategory::Software);

        assert_eq!(sample.title, "AWS invoice");
        assert_eq!(sample.description, "");
        assert_eq!(sample.category, Some(ExpenseCategory::Software));
    }

    #[test]
    fn test_budget_config_default_threshold() {
        let budget: BudgetConfig = serde_json::from_str(
            r#"{"category": "marketing", "year": 2026, "monthly_limit": 5000.0}"#,
        )
        .unwrap();
        assert_eq!(budget.alert_threshold, 80.0);
        assert!(budget.yearly_limit.is_none());
    }
}
