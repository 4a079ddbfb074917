//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use ledgerwise_core::{EngineConfig, ExpenseCategory, HealthInputs, PayrollInput};
use tempfile::NamedTempFile;

use crate::commands::{self, truncate};

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer title", 10), "a much ...");
    assert_eq!(truncate("café au lait", 6), "caf...");
}

#[test]
fn test_parse_category() {
    assert_eq!(
        commands::parse_category("Travel").unwrap(),
        ExpenseCategory::Travel
    );
    let err = commands::parse_category("groceries").unwrap_err();
    assert!(err.to_string().contains("Unknown category: groceries"));
    assert!(err.to_string().contains("marketing"));
}

#[test]
fn test_load_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::load_config(Some(dir.path().join("missing.toml").as_path()));
    assert!(result.is_err());
}

#[test]
fn test_load_config_from_file() {
    let file = temp_file("[forecast]\ndefault_months_ahead = 6\n");
    let config = commands::load_config(Some(file.path())).unwrap();
    assert_eq!(config.forecast.default_months_ahead, 6);
    assert_eq!(config.forecast.max_months_ahead, 12);
}

#[test]
fn test_resolve_months() {
    let config = EngineConfig::default();
    assert_eq!(commands::resolve_months(&config, None).unwrap(), 3);
    assert_eq!(commands::resolve_months(&config, Some(12)).unwrap(), 12);
    assert!(commands::resolve_months(&config, Some(13)).is_err());
    assert!(commands::resolve_months(&config, Some(0)).is_err());
}

// ========== Expense Command Tests ==========

#[test]
fn test_read_expense_csv() {
    let file = temp_file(
        "title,description,vendor,amount\n\
         AWS invoice,Cloud hosting,Amazon Web Services,450.00\n\
         Team lunch,, DoorDash ,\n",
    );
    let samples = commands::read_expense_csv(file.path()).unwrap();

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].title, "AWS invoice");
    assert_eq!(samples[0].amount, 450.0);
    assert_eq!(samples[1].vendor, "DoorDash");
    assert_eq!(samples[1].amount, 0.0);
}

#[test]
fn test_read_expense_csv_with_category() {
    let file = temp_file(
        "title,amount,category\n\
         Dinner with counsel,600,Legal\n\
         Team lunch,20,\n",
    );
    let samples = commands::read_expense_csv(file.path()).unwrap();
    assert_eq!(samples[0].category, Some(ExpenseCategory::Legal));
    assert_eq!(samples[1].category, None);
    assert!(commands::cmd_classify_file(file.path(), false).is_ok());
}

#[test]
fn test_read_expense_csv_bad_category() {
    let file = temp_file("title,category\nDinner,groceries\n");
    let result = commands::read_expense_csv(file.path());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid expense on line 2"));
}

#[test]
fn test_read_expense_csv_title_only() {
    let file = temp_file("title\nOffice chairs\n");
    let samples = commands::read_expense_csv(file.path()).unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].description, "");
}

#[test]
fn test_read_expense_csv_bad_amount() {
    let file = temp_file("title,amount\nFlight,abc\n");
    let samples = commands::read_expense_csv(file.path()).unwrap();
    // Unparseable amounts are treated as missing
    assert_eq!(samples[0].amount, 0.0);
}

#[test]
fn test_read_expense_csv_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = commands::read_expense_csv(&dir.path().join("nope.csv"));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to open file"));
}

#[test]
fn test_cmd_classify() {
    assert!(commands::cmd_classify("Hotel", "", "Marriott", 320.0, false).is_ok());
    assert!(commands::cmd_classify("Hotel", "", "Marriott", 320.0, true).is_ok());
}

#[test]
fn test_cmd_classify_file() {
    let file = temp_file("title,vendor,amount\nSlack subscription,Slack,96\n");
    assert!(commands::cmd_classify_file(file.path(), false).is_ok());
    assert!(commands::cmd_classify_file(file.path(), true).is_ok());
}

#[test]
fn test_cmd_detect() {
    let config = EngineConfig::default();
    let history = [2000.0, 2500.0, 2200.0, 2800.0];
    assert!(
        commands::cmd_detect(&config, 15000.0, "marketing", &history, Some(5000.0), false).is_ok()
    );
    assert!(commands::cmd_detect(&config, 100.0, "other", &[], None, true).is_ok());
}

#[test]
fn test_cmd_detect_rejects_non_finite() {
    let config = EngineConfig::default();
    assert!(commands::cmd_detect(&config, f64::NAN, "travel", &[], None, false).is_err());
    let history = [1.0, f64::INFINITY];
    assert!(commands::cmd_detect(&config, 100.0, "travel", &history, None, false).is_err());
    assert!(commands::cmd_detect(&config, 100.0, "travel", &[], Some(f64::NAN), false).is_err());
}

#[test]
fn test_cmd_detect_unknown_category() {
    let config = EngineConfig::default();
    assert!(commands::cmd_detect(&config, 100.0, "snacks", &[], None, false).is_err());
}

#[test]
fn test_cmd_keywords_and_vendors() {
    assert!(commands::cmd_keywords("Quarterly software license renewal", 3, false).is_ok());
    assert!(commands::cmd_keywords("a an the", 3, true).is_ok());
    assert!(commands::cmd_vendors("legal", false).is_ok());
    assert!(commands::cmd_vendors("payroll", false).is_ok());
    assert!(commands::cmd_vendors("unknown", false).is_err());
}

// ========== Forecast Command Tests ==========

#[test]
fn test_cmd_trend() {
    assert!(commands::cmd_trend(&[100.0, 200.0, 300.0], false).is_ok());
    assert!(commands::cmd_trend(&[], true).is_ok());

    let result = commands::cmd_trend(&[100.0, f64::NAN], false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("finite"));
}

#[test]
fn test_cmd_forecast() {
    let config = EngineConfig::default();
    let expenses = [9000.0, 9500.0, 11000.0];
    let revenues = [14000.0, 15500.0, 15000.0];

    assert!(commands::cmd_forecast(&config, &expenses, &revenues, None, None, false).is_ok());
    assert!(
        commands::cmd_forecast(&config, &expenses, &revenues, Some(6), Some(120000.0), true)
            .is_ok()
    );
}

#[test]
fn test_cmd_forecast_horizon_limit() {
    let config = EngineConfig::default();
    let result = commands::cmd_forecast(&config, &[], &[], Some(24), None, false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("between 1 and 12"));
}

#[test]
fn test_cmd_burn_rate_and_overrun() {
    assert!(commands::cmd_burn_rate(&[10000.0, 12000.0, 11000.0], 200000.0, false).is_ok());
    assert!(commands::cmd_burn_rate(&[], 200000.0, false).is_ok());
    assert!(commands::cmd_overrun(6000.0, 10000.0, 15, 30, false).is_ok());
    assert!(commands::cmd_overrun(6000.0, 10000.0, 31, 30, false).is_err());
}

#[test]
fn test_cmd_categories() {
    let config = EngineConfig::default();
    let file = temp_file(r#"{"software": [900, 950, 1000], "travel": [400]}"#);
    assert!(commands::cmd_categories(&config, file.path(), 1, false).is_ok());
    assert!(commands::cmd_categories(&config, file.path(), 2, true).is_ok());
}

#[test]
fn test_cmd_categories_bad_json() {
    let config = EngineConfig::default();
    let file = temp_file(r#"{"groceries": [10]}"#);
    let result = commands::cmd_categories(&config, file.path(), 1, false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to parse JSON"));
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_health() {
    let config = EngineConfig::default();
    let inputs = HealthInputs::from_totals(26000.0, 24000.0, Some(25000.0), Some(50000.0), 4, 12);
    assert!(commands::cmd_health(&config, &inputs, false).is_ok());
    assert!(commands::cmd_health(&config, &HealthInputs::default(), true).is_ok());
}

#[test]
fn test_cmd_patterns() {
    let file = temp_file(
        r#"[
            {"category": "software", "total": 2400, "count": 12, "last_month_total": 400},
            {"category": "food", "total": 400, "count": 20}
        ]"#,
    );
    assert!(commands::cmd_patterns(file.path(), 6, false).is_ok());
    assert!(commands::cmd_patterns(file.path(), 0, false).is_err());
}

#[test]
fn test_budget_from_args_uses_configured_threshold() {
    let mut config = EngineConfig::default();
    config.budget.default_alert_threshold = 70.0;

    let budget = commands::budget_from_args(&config, "office", 2000.0, None, None).unwrap();
    assert_eq!(budget.category, ExpenseCategory::Office);
    assert_eq!(budget.alert_threshold, 70.0);

    let budget = commands::budget_from_args(&config, "office", 2000.0, None, Some(95.0)).unwrap();
    assert_eq!(budget.alert_threshold, 95.0);

    assert!(commands::budget_from_args(&config, "rent", 2000.0, None, None).is_err());
}

#[test]
fn test_cmd_budget() {
    let config = EngineConfig::default();
    let budget =
        commands::budget_from_args(&config, "marketing", 5000.0, Some(60000.0), None).unwrap();
    assert!(commands::cmd_budget(&budget, 5500.0, 30000.0, false).is_ok());
    assert!(commands::cmd_budget(&budget, 1000.0, 30000.0, true).is_ok());
}

#[test]
fn test_cmd_payroll() {
    let input = PayrollInput {
        overtime_hours: 10.0,
        bonus: 500.0,
        ..Default::default()
    };
    assert!(commands::cmd_payroll(4400.0, 22, &input, false).is_ok());
    assert!(commands::cmd_payroll(4400.0, 0, &input, false).is_err());
}
