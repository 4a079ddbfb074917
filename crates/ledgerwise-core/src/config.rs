//! Engine configuration
//!
//! Thresholds for anomaly detection, forecasting, health scoring and budget
//! alerts. The built-in values are the reference heuristics; a deployment can
//! override any of them from a TOML file.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (`--config`), which must exist
//! 2. The user override (~/.config/ledgerwise/engine.toml) if present
//! 3. Embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detect::{AnomalyConfig, CategoryCeiling};
use crate::error::{Error, Result};
use crate::models::ExpenseCategory;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Forecast request limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Months projected when the caller does not say
    pub default_months_ahead: u32,
    /// Largest horizon a caller may request
    pub max_months_ahead: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            default_months_ahead: 3,
            max_months_ahead: 12,
        }
    }
}

/// Trigger points for health score penalties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSettings {
    pub near_budget_percent: f64,
    pub over_budget_percent: f64,
    /// Cash flow / revenue below this counts as a thin margin
    pub low_margin_ratio: f64,
    pub some_anomalies: u32,
    pub high_anomalies: u32,
    pub pending_backlog: u32,
    pub low_runway_months: f64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            near_budget_percent: 90.0,
            over_budget_percent: 100.0,
            low_margin_ratio: 0.1,
            some_anomalies: 2,
            high_anomalies: 5,
            pending_backlog: 10,
            low_runway_months: 3.0,
        }
    }
}

/// Budget alert defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    /// Usage percentage that raises an alert when a budget sets none
    pub default_alert_threshold: f64,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            default_alert_threshold: 80.0,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub anomaly: AnomalyConfig,
    pub forecast: ForecastSettings,
    pub health: HealthSettings,
    pub budget: BudgetSettings,
}

impl EngineConfig {
    /// Load configuration (explicit path, then user override, then embedded defaults)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!(path = %path.display(), "Loading engine config");
                fs::read_to_string(path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(user_path) => {
                    debug!(path = %user_path.display(), "Loading user engine config");
                    fs::read_to_string(&user_path)?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::from_toml_str(&content)
    }

    /// Parse config from TOML content, keeping defaults for missing keys
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = EngineConfig::default();

        if let Some(anomaly) = raw.anomaly {
            let a = &mut config.anomaly;
            if let Some(v) = anomaly.min_history {
                a.min_history = v;
            }
            if let Some(v) = anomaly.z_score_threshold {
                a.z_score_threshold = v;
            }
            if let Some(v) = anomaly.average_multiplier {
                a.average_multiplier = v;
            }
            if let Some(v) = anomaly.budget_fraction {
                a.budget_fraction = v;
            }
            if let Some(v) = anomaly.round_number_min {
                a.round_number_min = v;
            }
            if let Some(v) = anomaly.round_number_step {
                if v <= 0.0 {
                    return Err(Error::Config(
                        "anomaly.round_number_step must be positive".to_string(),
                    ));
                }
                a.round_number_step = v;
            }
            if let Some(ceilings) = anomaly.category_ceilings {
                let mut parsed = Vec::with_capacity(ceilings.len());
                for (name, ceiling) in ceilings {
                    match name.parse::<ExpenseCategory>() {
                        Ok(category) => parsed.push(CategoryCeiling { category, ceiling }),
                        Err(e) => warn!(error = %e, "Skipping unknown category ceiling"),
                    }
                }
                parsed.sort_by_key(|c| c.category);
                a.category_ceilings = parsed;
            }
        }

        if let Some(forecast) = raw.forecast {
            if let Some(v) = forecast.default_months_ahead {
                config.forecast.default_months_ahead = v;
            }
            if let Some(v) = forecast.max_months_ahead {
                config.forecast.max_months_ahead = v;
            }
        }

        if let Some(health) = raw.health {
            let h = &mut config.health;
            if let Some(v) = health.near_budget_percent {
                h.near_budget_percent = v;
            }
            if let Some(v) = health.over_budget_percent {
                h.over_budget_percent = v;
            }
            if let Some(v) = health.low_margin_ratio {
                h.low_margin_ratio = v;
            }
            if let Some(v) = health.some_anomalies {
                h.some_anomalies = v;
            }
            if let Some(v) = health.high_anomalies {
                h.high_anomalies = v;
            }
            if let Some(v) = health.pending_backlog {
                h.pending_backlog = v;
            }
            if let Some(v) = health.low_runway_months {
                h.low_runway_months = v;
            }
        }

        if let Some(budget) = raw.budget {
            if let Some(v) = budget.default_alert_threshold {
                config.budget.default_alert_threshold = v;
            }
        }

        let f = &config.forecast;
        if f.default_months_ahead == 0 || f.default_months_ahead > f.max_months_ahead {
            return Err(Error::Config(format!(
                "forecast.default_months_ahead must be between 1 and {}",
                f.max_months_ahead
            )));
        }

        Ok(config)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ledgerwise").join("engine.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    anomaly: Option<RawAnomaly>,
    forecast: Option<RawForecast>,
    health: Option<RawHealth>,
    budget: Option<RawBudget>,
}

#[derive(Debug, Deserialize)]
struct RawAnomaly {
    min_history: Option<usize>,
    z_score_threshold: Option<f64>,
    average_multiplier: Option<f64>,
    budget_fraction: Option<f64>,
    round_number_min: Option<f64>,
    round_number_step: Option<f64>,
    category_ceilings: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    default_months_ahead: Option<u32>,
    max_months_ahead: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawHealth {
    near_budget_percent: Option<f64>,
    over_budget_percent: Option<f64>,
    low_margin_ratio: Option<f64>,
    some_anomalies: Option<u32>,
    high_anomalies: Option<u32>,
    pending_backlog: Option<u32>,
    low_runway_months: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawBudget {
    default_alert_threshold: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = EngineConfig::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [anomaly]
            z_score_threshold = 2.5

            [anomaly.category_ceilings]
            travel = 8000.0
            equipment = 4000.0
            groceries = 10.0
            "#,
        )
        .unwrap();

        assert_eq!(config.anomaly.z_score_threshold, 2.5);
        assert_eq!(config.anomaly.average_multiplier, 3.0);
        assert_eq!(
            config.anomaly.category_ceilings,
            vec![
                CategoryCeiling {
                    category: ExpenseCategory::Travel,
                    ceiling: 8000.0
                },
                CategoryCeiling {
                    category: ExpenseCategory::Equipment,
                    ceiling: 4000.0
                },
            ]
        );
        assert_eq!(config.health, HealthSettings::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            EngineConfig::from_toml_str("").unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_invalid_forecast_window_rejected() {
        let result = EngineConfig::from_toml_str(
            r#"
            [forecast]
            default_months_ahead = 0
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = EngineConfig::from_toml_str("[anomaly\nz_score_threshold = ");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[budget]\ndefault_alert_threshold = 75.0").unwrap();

        let config = EngineConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.budget.default_alert_threshold, 75.0);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EngineConfig::load(Some(missing.as_path())),
            Err(Error::Config(_))
        ));
    }
}
