//! Projection commands: trend, cash-flow forecast, burn rate, overrun

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use ledgerwise_core::models::format_money;
use ledgerwise_core::{
    trend, BurnRate, CashFlowPrediction, EngineConfig, ExpenseCategory, Forecaster,
};
use tracing::info;

use super::{ensure_finite, print_json, read_json};

/// Apply the configured default and ceiling to a requested horizon
pub fn resolve_months(config: &EngineConfig, requested: Option<u32>) -> Result<u32> {
    let max = config.forecast.max_months_ahead;
    let months = requested.unwrap_or(config.forecast.default_months_ahead);
    if months == 0 || months > max {
        anyhow::bail!("--months must be between 1 and {}", max);
    }
    Ok(months)
}

pub fn cmd_trend(series: &[f64], json: bool) -> Result<()> {
    ensure_finite("--series", series)?;
    let slope = trend(series);

    if json {
        return print_json(&serde_json::json!({ "trend": slope }));
    }

    let direction = if slope > 0.0 {
        "📈"
    } else if slope < 0.0 {
        "📉"
    } else {
        "➡️ "
    };
    println!("{} Trend: {:+.2} per month", direction, slope);
    Ok(())
}

pub fn cmd_forecast(
    config: &EngineConfig,
    expenses: &[f64],
    revenues: &[f64],
    months: Option<u32>,
    total_budget: Option<f64>,
    json: bool,
) -> Result<()> {
    let months = resolve_months(config, months)?;
    let forecaster = Forecaster::new();

    let Some(total_budget) = total_budget else {
        let predictions = forecaster.forecast(expenses, revenues, months)?;
        if json {
            return print_json(&predictions);
        }
        print_predictions(&predictions);
        return Ok(());
    };

    let report = forecaster.forecast_report(expenses, revenues, total_budget, months)?;
    info!(
        months,
        outlook = report.summary.outlook.as_str(),
        "Cash flow forecast complete"
    );

    if json {
        return print_json(&report);
    }

    print_predictions(&report.cash_flow_predictions);
    println!();
    println!(
        "   Average cash flow: {} ({} of {} months positive, outlook {})",
        format_money(report.summary.average_predicted_cash_flow),
        report.summary.positive_cash_flow_months,
        report.summary.total_months_forecast,
        report.summary.outlook
    );
    print_burn_rate(&report.burn_rate);
    Ok(())
}

pub fn cmd_burn_rate(expenses: &[f64], total_budget: f64, json: bool) -> Result<()> {
    let burn = Forecaster::new().burn_rate(expenses, total_budget)?;

    if json {
        return print_json(&burn);
    }

    print_burn_rate(&burn);
    Ok(())
}

pub fn cmd_overrun(
    spent: f64,
    limit: f64,
    days_elapsed: u32,
    days_in_month: u32,
    json: bool,
) -> Result<()> {
    let overrun = Forecaster::new().budget_overrun(spent, limit, days_elapsed, days_in_month)?;

    if json {
        return print_json(&overrun);
    }

    println!();
    println!("📅 Month-end projection");
    println!("   Predicted total: {}", format_money(overrun.predicted_total));
    println!("   Budget limit:    {}", format_money(limit));
    if overrun.overrun_amount > 0.0 {
        println!(
            "   ⚠️  Over by {} ({:.0}% likely)",
            format_money(overrun.overrun_amount),
            overrun.probability * 100.0
        );
    } else {
        println!("   ✅ On pace to stay within budget");
    }
    println!("   Days remaining:  {}", overrun.days_remaining);
    Ok(())
}

pub fn cmd_categories(config: &EngineConfig, file: &Path, months: u32, json: bool) -> Result<()> {
    let months = resolve_months(config, Some(months))?;
    let history: BTreeMap<ExpenseCategory, Vec<f64>> = read_json(file)?;
    let predictions = Forecaster::new().predict_category_spending(&history, months)?;

    info!(
        categories = predictions.len(),
        months, "Predicted category spending"
    );

    if json {
        return print_json(&predictions);
    }

    println!();
    println!("🔮 Category spending in {} month(s)", months);
    if predictions.is_empty() {
        println!("   No category history found.");
        return Ok(());
    }
    println!(
        "   {:12} │ {:>12} │ {:>25} │ {:>5}",
        "Category", "Predicted", "Range", "Conf"
    );
    println!("   ─────────────┼──────────────┼───────────────────────────┼──────");
    for (category, p) in &predictions {
        println!(
            "   {:12} │ {:>12} │ {:>25} │ {:>5.2}",
            category.as_str(),
            format_money(p.value),
            format!(
                "{} - {}",
                format_money(p.lower_bound),
                format_money(p.upper_bound)
            ),
            p.confidence
        );
    }
    Ok(())
}

fn print_predictions(predictions: &[CashFlowPrediction]) {
    println!();
    println!("🔮 Cash Flow Forecast");
    println!(
        "   {:7} │ {:>12} │ {:>12} │ {:>12} │ {:>5}",
        "Month", "Expenses", "Revenue", "Cash Flow", "Conf"
    );
    println!("   ────────┼──────────────┼──────────────┼──────────────┼──────");
    for p in predictions {
        println!(
            "   {:7} │ {:>12} │ {:>12} │ {:>12} │ {:>5.2}",
            format!("{}-{:02}", p.year, p.month),
            format_money(p.predicted_expense),
            format_money(p.predicted_revenue),
            format_money(p.predicted_cash_flow),
            p.confidence
        );
    }
}

fn print_burn_rate(burn: &BurnRate) {
    println!();
    println!("🔥 Burn rate: {} per month", format_money(burn.burn_rate));
    match (burn.runway_months, burn.depletion_date) {
        (Some(runway), Some(date)) => {
            println!("   Runway: {:.1} months (budget depleted around {})", runway, date)
        }
        (Some(runway), None) => println!("   Runway: {:.1} months", runway),
        _ => println!("   Runway: unlimited at current spend"),
    }
    println!("   Confidence: {:.2}", burn.confidence);
}
