//! Company-level report commands

use std::path::Path;

use anyhow::Result;
use chrono::{Datelike, Utc};
use ledgerwise_core::models::format_money;
use ledgerwise_core::{
    analyze_spending_patterns, budget_utilization, BudgetConfig, BudgetStatus, CategoryTotals,
    EngineConfig, HealthInputs, HealthScorer,
};
use tracing::info;

use super::{parse_category, print_json, read_json};

pub fn cmd_health(config: &EngineConfig, inputs: &HealthInputs, json: bool) -> Result<()> {
    let report = HealthScorer::with_settings(config.health.clone()).score(inputs);
    info!(
        score = report.score,
        grade = report.grade.as_str(),
        "Health score computed"
    );

    if json {
        return print_json(&report);
    }

    println!();
    println!("🩺 Financial Health: {:.1}/10 ({})", report.score, report.grade);
    println!("   ─────────────────────────────");
    if report.factors.is_empty() {
        println!("   No issues found.");
    }
    for factor in &report.factors {
        println!(
            "   {:+.1}  {} ({})",
            factor.impact, factor.name, factor.detail
        );
    }
    println!();
    println!("💡 Recommendations");
    for rec in &report.recommendations {
        println!("  - {}", rec);
    }
    Ok(())
}

pub fn cmd_patterns(file: &Path, months: u32, json: bool) -> Result<()> {
    let totals: Vec<CategoryTotals> = read_json(file)?;
    let report = analyze_spending_patterns(&totals, months)?;

    if json {
        return print_json(&report);
    }

    println!();
    println!("📊 Spending Patterns (last {} months)", report.period_months);
    println!("   Total: {}", format_money(report.total_analyzed));
    println!("   ─────────────────────────────────────────────────────────────");
    if report.patterns.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }
    println!(
        "   {:12} │ {:>12} │ {:>6} │ {:>5} │ {:>10} │ {:10}",
        "Category", "Total", "%", "Count", "Average", "Trend"
    );
    println!("   ─────────────┼──────────────┼────────┼───────┼────────────┼───────────");
    for p in &report.patterns {
        println!(
            "   {:12} │ {:>12} │ {:>5.1}% │ {:>5} │ {:>10} │ {:10}",
            p.category.as_str(),
            format_money(p.total_spent),
            p.percentage,
            p.transaction_count,
            format_money(p.average_amount),
            p.trend.as_str()
        );
    }
    Ok(())
}

/// Build a budget for the current year from command-line values
pub fn budget_from_args(
    config: &EngineConfig,
    category: &str,
    monthly_limit: f64,
    yearly_limit: Option<f64>,
    alert_threshold: Option<f64>,
) -> Result<BudgetConfig> {
    Ok(BudgetConfig {
        category: parse_category(category)?,
        year: Utc::now().year(),
        monthly_limit,
        yearly_limit,
        alert_threshold: alert_threshold.unwrap_or(config.budget.default_alert_threshold),
    })
}

pub fn cmd_budget(
    budget: &BudgetConfig,
    monthly_spent: f64,
    yearly_spent: f64,
    json: bool,
) -> Result<()> {
    let utilization = budget_utilization(budget, monthly_spent, yearly_spent);

    if json {
        return print_json(&utilization);
    }

    let icon = match utilization.status {
        BudgetStatus::OnTrack => "✅",
        BudgetStatus::Alert => "⚠️ ",
        BudgetStatus::Exceeded => "🚨",
    };

    println!();
    println!(
        "{} {} budget: {}",
        icon, utilization.category, utilization.status
    );
    println!(
        "   This month: {} of {} ({:.1}%), {} remaining",
        format_money(utilization.monthly_spent),
        format_money(utilization.monthly_limit),
        utilization.monthly_usage_percent,
        format_money(utilization.monthly_remaining)
    );
    if budget.yearly_limit.is_some() {
        println!(
            "   This year:  {} spent, {} remaining",
            format_money(utilization.yearly_spent),
            format_money(utilization.yearly_remaining)
        );
    }
    Ok(())
}
