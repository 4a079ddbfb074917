//! Ledgerwise CLI - Expense intelligence for a small-business back office
//!
//! Usage:
//!   ledgerwise classify --title "AWS invoice" --amount 450
//!   ledgerwise detect --amount 15000 --category marketing --history 2000,2500,2200
//!   ledgerwise forecast --expenses 9000,9500,11000 --revenues 14000,15500,15000
//!   ledgerwise health --expenses 26000 --revenue 24000 --budget-limit 25000

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use ledgerwise_core::{HealthInputs, PayrollInput};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Classify {
            title,
            description,
            vendor,
            amount,
            file,
        } => match (file, title) {
            (Some(file), _) => commands::cmd_classify_file(&file, json),
            (None, Some(title)) => {
                commands::cmd_classify(&title, &description, &vendor, amount, json)
            }
            (None, None) => anyhow::bail!("Provide --title or --file"),
        },
        Commands::Detect {
            amount,
            category,
            history,
            budget_limit,
        } => commands::cmd_detect(&config, amount, &category, &history, budget_limit, json),
        Commands::Trend { series } => commands::cmd_trend(&series, json),
        Commands::Forecast {
            expenses,
            revenues,
            months,
            total_budget,
        } => commands::cmd_forecast(&config, &expenses, &revenues, months, total_budget, json),
        Commands::BurnRate {
            expenses,
            total_budget,
        } => commands::cmd_burn_rate(&expenses, total_budget, json),
        Commands::Overrun {
            spent,
            limit,
            days_elapsed,
            days_in_month,
        } => commands::cmd_overrun(spent, limit, days_elapsed, days_in_month, json),
        Commands::Categories { file, months } => {
            commands::cmd_categories(&config, &file, months, json)
        }
        Commands::Health {
            expenses,
            revenue,
            budget_limit,
            total_budget,
            anomalies,
            pending,
        } => {
            let inputs = HealthInputs::from_totals(
                expenses,
                revenue,
                budget_limit,
                total_budget,
                anomalies,
                pending,
            );
            commands::cmd_health(&config, &inputs, json)
        }
        Commands::Patterns { file, months } => commands::cmd_patterns(&file, months, json),
        Commands::Budget {
            category,
            monthly_limit,
            yearly_limit,
            alert_threshold,
            spent,
            yearly_spent,
        } => {
            let budget = commands::budget_from_args(
                &config,
                &category,
                monthly_limit,
                yearly_limit,
                alert_threshold,
            )?;
            commands::cmd_budget(&budget, spent, yearly_spent, json)
        }
        Commands::Payroll {
            base_salary,
            working_days,
            overtime_hours,
            unpaid_leaves,
            bonus,
            allowances,
            tax,
            insurance,
            provident_fund,
            loan_repayment,
            other_deductions,
        } => {
            let input = PayrollInput {
                overtime_hours,
                unpaid_leaves,
                bonus,
                allowances,
                tax,
                insurance,
                provident_fund,
                loan_repayment,
                other_deductions,
            };
            commands::cmd_payroll(base_salary, working_days, &input, json)
        }
        Commands::Keywords { text, top } => commands::cmd_keywords(&text, top, json),
        Commands::Vendors { category } => commands::cmd_vendors(&category, json),
    }
}
