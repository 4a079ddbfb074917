//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ledgerwise - Forecast cash flow and catch unusual spending
#[derive(Parser)]
#[command(name = "ledgerwise")]
#[command(about = "Expense classification, anomaly detection and forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to ~/.config/ledgerwise/engine.toml, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize an expense, or every row of a CSV file
    Classify {
        /// Expense title
        #[arg(short, long, required_unless_present = "file")]
        title: Option<String>,

        /// Expense description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Vendor name
        #[arg(long, default_value = "")]
        vendor: String,

        /// Expense amount
        #[arg(short, long, default_value = "0")]
        amount: f64,

        /// CSV file with title,description,vendor,amount columns
        #[arg(short, long, conflicts_with = "title")]
        file: Option<PathBuf>,
    },

    /// Check an expense against its category history
    Detect {
        /// Expense amount
        #[arg(short, long)]
        amount: f64,

        /// Expense category (marketing, software, travel, ...)
        #[arg(short, long)]
        category: String,

        /// Previous amounts in this category, comma separated
        #[arg(long, value_delimiter = ',')]
        history: Vec<f64>,

        /// Monthly budget limit for the category
        #[arg(long)]
        budget_limit: Option<f64>,
    },

    /// Least squares trend of a monthly series
    Trend {
        /// Monthly values, oldest first, comma separated
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        series: Vec<f64>,
    },

    /// Forecast monthly expenses, revenue and cash flow
    Forecast {
        /// Monthly expense totals, oldest first
        #[arg(short, long, value_delimiter = ',')]
        expenses: Vec<f64>,

        /// Monthly revenue totals, oldest first
        #[arg(short, long, value_delimiter = ',')]
        revenues: Vec<f64>,

        /// Months to project (defaults to the configured horizon)
        #[arg(short, long)]
        months: Option<u32>,

        /// Total budget, for burn rate and runway
        #[arg(long)]
        total_budget: Option<f64>,
    },

    /// Monthly burn rate and runway
    BurnRate {
        /// Monthly expense totals, oldest first
        #[arg(short, long, value_delimiter = ',')]
        expenses: Vec<f64>,

        /// Total budget remaining
        #[arg(long)]
        total_budget: f64,
    },

    /// Project end-of-month spend against a budget
    Overrun {
        /// Amount spent so far this month
        #[arg(long)]
        spent: f64,

        /// Monthly budget limit
        #[arg(long)]
        limit: f64,

        /// Days of the month elapsed
        #[arg(long)]
        days_elapsed: u32,

        /// Days in the month
        #[arg(long, default_value = "30")]
        days_in_month: u32,
    },

    /// Predict per-category spending from a JSON history file
    ///
    /// The file maps category names to monthly totals, oldest first:
    /// {"software": [900, 950, 1000], "travel": [400, 380]}
    Categories {
        /// JSON history file
        #[arg(short, long)]
        file: PathBuf,

        /// Months ahead to predict
        #[arg(short, long, default_value = "1")]
        months: u32,
    },

    /// Financial health score for the current month
    Health {
        /// Expenses this month
        #[arg(short, long)]
        expenses: f64,

        /// Revenue this month
        #[arg(short, long)]
        revenue: f64,

        /// Monthly budget limit
        #[arg(long)]
        budget_limit: Option<f64>,

        /// Total budget remaining
        #[arg(long)]
        total_budget: Option<f64>,

        /// Expenses flagged as anomalies this month
        #[arg(long, default_value = "0")]
        anomalies: u32,

        /// Expenses waiting for approval
        #[arg(long, default_value = "0")]
        pending: u32,
    },

    /// Spending breakdown by category from a JSON totals file
    ///
    /// The file is a list of {"category", "total", "count", "last_month_total"}.
    Patterns {
        /// JSON totals file
        #[arg(short, long)]
        file: PathBuf,

        /// Months covered by the totals
        #[arg(short, long, default_value = "6")]
        months: u32,
    },

    /// Check spending against a category budget
    Budget {
        /// Budget category
        #[arg(short, long)]
        category: String,

        /// Monthly limit
        #[arg(long)]
        monthly_limit: f64,

        /// Yearly limit
        #[arg(long)]
        yearly_limit: Option<f64>,

        /// Alert threshold percent (defaults to the configured threshold)
        #[arg(long)]
        alert_threshold: Option<f64>,

        /// Spent this month
        #[arg(long)]
        spent: f64,

        /// Spent this year
        #[arg(long, default_value = "0")]
        yearly_spent: f64,
    },

    /// Calculate a payroll run for one employee
    Payroll {
        /// Monthly base salary
        #[arg(long)]
        base_salary: f64,

        /// Working days in the month
        #[arg(long, default_value = "22")]
        working_days: u32,

        #[arg(long, default_value = "0")]
        overtime_hours: f64,

        #[arg(long, default_value = "0")]
        unpaid_leaves: u32,

        #[arg(long, default_value = "0")]
        bonus: f64,

        #[arg(long, default_value = "0")]
        allowances: f64,

        #[arg(long, default_value = "0")]
        tax: f64,

        #[arg(long, default_value = "0")]
        insurance: f64,

        #[arg(long, default_value = "0")]
        provident_fund: f64,

        #[arg(long, default_value = "0")]
        loan_repayment: f64,

        #[arg(long, default_value = "0")]
        other_deductions: f64,
    },

    /// Most frequent meaningful words in expense text
    Keywords {
        /// Text to analyze
        #[arg(short, long)]
        text: String,

        /// Number of keywords to return
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Common vendors for a category
    Vendors {
        /// Expense category
        #[arg(short, long)]
        category: String,
    },
}
