//! Per-expense commands: classification, anomaly checks, keywords

use std::path::Path;

use anyhow::{Context, Result};
use ledgerwise_core::models::format_money;
use ledgerwise_core::{
    extract_keywords, suggest_vendors, AnomalyDetector, Classifier, EngineConfig, ExpenseCategory,
    ExpenseSample,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ensure_finite, parse_category, print_json, truncate};

/// One row of an expense CSV export
#[derive(Debug, Deserialize)]
struct ExpenseRow {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    vendor: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<f64>,
    #[serde(default)]
    category: Option<String>,
}

/// Classification of one CSV row
#[derive(Debug, Serialize)]
pub struct ClassifiedExpense {
    pub title: String,
    pub vendor: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    /// Absent when the row already named its category
    pub confidence: Option<f64>,
}

/// Read expenses from a CSV file with title,description,vendor,amount,category
/// columns; only title is required
pub fn read_expense_csv(path: &Path) -> Result<Vec<ExpenseSample>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut samples = Vec::new();
    for (i, row) in reader.deserialize::<ExpenseRow>().enumerate() {
        // Line 1 is the header
        let row = row.with_context(|| format!("Invalid expense on line {}", i + 2))?;
        let mut sample = ExpenseSample::new(row.title, row.amount.unwrap_or(0.0))
            .with_description(row.description)
            .with_vendor(row.vendor);
        sample.category = row
            .category
            .filter(|c| !c.is_empty())
            .map(|c| parse_category(&c))
            .transpose()
            .with_context(|| format!("Invalid expense on line {}", i + 2))?;
        samples.push(sample);
    }
    Ok(samples)
}

pub fn cmd_classify(
    title: &str,
    description: &str,
    vendor: &str,
    amount: f64,
    json: bool,
) -> Result<()> {
    let result = Classifier::new().classify(title, description, vendor, amount);

    if json {
        return print_json(&result);
    }

    println!();
    println!("🏷️  Classification");
    println!("   Category:   {}", result.category);
    println!("   Confidence: {:.2}", result.confidence);
    Ok(())
}

pub fn cmd_classify_file(path: &Path, json: bool) -> Result<()> {
    let samples = read_expense_csv(path)?;
    let classifier = Classifier::new();

    let classified: Vec<ClassifiedExpense> = samples
        .into_iter()
        .map(|sample| {
            let (category, confidence) = match classifier.classify_sample(&sample) {
                Some(result) => (result.category, Some(result.confidence)),
                None => (classifier.resolve_category(&sample), None),
            };
            ClassifiedExpense {
                title: sample.title,
                vendor: sample.vendor,
                amount: sample.amount,
                category,
                confidence,
            }
        })
        .collect();

    info!(count = classified.len(), file = %path.display(), "Classified expenses");

    if json {
        return print_json(&classified);
    }

    println!();
    println!("🏷️  Classified {} expenses", classified.len());
    if classified.is_empty() {
        return Ok(());
    }
    println!();
    println!(
        "   {:30} │ {:>12} │ {:12} │ {:>5}",
        "Title", "Amount", "Category", "Conf"
    );
    println!("   ───────────────────────────────┼──────────────┼──────────────┼──────");
    for row in &classified {
        let confidence = row
            .confidence
            .map_or_else(|| "given".to_string(), |c| format!("{:.2}", c));
        println!(
            "   {:30} │ {:>12} │ {:12} │ {:>5}",
            truncate(&row.title, 30),
            format_money(row.amount),
            row.category.as_str(),
            confidence
        );
    }
    Ok(())
}

pub fn cmd_detect(
    config: &EngineConfig,
    amount: f64,
    category: &str,
    history: &[f64],
    budget_limit: Option<f64>,
    json: bool,
) -> Result<()> {
    let category = parse_category(category)?;
    ensure_finite("--amount", &[amount])?;
    ensure_finite("--history", history)?;
    if let Some(limit) = budget_limit {
        ensure_finite("--budget-limit", &[limit])?;
    }
    let detector = AnomalyDetector::with_config(config.anomaly.clone());
    let check = detector.detect(amount, category, history, budget_limit);

    if json {
        return print_json(&check);
    }

    println!();
    match &check.reason {
        Some(reason) => {
            println!("🚨 Unusual {} expense: {}", category, format_money(amount));
            for part in reason.split("; ") {
                println!("   - {}", part);
            }
        }
        None => println!("✅ Nothing unusual about this {} expense", category),
    }
    Ok(())
}

pub fn cmd_keywords(text: &str, top: usize, json: bool) -> Result<()> {
    let keywords = extract_keywords(text, top);

    if json {
        return print_json(&keywords);
    }

    if keywords.is_empty() {
        println!("No keywords found.");
    } else {
        println!("{}", keywords.join(", "));
    }
    Ok(())
}

pub fn cmd_vendors(category: &str, json: bool) -> Result<()> {
    let category = parse_category(category)?;
    let vendors = suggest_vendors(category);

    if json {
        return print_json(&vendors);
    }

    if vendors.is_empty() {
        println!("No vendor suggestions for {}.", category);
    } else {
        for vendor in vendors {
            println!("  - {}", vendor);
        }
    }
    Ok(())
}
