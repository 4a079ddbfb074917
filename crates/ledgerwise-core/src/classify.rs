//! Expense categorization from free text
//!
//! Categories are scored with a static keyword table: each category carries a
//! list of keyword phrases and a relevance weight. The amount of the expense
//! nudges a few categories (large amounts lean toward equipment and payroll,
//! small amounts toward food and office supplies).
//!
//! This is keyword weighting, not a trained model. Confidence values are
//! heuristics in the range 0.35 to 0.95.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ExpenseCategory, ExpenseSample};
use crate::stats::round_to;

/// Keyword profile for one category
#[derive(Debug)]
pub struct CategoryProfile {
    pub category: ExpenseCategory,
    pub keywords: &'static [&'static str],
    pub weight: f64,
}

/// Keyword table, in tie-break order
pub static CATEGORY_PROFILES: &[CategoryProfile] = &[
    CategoryProfile {
        category: ExpenseCategory::Marketing,
        keywords: &[
            "ad", "ads", "marketing", "campaign", "social media", "facebook", "google ads", "seo",
            "sem", "promotion", "advertising", "instagram", "twitter", "linkedin", "sponsored",
            "influencer", "content",
        ],
        weight: 1.0,
    },
    CategoryProfile {
        category: ExpenseCategory::Software,
        keywords: &[
            "aws", "azure", "gcp", "software", "saas", "license", "subscription", "adobe",
            "microsoft", "slack", "zoom", "github", "jira", "confluence", "notion", "figma",
            "canva", "dropbox", "api", "hosting", "domain",
        ],
        weight: 1.0,
    },
    CategoryProfile {
        category: ExpenseCategory::Travel,
        keywords: &[
            "flight", "hotel", "uber", "lyft", "airbnb", "travel", "taxi", "rental car",
            "airline", "booking", "accommodation", "trip", "expedia", "airfare", "train", "bus",
            "transportation",
        ],
        weight: 1.0,
    },
    CategoryProfile {
        category: ExpenseCategory::Office,
        keywords: &[
            "rent", "office", "utilities", "electricity", "internet", "supplies", "furniture",
            "desk", "chair", "stationery", "printer", "paper", "building", "lease",
            "maintenance", "cleaning", "janitorial",
        ],
        weight: 1.0,
    },
    CategoryProfile {
        category: ExpenseCategory::Payroll,
        keywords: &[
            "salary", "wage", "payroll", "bonus", "compensation", "benefits", "insurance",
            "health", "dental", "401k", "pension", "contractor", "freelancer", "stipend",
            "reimbursement",
        ],
        weight: 1.2,
    },
    CategoryProfile {
        category: ExpenseCategory::Food,
        keywords: &[
            "restaurant", "food", "meal", "lunch", "dinner", "catering", "snacks", "coffee",
            "cafe", "breakfast", "delivery", "doordash", "ubereats", "grubhub", "starbucks",
            "dining",
        ],
        weight: 0.8,
    },
    CategoryProfile {
        category: ExpenseCategory::Equipment,
        keywords: &[
            "computer", "laptop", "monitor", "hardware", "equipment", "printer", "server",
            "mouse", "keyboard", "headphones", "webcam", "phone", "tablet", "ipad", "macbook",
            "dell", "hp", "lenovo",
        ],
        weight: 1.0,
    },
    CategoryProfile {
        category: ExpenseCategory::Legal,
        keywords: &[
            "legal", "lawyer", "attorney", "compliance", "registration", "trademark", "patent",
            "incorporation", "contract", "law firm", "notary", "filing", "court", "litigation",
        ],
        weight: 1.0,
    },
    CategoryProfile {
        category: ExpenseCategory::Consulting,
        keywords: &[
            "consultant", "consulting", "advisor", "advisory", "coaching", "training",
            "workshop", "seminar", "professional services",
        ],
        weight: 0.9,
    },
    CategoryProfile {
        category: ExpenseCategory::Other,
        keywords: &[],
        weight: 0.5,
    },
];

/// Amounts above this lean toward large-ticket categories
pub const LARGE_AMOUNT: f64 = 5000.0;
/// Amounts below this lean toward small-ticket categories
pub const SMALL_AMOUNT: f64 = 50.0;
/// Score multipliers applied when amount > LARGE_AMOUNT
pub const LARGE_AMOUNT_BIAS: &[(ExpenseCategory, f64)] = &[
    (ExpenseCategory::Equipment, 1.2),
    (ExpenseCategory::Payroll, 1.3),
];
/// Score multipliers applied when 0 < amount < SMALL_AMOUNT
pub const SMALL_AMOUNT_BIAS: &[(ExpenseCategory, f64)] = &[
    (ExpenseCategory::Food, 1.3),
    (ExpenseCategory::Office, 1.2),
];

const EXACT_MATCH_SCORE: f64 = 1.0;
const PHRASE_MATCH_SCORE: f64 = 2.0;
const PARTIAL_MATCH_SCORE: f64 = 0.5;

/// Confidence returned when nothing matched
pub const UNMATCHED_CONFIDENCE: f64 = 0.3;
pub const MIN_CONFIDENCE: f64 = 0.35;
pub const MAX_CONFIDENCE: f64 = 0.95;
const CLEAR_WINNER_BOOST: f64 = 1.2;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "be", "been",
];

/// Result of categorizing an expense
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: ExpenseCategory,
    pub confidence: f64,
}

/// Keyword-weighted expense classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    /// Categorize an expense from its text and amount
    pub fn classify(
        &self,
        title: &str,
        description: &str,
        vendor: &str,
        amount: f64,
    ) -> Classification {
        let scores = self.score_categories(title, description, vendor, amount);

        if scores.iter().all(|(_, score)| *score == 0.0) {
            return Classification {
                category: ExpenseCategory::Other,
                confidence: UNMATCHED_CONFIDENCE,
            };
        }

        let (mut best_index, mut best_score) = (0, scores[0].1);
        for (i, (_, score)) in scores.iter().enumerate().skip(1) {
            if *score > best_score {
                best_index = i;
                best_score = *score;
            }
        }
        let profile = &CATEGORY_PROFILES[best_index];

        let max_possible = profile.keywords.len() as f64 * PHRASE_MATCH_SCORE;
        let mut confidence = if max_possible > 0.0 {
            (best_score / max_possible).min(1.0)
        } else {
            0.5
        };

        let mut ranked: Vec<f64> = scores.iter().map(|(_, s)| *s).collect();
        ranked.sort_by(|a, b| b.total_cmp(a));
        let second_best = ranked.get(1).copied().unwrap_or(0.0);
        if best_score > second_best * 2.0 {
            confidence = (confidence * CLEAR_WINNER_BOOST).min(MAX_CONFIDENCE);
        }

        let confidence = round_to(confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE), 2);

        debug!(
            category = profile.category.as_str(),
            score = best_score,
            second = second_best,
            confidence,
            "Expense classified"
        );

        Classification {
            category: profile.category,
            confidence,
        }
    }

    /// Categorize a caller-supplied expense sample
    ///
    /// Returns `None` when the submitter already chose a category; that
    /// choice is kept as-is.
    pub fn classify_sample(&self, sample: &ExpenseSample) -> Option<Classification> {
        if sample.category.is_some() {
            return None;
        }
        Some(self.classify(
            &sample.title,
            &sample.description,
            &sample.vendor,
            sample.amount,
        ))
    }

    /// The submitter's category, or the classifier's pick when none was given
    pub fn resolve_category(&self, sample: &ExpenseSample) -> ExpenseCategory {
        match sample.category {
            Some(category) => category,
            None => {
                self.classify(
                    &sample.title,
                    &sample.description,
                    &sample.vendor,
                    sample.amount,
                )
                .category
            }
        }
    }

    /// Raw weighted score of every category, in table order
    pub fn score_categories(
        &self,
        title: &str,
        description: &str,
        vendor: &str,
        amount: f64,
    ) -> Vec<(ExpenseCategory, f64)> {
        let text = normalize_text(&format!("{} {} {}", title, description, vendor));

        let mut scores: Vec<(ExpenseCategory, f64)> = CATEGORY_PROFILES
            .iter()
            .map(|profile| {
                let raw: f64 = profile
                    .keywords
                    .iter()
                    .map(|keyword| keyword_score(&text, keyword))
                    .sum();
                (profile.category, raw * profile.weight)
            })
            .collect();

        let bias: &[(ExpenseCategory, f64)] = if amount > LARGE_AMOUNT {
            LARGE_AMOUNT_BIAS
        } else if amount > 0.0 && amount < SMALL_AMOUNT {
            SMALL_AMOUNT_BIAS
        } else {
            &[]
        };
        for (category, factor) in bias {
            if let Some(entry) = scores.iter_mut().find(|(c, _)| c == category) {
                entry.1 *= factor;
            }
        }

        scores
    }
}

/// Score one keyword against normalized text
///
/// Single words score 1.0 when present. Phrases score 2.0 when present in
/// full, otherwise 0.5 scaled by the share of their words that appear.
fn keyword_score(text: &str, keyword: &str) -> f64 {
    let words: Vec<&str> = keyword.split_whitespace().collect();

    if text.contains(keyword) {
        return if words.len() > 1 {
            PHRASE_MATCH_SCORE
        } else {
            EXACT_MATCH_SCORE
        };
    }

    if words.len() > 1 {
        let matched = words.iter().filter(|w| text.contains(*w)).count();
        if matched > 0 {
            return PARTIAL_MATCH_SCORE * (matched as f64 / words.len() as f64);
        }
    }

    0.0
}

/// Lowercase text and replace punctuation with spaces
fn normalize_text(text: &str) -> String {
    static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
    let re = PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid regex"));
    re.replace_all(&text.to_lowercase(), " ").into_owned()
}

/// Pull the most frequent meaningful words out of expense text
///
/// Stop words and words of three characters or fewer are dropped. Words
/// with equal frequency keep the order in which they first appear.
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    let normalized = normalize_text(text);

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in normalized.split_whitespace() {
        if word.chars().count() <= 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|w| (w, counts[w])).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(w, _)| w.to_string())
        .collect()
}

/// Common vendors for a category, for autocomplete
pub fn suggest_vendors(category: ExpenseCategory) -> &'static [&'static str] {
    match category {
        ExpenseCategory::Marketing => &[
            "Google Ads",
            "Facebook Ads",
            "LinkedIn",
            "HubSpot",
            "Mailchimp",
        ],
        ExpenseCategory::Software => &[
            "AWS",
            "Microsoft Azure",
            "GitHub",
            "Slack",
            "Zoom",
            "Notion",
        ],
        ExpenseCategory::Travel => &["Delta", "United", "Marriott", "Hilton", "Uber", "Lyft"],
        ExpenseCategory::Office => &["Staples", "Office Depot", "Amazon Business", "IKEA"],
        ExpenseCategory::Food => &["Starbucks", "Panera", "Chipotle", "DoorDash", "Uber Eats"],
        ExpenseCategory::Equipment => &["Apple", "Dell", "HP", "Lenovo", "Best Buy", "Amazon"],
        ExpenseCategory::Legal => &["LegalZoom", "Rocket Lawyer"],
        ExpenseCategory::Payroll | ExpenseCategory::Consulting | ExpenseCategory::Other => &[],
    }
}
