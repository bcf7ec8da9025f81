//! Keyword classification of interaction descriptions.
//!
//! Both tables are evaluated top to bottom and the first row with a matching
//! keyword wins. Row order resolves descriptions that mention several
//! keywords, so it must not be changed casually.

use crate::models::Severity;

/// A keyword set and the severity it assigns.
#[derive(Debug)]
pub struct SeverityRule {
    pub severity: Severity,
    pub keywords: &'static [&'static str],
}

/// A keyword set and the category label it assigns.
#[derive(Debug)]
pub struct CategoryRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub static SEVERITY_RULES: &[SeverityRule] = &[
    SeverityRule {
        severity: Severity::Critical,
        keywords: &[
            "contraindicated",
            "contraindication",
            "fatal",
            "life-threatening",
            "severe",
            "serious",
            "major",
            "cardiotoxic",
            "hepatotoxic",
            "nephrotoxic",
            "neurotoxic",
            "may cause death",
        ],
    },
    SeverityRule {
        severity: Severity::High,
        keywords: &[
            "significant",
            "increase the risk",
            "risk",
            "adverse effects",
            "toxicity",
            "dangerous",
            "harmful",
            "may increase",
            "serum concentration",
            "metabolism",
        ],
    },
    SeverityRule {
        severity: Severity::Medium,
        keywords: &[
            "moderate",
            "caution",
            "monitor",
            "may decrease",
            "effectiveness",
            "therapeutic effect",
            "bioavailability",
        ],
    },
];

/// Severity when no rule matches.
pub const DEFAULT_SEVERITY: Severity = Severity::Low;

pub static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        label: "Cardiovascular",
        keywords: &["cardiotoxic", "cardiac"],
    },
    CategoryRule {
        label: "Hepatic",
        keywords: &["hepatotoxic", "liver"],
    },
    CategoryRule {
        label: "Renal",
        keywords: &["nephrotoxic", "renal", "kidney"],
    },
    CategoryRule {
        label: "Neurological",
        keywords: &["neurotoxic", "cns", "sedation"],
    },
    CategoryRule {
        label: "Photosensitivity",
        keywords: &["photosensitiz"],
    },
    CategoryRule {
        label: "Pharmacokinetic",
        keywords: &["metabolism", "cyp"],
    },
    CategoryRule {
        label: "Coagulation",
        keywords: &["bleeding", "anticoagulant"],
    },
];

/// Category when no rule matches.
pub const DEFAULT_CATEGORY: &str = "Pharmacological";

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

pub fn classify_severity(description: &str) -> Severity {
    let lower = description.to_lowercase();
    SEVERITY_RULES
        .iter()
        .find(|rule| mentions_any(&lower, rule.keywords))
        .map(|rule| rule.severity)
        .unwrap_or(DEFAULT_SEVERITY)
}

pub fn classify_category(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| mentions_any(&lower, rule.keywords))
        .map(|rule| rule.label)
        .unwrap_or(DEFAULT_CATEGORY)
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Fallback advice for a severity label outside the known scale.
pub const GENERIC_RECOMMENDATION: &str = "Consult a health professional.";

/// Advice attached to an interaction finding of the given severity.
pub fn interaction_recommendation(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => {
            "AVOID COMBINATION - risk of a serious reaction. Consult a physician immediately."
        }
        Severity::High => "Use with extreme caution - rigorous medical monitoring required.",
        Severity::Medium => "Use with caution - monitor signs and symptoms and inform your physician.",
        Severity::Low => "Minimal risk - keep routine medical follow-up.",
    }
}

/// Same as [`interaction_recommendation`] for a stored severity label.
pub fn recommendation_for_label(label: &str) -> &'static str {
    match label.trim().to_lowercase().parse::<Severity>() {
        Ok(severity) => interaction_recommendation(severity),
        Err(_) => GENERIC_RECOMMENDATION,
    }
}
