use crate::models::Severity;

/// Message template builder for findings and analysis notes.
/// Wording is fixed so identical inputs always render identical text.
pub struct MessageTemplates;

pub const ALLERGY_FINDING_TYPE: &str = "Known Allergy";
pub const ALLERGY_SOURCE: &str = "Patient history";
pub const ALLERGY_RECOMMENDATION: &str = "CONTRAINDICATED — do not administer";

pub const CONDITION_SOURCE: &str = "Clinical guidelines";
pub const CONDITION_RECOMMENDATION: &str = "Evaluate therapeutic alternatives with a physician.";

pub const DISCLAIMER: &str = "**IMPORTANT**: This analysis is informational and does not replace \
     a medical consultation. Always consult a health professional before starting, changing or \
     stopping any treatment.";

impl MessageTemplates {
    /// ALLERGY finding description.
    pub fn allergy(allergen: &str) -> String {
        format!("Patient has a known allergy to {}.", allergen)
    }

    /// ALLERGY finding description when the match is a drug-family cross-reactivity.
    pub fn allergy_cross_reactive(allergen: &str, medication: &str) -> String {
        format!(
            "Patient has a known allergy to {}, which belongs to the same drug family as {}.",
            allergen, medication,
        )
    }

    /// CONDITION finding type label.
    pub fn condition_type(condition: &str) -> String {
        format!("Contraindication due to {}", condition)
    }

    /// CONDITION finding description.
    pub fn condition(drug_substring: &str, condition: &str) -> String {
        format!(
            "{} may be contraindicated in patients with {}.",
            capitalize(drug_substring),
            condition,
        )
    }

    /// Headline line of the notes for a risk level.
    pub fn risk_headline(level: Severity) -> &'static str {
        match level {
            Severity::Critical => {
                "**CRITICAL RISK** - Use is contraindicated or requires IMMEDIATE medical attention"
            }
            Severity::High => {
                "**HIGH RISK** - Use requires rigorous medical supervision and monitoring"
            }
            Severity::Medium => "**MODERATE RISK** - Use with caution and medical follow-up",
            Severity::Low => {
                "**LOW RISK** - Acceptable safety profile with routine follow-up"
            }
        }
    }

    /// Notes used when an analysis could not complete.
    pub fn fallback(medication: &str, error: &str) -> String {
        format!(
            "## Clinical Analysis - {}\n\n\
             The automated analysis could not be completed ({}); a conservative fallback \
             result was produced. Consult a health professional.\n\n---\n{}",
            medication, error, DISCLAIMER,
        )
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_message_capitalizes_drug() {
        let msg = MessageTemplates::condition("metformin", "insuficiência renal");
        assert_eq!(
            msg,
            "Metformin may be contraindicated in patients with insuficiência renal."
        );
    }

    #[test]
    fn capitalize_empty() {
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn every_level_has_a_headline() {
        for level in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            assert!(MessageTemplates::risk_headline(level).contains("RISK"));
        }
    }

    #[test]
    fn fallback_mentions_error_and_disclaimer() {
        let notes = MessageTemplates::fallback("Ibuprofen", "invalid age: -3");
        assert!(notes.contains("invalid age: -3"));
        assert!(notes.contains("Consult a health professional"));
        assert!(notes.ends_with(DISCLAIMER));
    }
}
