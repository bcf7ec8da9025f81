//! Free-text term lists shared by the clinical checks.
//!
//! Patient conditions arrive in Portuguese or English, so each list carries
//! both spellings. Matching is substring-based on lower-cased text.

pub const RENAL_TERMS: &[&str] = &["renal", "rim", "kidney"];

pub const HEPATIC_TERMS: &[&str] = &["hepática", "hepatic", "liver", "fígado"];

pub const HYPERTENSION_TERMS: &[&str] = &[
    "hypertension",
    "high blood pressure",
    "hipertensão",
    "pressão alta",
];

pub const DIABETES_TERMS: &[&str] = &["diabetes"];

pub const CARDIAC_TERMS: &[&str] = &["cardiac", "heart", "cardíaca", "coração"];

pub const ANTICOAGULANT_TERMS: &[&str] = &[
    "warfarin",
    "varfarina",
    "marevan",
    "coumadin",
    "anticoagulant",
    "anticoagulante",
];

pub const DEHYDRATION_TERMS: &[&str] = &["desidrata", "dehydrat"];

pub const SEPSIS_TERMS: &[&str] = &["sepse", "sepsis", "séptic", "septic"];

pub const HYPOTHYROIDISM_TERMS: &[&str] = &["hipotireoidismo", "hypothyroid"];

pub const ALCOHOL_TERMS: &[&str] = &["álcool", "alcool", "alcoolismo", "etilismo", "alcohol"];

pub const ULCER_TERMS: &[&str] = &["úlcera", "ulcera", "ulcer"];

pub const SURGERY_TERMS: &[&str] = &["cirurgia", "pós-operatório", "surgery", "postoperative"];

pub const TRAUMA_TERMS: &[&str] = &["trauma"];

pub const ELECTROLYTE_TERMS: &[&str] = &[
    "eletrolít",
    "hipocalemia",
    "hipopotassemia",
    "hipomagnesemia",
    "electrolyte",
    "hypokalemia",
    "hypomagnesemia",
];

pub const DEPENDENCE_TERMS: &[&str] = &["dependência", "dependence", "addiction"];

pub const DRUG_ALLERGY_TERMS: &[&str] = &["alergia a medicamento", "drug allergy"];

/// Condition label the engine appends for pregnant patients.
pub const PREGNANCY_CONDITION: &str = "pregnancy";

/// True when `text` (already lower-cased) contains any of `terms`.
pub fn mentions_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// True when any condition mentions any of `terms`, case-insensitively.
pub fn any_condition_mentions<S: AsRef<str>>(conditions: &[S], terms: &[&str]) -> bool {
    conditions
        .iter()
        .any(|c| mentions_any(&c.as_ref().to_lowercase(), terms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portuguese_and_english_terms() {
        assert!(any_condition_mentions(&["Insuficiência Renal"], RENAL_TERMS));
        assert!(any_condition_mentions(&["chronic kidney disease"], RENAL_TERMS));
        assert!(any_condition_mentions(&["Doença do fígado"], HEPATIC_TERMS));
        assert!(!any_condition_mentions(&["asma"], HEPATIC_TERMS));
    }

    #[test]
    fn risk_factor_terms_cover_both_languages() {
        assert!(any_condition_mentions(&["Desidratação"], DEHYDRATION_TERMS));
        assert!(any_condition_mentions(&["severe dehydration"], DEHYDRATION_TERMS));
        assert!(any_condition_mentions(&["Choque séptico"], SEPSIS_TERMS));
        assert!(any_condition_mentions(&["Etilismo crônico"], ALCOHOL_TERMS));
        assert!(any_condition_mentions(&["Distúrbio eletrolítico"], ELECTROLYTE_TERMS));
        assert!(!any_condition_mentions(&["asma"], ALCOHOL_TERMS));
    }

    #[test]
    fn empty_conditions_mention_nothing() {
        let none: [&str; 0] = [];
        assert!(!any_condition_mentions(&none, RENAL_TERMS));
    }
}
