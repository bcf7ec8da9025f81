use serde::Serialize;

use crate::models::{
    AdverseReactionProfile, ContraindicationFinding, InteractionFinding, PatientProfile, Severity,
};

use super::terms::{
    mentions_any, ALCOHOL_TERMS, ANTICOAGULANT_TERMS, CARDIAC_TERMS, DEHYDRATION_TERMS,
    DEPENDENCE_TERMS, DIABETES_TERMS, DRUG_ALLERGY_TERMS, ELECTROLYTE_TERMS, HEPATIC_TERMS,
    HYPERTENSION_TERMS, HYPOTHYROIDISM_TERMS, PREGNANCY_CONDITION, RENAL_TERMS, SEPSIS_TERMS,
    SURGERY_TERMS, TRAUMA_TERMS, ULCER_TERMS,
};

// ---------------------------------------------------------------------------
// Escalation policy
// ---------------------------------------------------------------------------
// Empirical thresholds, subject to clinical review. Keep the ladder monotonic:
// escalation may only raise the base level.

/// Critical-class matches that force CRITICAL regardless of the base level.
pub const CRITICAL_MATCHES_FOR_CRITICAL: usize = 2;
/// Critical-class matches that raise a LOW base to HIGH.
pub const CRITICAL_MATCHES_FOR_HIGH: usize = 1;
/// High-class matches that raise a LOW base to HIGH.
pub const HIGH_MATCHES_FOR_HIGH: usize = 2;
/// High-class matches that raise a LOW base to MEDIUM.
pub const HIGH_MATCHES_FOR_MEDIUM: usize = 1;

const CRITICAL_REACTION_TERMS: &[&str] = &["critical", "severe"];
const HIGH_REACTION_TERMS: &[&str] = &["moderate", "high"];

pub const ELDERLY_RISK_FACTORS: &[&str] = &["elderly", "age>65", "age>60"];

/// A condition mentioning any of `terms` (Portuguese or English) contributes
/// `factors`, spelled the way the adverse-reaction tables spell them.
pub struct ConditionExpansion {
    pub terms: &'static [&'static str],
    pub factors: &'static [&'static str],
}

/// Evaluated in order; every matching row contributes.
pub static CONDITION_EXPANSIONS: &[ConditionExpansion] = &[
    ConditionExpansion { terms: HYPERTENSION_TERMS, factors: &["hypertension", "heart failure"] },
    ConditionExpansion { terms: DIABETES_TERMS, factors: &["diabetes", "renal insufficiency"] },
    ConditionExpansion {
        terms: RENAL_TERMS,
        factors: &["renal insufficiency", "prior renal insufficiency"],
    },
    ConditionExpansion {
        terms: HEPATIC_TERMS,
        factors: &["hepatic insufficiency", "prior liver disease"],
    },
    ConditionExpansion { terms: CARDIAC_TERMS, factors: &["cardiopathy"] },
    ConditionExpansion { terms: DEHYDRATION_TERMS, factors: &["dehydration"] },
    ConditionExpansion { terms: SEPSIS_TERMS, factors: &["sepsis"] },
    ConditionExpansion { terms: HYPOTHYROIDISM_TERMS, factors: &["hypothyroidism"] },
    ConditionExpansion { terms: ALCOHOL_TERMS, factors: &["alcohol use"] },
    ConditionExpansion { terms: ULCER_TERMS, factors: &["history of ulcer"] },
    ConditionExpansion { terms: SURGERY_TERMS, factors: &["recent surgery"] },
    ConditionExpansion { terms: TRAUMA_TERMS, factors: &["trauma"] },
    ConditionExpansion { terms: ELECTROLYTE_TERMS, factors: &["electrolyte disturbances"] },
    ConditionExpansion { terms: DEPENDENCE_TERMS, factors: &["history of dependence"] },
    ConditionExpansion { terms: DRUG_ALLERGY_TERMS, factors: &["history of drug allergy"] },
];

/// Reactions whose risk factors overlap the patient's profile, bucketed by
/// the reaction's free-text severity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskFactorCounts {
    pub critical: usize,
    pub high: usize,
}

/// Base level, matched factors, and the escalated level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub base: Severity,
    pub counts: RiskFactorCounts,
    pub level: Severity,
}

/// Base risk from findings: critical if any finding is critical, high if any
/// is high, medium if any is medium, otherwise low.
pub fn calculate_overall_risk(
    interactions: &[InteractionFinding],
    contraindications: &[ContraindicationFinding],
) -> Severity {
    let severities: Vec<Severity> = interactions
        .iter()
        .map(|i| i.severity)
        .chain(contraindications.iter().map(|c| c.severity))
        .collect();

    if severities.contains(&Severity::Critical) {
        Severity::Critical
    } else if severities.contains(&Severity::High) {
        Severity::High
    } else if severities.contains(&Severity::Medium) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Risk-factor vocabulary derived from the patient, lower-cased, in first-seen
/// order without duplicates. `patient.conditions` should already include the
/// pregnancy label for pregnant patients.
pub fn patient_risk_profile(patient: &PatientProfile) -> Vec<String> {
    let mut profile: Vec<String> = Vec::new();
    let mut add = |item: &str| {
        if !item.is_empty() && !profile.iter().any(|p| p == item) {
            profile.push(item.to_string());
        }
    };

    if patient.is_elderly() {
        for &factor in ELDERLY_RISK_FACTORS {
            add(factor);
        }
    }

    for condition in &patient.conditions {
        let lower = condition.trim().to_lowercase();
        add(&lower);

        for expansion in CONDITION_EXPANSIONS {
            if mentions_any(&lower, expansion.terms) {
                for &factor in expansion.factors {
                    add(factor);
                }
            }
        }
    }

    if patient
        .current_medications
        .iter()
        .any(|m| mentions_any(&m.to_lowercase(), ANTICOAGULANT_TERMS))
    {
        add("concurrent anticoagulant use");
    }

    if patient.pregnant {
        add(PREGNANCY_CONDITION);
    }

    profile
}

fn factor_matches(profile: &[String], factor: &str) -> bool {
    let factor = factor.to_lowercase();
    if factor.is_empty() {
        return false;
    }
    profile
        .iter()
        .any(|item| factor.contains(item.as_str()) || item.contains(factor.as_str()))
}

/// Count reactions with at least one risk factor present in the profile.
/// Each reaction counts at most once.
pub fn count_risk_factor_matches(
    profile: &[String],
    reactions: &[AdverseReactionProfile],
) -> RiskFactorCounts {
    let mut counts = RiskFactorCounts::default();

    for reaction in reactions {
        if !reaction
            .risk_factors
            .iter()
            .any(|f| factor_matches(profile, f))
        {
            continue;
        }

        let severity = reaction.severity.to_lowercase();
        if mentions_any(&severity, CRITICAL_REACTION_TERMS) {
            counts.critical += 1;
        } else if mentions_any(&severity, HIGH_REACTION_TERMS) {
            counts.high += 1;
        }
    }

    counts
}

/// Raise `base` according to matched risk factors. Never lowers it.
pub fn escalate(base: Severity, counts: RiskFactorCounts) -> Severity {
    let escalated = if counts.critical >= CRITICAL_MATCHES_FOR_CRITICAL {
        Severity::Critical
    } else if base != Severity::Low {
        base
    } else if counts.critical >= CRITICAL_MATCHES_FOR_HIGH || counts.high >= HIGH_MATCHES_FOR_HIGH {
        Severity::High
    } else if counts.high >= HIGH_MATCHES_FOR_MEDIUM {
        Severity::Medium
    } else {
        Severity::Low
    };
    escalated.max(base)
}

/// Base level from findings, escalated by the patient's matched risk factors.
pub fn assess(
    interactions: &[InteractionFinding],
    contraindications: &[ContraindicationFinding],
    profile: &[String],
    reactions: &[AdverseReactionProfile],
) -> RiskAssessment {
    let base = calculate_overall_risk(interactions, contraindications);
    let counts = count_risk_factor_matches(profile, reactions);
    RiskAssessment {
        base,
        counts,
        level: escalate(base, counts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinical::adverse::adverse_reactions;

    const LEVELS: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    fn interaction(severity: Severity) -> InteractionFinding {
        InteractionFinding {
            interacting_drug: "Aspirin".into(),
            effect: "bleeding".into(),
            severity,
            mechanism: "Coagulation".into(),
            recommendation: "monitor".into(),
        }
    }

    fn contraindication(severity: Severity) -> ContraindicationFinding {
        ContraindicationFinding {
            finding_type: "Known Allergy".into(),
            description: "allergy".into(),
            severity,
            source: "Patient history".into(),
            recommendation: "avoid".into(),
        }
    }

    fn patient(age: i32, conditions: &[&str], meds: &[&str]) -> PatientProfile {
        PatientProfile {
            age,
            conditions: conditions.iter().map(|s| s.to_string()).collect(),
            current_medications: meds.iter().map(|s| s.to_string()).collect(),
            ..PatientProfile::default()
        }
    }

    #[test]
    fn no_findings_is_low() {
        assert_eq!(calculate_overall_risk(&[], &[]), Severity::Low);
    }

    #[test]
    fn overall_risk_is_max_of_findings() {
        for &a in &LEVELS {
            for &b in &LEVELS {
                let level = calculate_overall_risk(&[interaction(a)], &[contraindication(b)]);
                assert_eq!(level, a.max(b));
            }
        }
    }

    #[test]
    fn escalation_never_lowers_and_is_monotonic() {
        for &base in &LEVELS {
            for critical in 0..4 {
                for high in 0..4 {
                    let counts = RiskFactorCounts { critical, high };
                    let level = escalate(base, counts);
                    assert!(level >= base);

                    let more_critical = escalate(
                        base,
                        RiskFactorCounts {
                            critical: critical + 1,
                            high,
                        },
                    );
                    let more_high = escalate(
                        base,
                        RiskFactorCounts {
                            critical,
                            high: high + 1,
                        },
                    );
                    assert!(more_critical >= level);
                    assert!(more_high >= level);
                }
            }
        }
    }

    #[test]
    fn escalation_ladder() {
        let c = |critical, high| RiskFactorCounts { critical, high };
        assert_eq!(escalate(Severity::Low, c(0, 0)), Severity::Low);
        assert_eq!(escalate(Severity::Low, c(0, 1)), Severity::Medium);
        assert_eq!(escalate(Severity::Low, c(0, 2)), Severity::High);
        assert_eq!(escalate(Severity::Low, c(1, 0)), Severity::High);
        assert_eq!(escalate(Severity::Low, c(2, 0)), Severity::Critical);
        assert_eq!(escalate(Severity::Medium, c(1, 5)), Severity::Medium);
        assert_eq!(escalate(Severity::High, c(2, 0)), Severity::Critical);
    }

    #[test]
    fn elderly_profile_and_condition_expansion() {
        let profile = patient_risk_profile(&patient(70, &["Hipertensão", "Diabetes"], &[]));
        for expected in [
            "elderly",
            "age>65",
            "age>60",
            "hipertensão",
            "hypertension",
            "heart failure",
            "diabetes",
            "renal insufficiency",
        ] {
            assert!(profile.contains(&expected.to_string()), "missing {expected}");
        }
        // "diabetes" appears once even though it is both the raw condition and an expansion.
        assert_eq!(profile.iter().filter(|p| *p == "diabetes").count(), 1);
    }

    #[test]
    fn anticoagulant_in_current_medications() {
        let profile = patient_risk_profile(&patient(40, &[], &["Marevan 5mg"]));
        assert_eq!(profile, vec!["concurrent anticoagulant use".to_string()]);
    }

    #[test]
    fn pregnancy_added_once() {
        let mut p = patient(30, &["pregnancy"], &[]);
        p.pregnant = true;
        let profile = patient_risk_profile(&p);
        assert_eq!(profile, vec!["pregnancy".to_string()]);
    }

    #[test]
    fn elderly_nsaid_user_counts_one_high_match() {
        let profile = patient_risk_profile(&patient(70, &[], &[]));
        let counts = count_risk_factor_matches(&profile, &adverse_reactions("ibuprofen"));
        assert_eq!(counts, RiskFactorCounts { critical: 0, high: 1 });
    }

    #[test]
    fn elderly_cardiac_quinolone_user_counts_two_critical_matches() {
        let profile = patient_risk_profile(&patient(72, &["heart disease"], &[]));
        let counts = count_risk_factor_matches(&profile, &adverse_reactions("levofloxacin"));
        assert_eq!(counts.critical, 2);
        assert_eq!(escalate(Severity::Low, counts), Severity::Critical);
    }

    #[test]
    fn renal_metformin_counts_lactic_acidosis() {
        let profile = patient_risk_profile(&patient(70, &["insuficiência renal"], &[]));
        let counts = count_risk_factor_matches(&profile, &adverse_reactions("metformin"));
        assert_eq!(counts, RiskFactorCounts { critical: 1, high: 0 });
    }

    fn counts_for(drug: &str, conditions: &[&str]) -> RiskFactorCounts {
        let profile = patient_risk_profile(&patient(40, conditions, &[]));
        count_risk_factor_matches(&profile, &adverse_reactions(drug))
    }

    #[test]
    fn portuguese_conditions_reach_reaction_risk_factors() {
        let cases: &[(&str, &str, RiskFactorCounts)] = &[
            ("metformin", "insuficiência hepática", RiskFactorCounts { critical: 1, high: 0 }),
            ("metformin", "desidratação", RiskFactorCounts { critical: 1, high: 0 }),
            ("metformin", "sepse", RiskFactorCounts { critical: 1, high: 0 }),
            ("atorvastatina", "hipotireoidismo", RiskFactorCounts { critical: 1, high: 0 }),
            ("atorvastatina", "doença hepática", RiskFactorCounts { critical: 0, high: 1 }),
            ("diazepam", "alcoolismo", RiskFactorCounts { critical: 0, high: 1 }),
            ("diazepam", "dependência química", RiskFactorCounts { critical: 1, high: 0 }),
            ("acetaminophen", "etilismo", RiskFactorCounts { critical: 1, high: 0 }),
            ("ibuprofen", "úlcera péptica", RiskFactorCounts { critical: 1, high: 0 }),
            ("warfarin", "cirurgia recente", RiskFactorCounts { critical: 1, high: 0 }),
            ("levofloxacin", "distúrbio eletrolítico", RiskFactorCounts { critical: 1, high: 0 }),
        ];
        for (drug, condition, expected) in cases {
            assert_eq!(counts_for(drug, &[condition]), *expected, "{drug} with {condition}");
        }
    }

    #[test]
    fn hepatic_condition_expands_to_liver_factors() {
        let profile = patient_risk_profile(&patient(40, &["Insuficiência hepática"], &[]));
        assert!(profile.contains(&"hepatic insufficiency".to_string()));
        assert!(profile.contains(&"prior liver disease".to_string()));
        let counts = count_risk_factor_matches(&profile, &adverse_reactions("metformin"));
        assert_eq!(escalate(Severity::Low, counts), Severity::High);
    }

    #[test]
    fn empty_profile_matches_nothing() {
        let counts = count_risk_factor_matches(&[], &adverse_reactions("warfarin"));
        assert_eq!(counts, RiskFactorCounts::default());
    }

    #[test]
    fn assess_combines_base_and_escalation() {
        let profile = patient_risk_profile(&patient(70, &[], &[]));
        let assessment = assess(&[], &[], &profile, &adverse_reactions("ibuprofen"));
        assert_eq!(assessment.base, Severity::Low);
        assert_eq!(assessment.level, Severity::Medium);
    }
}
