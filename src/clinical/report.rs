use std::fmt::Write as _;

use crate::models::{AdjustmentType, DosageAdjustment, PatientProfile, Severity};

use super::messages::{MessageTemplates, DISCLAIMER};
use super::terms::{any_condition_mentions, HEPATIC_TERMS, RENAL_TERMS};

/// Confidence when the analysis produced at least one finding.
pub const CONFIDENCE_WITH_FINDINGS: f64 = 0.85;
/// Confidence when nothing was found.
pub const CONFIDENCE_WITHOUT_FINDINGS: f64 = 0.65;
/// Confidence of a fallback result.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Flag-derived confidence, not a statistical estimate.
pub fn confidence_score(has_findings: bool) -> f64 {
    if has_findings {
        CONFIDENCE_WITH_FINDINGS
    } else {
        CONFIDENCE_WITHOUT_FINDINGS
    }
}

// ---------------------------------------------------------------------------
// Dosage adjustments
// ---------------------------------------------------------------------------

/// Dose adjustment suggestions from age and conditions. Renal and hepatic
/// suggestions are emitted at most once each.
pub fn dosage_adjustments(patient: &PatientProfile) -> Vec<DosageAdjustment> {
    let mut adjustments = Vec::new();

    if patient.is_elderly() {
        adjustments.push(DosageAdjustment {
            reason: format!("Elderly patient ({} years)", patient.age),
            recommendation: "Consider a reduced dose. Older patients may clear drugs more \
                             slowly and are more sensitive to adverse effects."
                .to_string(),
            adjustment_type: AdjustmentType::DoseReduction,
        });
    } else if patient.is_pediatric() {
        let mut recommendation = "Calculate the dose by body weight (mg/kg) and consult a \
                                  pediatrician."
            .to_string();
        if let Some(weight) = patient.weight_kg {
            let _ = write!(recommendation, " Recorded weight: {weight} kg.");
        }
        adjustments.push(DosageAdjustment {
            reason: format!("Pediatric patient ({} years)", patient.age),
            recommendation,
            adjustment_type: AdjustmentType::PediatricDosing,
        });
    }

    if any_condition_mentions(&patient.conditions, RENAL_TERMS) {
        adjustments.push(DosageAdjustment {
            reason: "Renal impairment".to_string(),
            recommendation: "Adjust the dose to creatinine clearance. Monitor renal function."
                .to_string(),
            adjustment_type: AdjustmentType::RenalImpairment,
        });
    }

    if any_condition_mentions(&patient.conditions, HEPATIC_TERMS) {
        adjustments.push(DosageAdjustment {
            reason: "Hepatic impairment".to_string(),
            recommendation: "Consider a dose reduction. Monitor liver function.".to_string(),
            adjustment_type: AdjustmentType::HepaticImpairment,
        });
    }

    adjustments
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Counts shown in the alerts section of the notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertCounts {
    pub interactions: usize,
    pub contraindications: usize,
    pub dosage_adjustments: usize,
}

/// Human-readable summary: title, risk headline, alert counts, special
/// population bullets and a fixed disclaimer. The alerts section appears only
/// when an interaction or contraindication was found.
pub fn analysis_notes(
    medication: &str,
    level: Severity,
    counts: AlertCounts,
    patient: &PatientProfile,
) -> String {
    let mut notes = String::new();
    let _ = writeln!(notes, "## Clinical Analysis - {medication}");
    notes.push('\n');
    let _ = writeln!(notes, "{}", MessageTemplates::risk_headline(level));

    if counts.interactions + counts.contraindications > 0 {
        notes.push_str("\n### Alerts Identified:\n");
        if counts.contraindications > 0 {
            let _ = writeln!(notes, "- {} contraindication(s)", counts.contraindications);
        }
        if counts.interactions > 0 {
            let _ = writeln!(notes, "- {} drug interaction(s)", counts.interactions);
        }
        if counts.dosage_adjustments > 0 {
            let _ = writeln!(
                notes,
                "- {} dosage adjustment(s) recommended",
                counts.dosage_adjustments
            );
        }
    }

    let mut population = Vec::new();
    if patient.is_elderly() {
        population.push("- Elderly patient: greater sensitivity to adverse effects");
    }
    if patient.is_pediatric() {
        population.push("- Pediatric patient: weight-based dosing required");
    }
    if patient.pregnant {
        population.push("- Pregnant patient: check safety category in pregnancy");
    }
    if !population.is_empty() {
        notes.push_str("\n### Special Population:\n");
        for line in population {
            let _ = writeln!(notes, "{line}");
        }
    }

    notes.push_str("\n---\n");
    notes.push_str(DISCLAIMER);
    notes
}
