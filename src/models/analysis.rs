use serde::{Deserialize, Serialize};

use super::enums::{AdjustmentType, AnalysisStatus, Severity};

/// One drug-drug interaction relevant to the analysed medication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionFinding {
    pub interacting_drug: String,
    /// Raw description from the interaction dataset.
    pub effect: String,
    pub severity: Severity,
    /// Interaction category (Cardiovascular, Coagulation, ...).
    pub mechanism: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContraindicationFinding {
    #[serde(rename = "type")]
    pub finding_type: String,
    pub description: String,
    pub severity: Severity,
    pub source: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageAdjustment {
    pub reason: String,
    pub recommendation: String,
    pub adjustment_type: AdjustmentType,
}

/// Known adverse reaction of a drug class.
/// `severity` and `frequency` are free text as written in the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdverseReactionProfile {
    pub reaction: String,
    pub description: String,
    pub frequency: String,
    pub severity: String,
    pub risk_factors: Vec<String>,
}

/// Structured output of one triage analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub medication: String,
    pub risk_level: Severity,
    pub contraindications: Vec<ContraindicationFinding>,
    pub interactions: Vec<InteractionFinding>,
    pub dosage_adjustments: Vec<DosageAdjustment>,
    pub adverse_reactions: Vec<AdverseReactionProfile>,
    pub evidence_links: Vec<String>,
    pub model_used: String,
    /// Flag-derived constant, not a statistical confidence.
    pub confidence_score: f64,
    pub notes: String,
    pub status: AnalysisStatus,
}

impl AnalysisResult {
    pub fn has_findings(&self) -> bool {
        !self.interactions.is_empty() || !self.contraindications.is_empty()
    }
}
