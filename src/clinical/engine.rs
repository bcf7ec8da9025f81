use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::interactions::InteractionIndex;
use crate::models::{
    AnalysisRequest, AnalysisResult, AnalysisStatus, PatientProfile, Severity, UNKNOWN_MEDICATION,
};

use super::adverse::adverse_reactions;
use super::contraindications;
use super::messages::MessageTemplates;
use super::report::{self, AlertCounts, FALLBACK_CONFIDENCE};
use super::risk::{self, RiskAssessment};
use super::terms::PREGNANCY_CONDITION;

pub const MODEL_LABEL: &str = "clinical_rules_v1 + drug_interactions_db";
pub const FALLBACK_MODEL_LABEL: &str = "clinical_rules_v1 (fallback)";

pub const MAX_AGE: i32 = 150;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Runs the full medication triage for one patient against a shared index.
pub struct ClinicalEngine {
    index: Arc<InteractionIndex>,
}

impl ClinicalEngine {
    pub fn new(index: Arc<InteractionIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &InteractionIndex {
        &self.index
    }

    /// Resolve the medication name and patient from a request, then analyze.
    pub fn analyze_request(&self, request: &AnalysisRequest) -> AnalysisResult {
        let medication = request.medication_name();
        let patient = request.patient();
        self.analyze(&medication, &patient, &request.evidence_sources)
    }

    /// Parse a JSON request, analyze it, and serialize the result. A request
    /// that does not parse yields the fallback result; only serializing the
    /// output can fail.
    pub fn analyze_json(&self, request_json: &str) -> Result<String, AnalysisError> {
        let result = match serde_json::from_str::<AnalysisRequest>(request_json) {
            Ok(request) => self.analyze_request(&request),
            Err(e) => {
                let error = AnalysisError::from(e);
                tracing::warn!(error = %error, "Unreadable request, returning fallback result");
                fallback_result(UNKNOWN_MEDICATION, &error, &[])
            }
        };
        Ok(serde_json::to_string_pretty(&result)?)
    }

    /// Out-of-range patient values never block the allergy, condition and
    /// interaction checks: an unusable weight is dropped and the age is
    /// clamped to `0..=MAX_AGE`.
    pub fn analyze(
        &self,
        medication: &str,
        patient: &PatientProfile,
        evidence_links: &[String],
    ) -> AnalysisResult {
        let start = Instant::now();

        let synonyms = self.index.synonyms();
        let normalized = synonyms.normalize(medication);

        let mut effective = sanitize_patient(patient);
        // Pregnancy participates in condition rules and risk factors.
        if patient.pregnant
            && !effective
                .conditions
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(PREGNANCY_CONDITION))
        {
            effective.conditions.push(PREGNANCY_CONDITION.to_string());
        }

        let interactions = self
            .index
            .find_interactions(medication, &effective.current_medications);
        let contraindications = contraindications::analyze(
            medication,
            &effective.conditions,
            &effective.allergies,
            synonyms,
        );
        let dosage_adjustments = report::dosage_adjustments(&effective);
        let adverse_reactions = adverse_reactions(&normalized);

        let profile = risk::patient_risk_profile(&effective);
        let RiskAssessment {
            base,
            counts,
            level,
        } = risk::assess(&interactions, &contraindications, &profile, &adverse_reactions);

        let has_findings = !interactions.is_empty() || !contraindications.is_empty();
        let notes = report::analysis_notes(
            medication,
            level,
            AlertCounts {
                interactions: interactions.len(),
                contraindications: contraindications.len(),
                dosage_adjustments: dosage_adjustments.len(),
            },
            &effective,
        );

        tracing::info!(
            medication,
            normalized = %normalized,
            interactions = interactions.len(),
            contraindications = contraindications.len(),
            critical_factors = counts.critical,
            high_factors = counts.high,
            base_risk = base.as_str(),
            risk = level.as_str(),
            index_degraded = self.index.is_degraded(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Clinical analysis complete"
        );

        AnalysisResult {
            medication: medication.to_string(),
            risk_level: level,
            contraindications,
            interactions,
            dosage_adjustments,
            adverse_reactions,
            evidence_links: evidence_links.to_vec(),
            model_used: MODEL_LABEL.to_string(),
            confidence_score: report::confidence_score(has_findings),
            notes,
            status: AnalysisStatus::Completed,
        }
    }
}

fn sanitize_patient(patient: &PatientProfile) -> PatientProfile {
    let mut effective = patient.clone();
    effective.age = patient.age.clamp(0, MAX_AGE);
    effective.weight_kg = patient.weight_kg.filter(|w| w.is_finite() && *w > 0.0);

    if effective.age != patient.age || effective.weight_kg != patient.weight_kg {
        tracing::debug!(
            age = patient.age,
            weight_kg = ?patient.weight_kg,
            "Out-of-range patient values adjusted"
        );
    }
    effective
}

/// Medium risk, low confidence, no findings.
pub fn fallback_result(
    medication: &str,
    error: &AnalysisError,
    evidence_links: &[String],
) -> AnalysisResult {
    AnalysisResult {
        medication: medication.to_string(),
        risk_level: Severity::Medium,
        contraindications: Vec::new(),
        interactions: Vec::new(),
        dosage_adjustments: Vec::new(),
        adverse_reactions: Vec::new(),
        evidence_links: evidence_links.to_vec(),
        model_used: FALLBACK_MODEL_LABEL.to_string(),
        confidence_score: FALLBACK_CONFIDENCE,
        notes: MessageTemplates::fallback(medication, &error.to_string()),
        status: AnalysisStatus::ErrorFallback,
    }
}
