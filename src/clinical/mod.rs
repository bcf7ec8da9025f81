//! Clinical rules layered on top of the interaction index: contraindications,
//! dosage adjustments, adverse reaction profiles and risk aggregation.

pub mod adverse;
pub mod contraindications;
pub mod engine;
pub mod messages;
pub mod report;
pub mod risk;
pub mod terms;

pub use engine::{AnalysisError, ClinicalEngine};
pub use risk::{RiskAssessment, RiskFactorCounts};
