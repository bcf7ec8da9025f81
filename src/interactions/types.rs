use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::Severity;

// ---------------------------------------------------------------------------
// RawInteraction
// ---------------------------------------------------------------------------

/// One row of the interaction dataset, before normalization and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInteraction {
    pub drug_a: String,
    pub drug_b: String,
    pub description: String,
}

impl RawInteraction {
    pub fn new(drug_a: &str, drug_b: &str, description: &str) -> Self {
        Self {
            drug_a: drug_a.to_string(),
            drug_b: drug_b.to_string(),
            description: description.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// InteractionRecord
// ---------------------------------------------------------------------------

/// Classified interaction between two drugs. Identity is the unordered pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionRecord {
    /// Names as written in the dataset.
    pub drug_a: String,
    pub drug_b: String,
    pub normalized_a: String,
    pub normalized_b: String,
    pub description: String,
    pub severity: Severity,
    pub category: &'static str,
}

impl InteractionRecord {
    /// The dataset name of the side that is not `normalized_query`.
    pub fn other_side(&self, normalized_query: &str) -> &str {
        if self.normalized_a == normalized_query {
            &self.drug_b
        } else {
            &self.drug_a
        }
    }
}

// ---------------------------------------------------------------------------
// InteractionError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Interaction dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Interaction dataset read failed ({0}): {1}")]
    DatasetRead(String, String),

    #[error("Interaction dataset parse failed at row {row}: {reason}")]
    DatasetParse { row: usize, reason: String },

    #[error("Interaction dataset is missing column '{0}'")]
    MissingColumn(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Synonym table load failed ({0}): {1}")]
    SynonymLoad(String, String),

    #[error("Synonym table parse failed ({0}): {1}")]
    SynonymParse(String, String),
}
