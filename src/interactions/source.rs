use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::types::{InteractionError, RawInteraction};

/// Where the interaction dataset comes from. The format is the loader's concern;
/// the index only sees [`RawInteraction`] rows.
pub trait InteractionSource {
    /// Human-readable origin, used in logs and degradation reasons.
    fn describe(&self) -> String;

    fn load_rows(&self) -> Result<Vec<RawInteraction>, InteractionError>;
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub const COLUMN_DRUG_A: &str = "Drug 1";
pub const COLUMN_DRUG_B: &str = "Drug 2";
pub const COLUMN_DESCRIPTION: &str = "Interaction Description";

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Drug 1")]
    drug_a: String,
    #[serde(rename = "Drug 2")]
    drug_b: String,
    #[serde(rename = "Interaction Description")]
    description: String,
}

/// CSV file with `Drug 1`, `Drug 2` and `Interaction Description` columns.
#[derive(Debug, Clone)]
pub struct CsvInteractionSource {
    path: PathBuf,
}

impl CsvInteractionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InteractionSource for CsvInteractionSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn load_rows(&self) -> Result<Vec<RawInteraction>, InteractionError> {
        if !self.path.exists() {
            return Err(InteractionError::DatasetNotFound(
                self.path.display().to_string(),
            ));
        }
        let file = File::open(&self.path).map_err(|e| {
            InteractionError::DatasetRead(self.path.display().to_string(), e.to_string())
        })?;
        let rows = read_csv_rows(file)?;
        tracing::info!(path = %self.path.display(), rows = rows.len(), "Interaction CSV read");
        Ok(rows)
    }
}

/// Parse interaction rows from any CSV reader. Extra columns are ignored and
/// header names may carry surrounding whitespace.
pub fn read_csv_rows<R: Read>(input: R) -> Result<Vec<RawInteraction>, InteractionError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| InteractionError::DatasetRead("csv headers".into(), e.to_string()))?
        .clone();
    for column in [COLUMN_DRUG_A, COLUMN_DRUG_B, COLUMN_DESCRIPTION] {
        if !headers.iter().any(|h| h == column) {
            return Err(InteractionError::MissingColumn(column.to_string()));
        }
    }

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Row 1 is the header line.
        let row = result.map_err(|e| InteractionError::DatasetParse {
            row: i + 2,
            reason: e.to_string(),
        })?;
        rows.push(RawInteraction {
            drug_a: row.drug_a,
            drug_b: row.drug_b,
            description: row.description,
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Rows already held in memory (tests, or callers that fetched them elsewhere).
#[derive(Debug, Clone, Default)]
pub struct MemoryInteractionSource {
    rows: Vec<RawInteraction>,
}

impl MemoryInteractionSource {
    pub fn new(rows: Vec<RawInteraction>) -> Self {
        Self { rows }
    }
}

impl InteractionSource for MemoryInteractionSource {
    fn describe(&self) -> String {
        format!("memory:{} rows", self.rows.len())
    }

    fn load_rows(&self) -> Result<Vec<RawInteraction>, InteractionError> {
        Ok(self.rows.clone())
    }
}
