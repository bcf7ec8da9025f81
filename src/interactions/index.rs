use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::models::InteractionFinding;

use super::classify::{classify_category, classify_severity, interaction_recommendation};
use super::normalize::SynonymTable;
use super::source::InteractionSource;
use super::types::{InteractionError, InteractionRecord, RawInteraction};

/// Separator between the two normalized names of a composite key.
pub const KEY_SEPARATOR: char = '|';

pub fn composite_key(normalized_a: &str, normalized_b: &str) -> String {
    format!("{normalized_a}{KEY_SEPARATOR}{normalized_b}")
}

/// Outcome of building the index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IndexStatus {
    Loaded { records: usize, keys: usize },
    /// Dataset unavailable: the index is empty and every lookup misses.
    Degraded { reason: String },
}

/// Bidirectional interaction lookup, built once and read-only afterwards.
///
/// Each record is stored under both `a|b` and `b|a`, sharing one allocation.
#[derive(Debug)]
pub struct InteractionIndex {
    entries: HashMap<String, Arc<InteractionRecord>>,
    synonyms: Arc<SynonymTable>,
    status: IndexStatus,
}

impl InteractionIndex {
    /// Normalize, classify and insert every row under both key orderings.
    /// Rows with a blank drug name are skipped; a repeated pair keeps the last row.
    pub fn build(rows: Vec<RawInteraction>, synonyms: Arc<SynonymTable>) -> Self {
        let mut entries = HashMap::with_capacity(rows.len() * 2);
        let mut records = 0usize;
        let mut skipped = 0usize;

        for row in rows {
            let normalized_a = synonyms.normalize(&row.drug_a);
            let normalized_b = synonyms.normalize(&row.drug_b);
            if normalized_a.is_empty() || normalized_b.is_empty() {
                skipped += 1;
                continue;
            }

            let record = Arc::new(InteractionRecord {
                severity: classify_severity(&row.description),
                category: classify_category(&row.description),
                drug_a: row.drug_a.trim().to_string(),
                drug_b: row.drug_b.trim().to_string(),
                description: row.description,
                normalized_a,
                normalized_b,
            });

            entries.insert(
                composite_key(&record.normalized_a, &record.normalized_b),
                Arc::clone(&record),
            );
            entries.insert(
                composite_key(&record.normalized_b, &record.normalized_a),
                record,
            );
            records += 1;
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Skipped interaction rows with blank drug names");
        }

        let keys = entries.len();
        Self {
            entries,
            synonyms,
            status: IndexStatus::Loaded { records, keys },
        }
    }

    /// Empty index marked as degraded.
    pub fn degraded(synonyms: Arc<SynonymTable>, reason: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            synonyms,
            status: IndexStatus::Degraded {
                reason: reason.into(),
            },
        }
    }

    /// Load rows from `source` and build, propagating any load error.
    pub fn try_load(
        source: &dyn InteractionSource,
        synonyms: Arc<SynonymTable>,
    ) -> Result<Self, InteractionError> {
        let rows = source.load_rows()?;
        let index = Self::build(rows, synonyms);
        tracing::info!(
            source = %source.describe(),
            keys = index.len(),
            "Interaction index loaded"
        );
        Ok(index)
    }

    /// Load rows from `source`; on failure log one warning and return an
    /// empty, degraded index so analyses report no known interactions.
    pub fn load(source: &dyn InteractionSource, synonyms: Arc<SynonymTable>) -> Self {
        match Self::try_load(source, Arc::clone(&synonyms)) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(
                    source = %source.describe(),
                    error = %e,
                    "Interaction dataset unavailable, continuing without interaction data"
                );
                Self::degraded(synonyms, e.to_string())
            }
        }
    }

    pub fn status(&self) -> &IndexStatus {
        &self.status
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, IndexStatus::Degraded { .. })
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Number of keys (two per stored pair, one for a drug paired with itself).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record for a pair of raw names, in either order.
    pub fn lookup(&self, drug_a: &str, drug_b: &str) -> Option<&InteractionRecord> {
        let key = composite_key(
            &self.synonyms.normalize(drug_a),
            &self.synonyms.normalize(drug_b),
        );
        self.entries.get(&key).map(Arc::as_ref)
    }

    /// Findings between `drug_name` and each entry of `others`, in the order of
    /// `others`. Blank entries and misses are skipped; duplicates are kept.
    pub fn find_interactions<S: AsRef<str>>(
        &self,
        drug_name: &str,
        others: &[S],
    ) -> Vec<InteractionFinding> {
        let drug = self.synonyms.normalize(drug_name);
        let mut findings = Vec::new();

        for other in others {
            let other = other.as_ref();
            if other.trim().is_empty() {
                continue;
            }

            let key = composite_key(&drug, &self.synonyms.normalize(other));
            if let Some(record) = self.entries.get(&key) {
                tracing::debug!(
                    drug = drug_name,
                    other,
                    severity = record.severity.as_str(),
                    "Interaction found"
                );
                findings.push(InteractionFinding {
                    interacting_drug: record.other_side(&drug).to_string(),
                    effect: record.description.clone(),
                    severity: record.severity,
                    mechanism: record.category.to_string(),
                    recommendation: interaction_recommendation(record.severity).to_string(),
                });
            }
        }

        findings
    }
}

// ---------------------------------------------------------------------------
// Lazy, build-once handle
// ---------------------------------------------------------------------------

/// Defers loading until first use. Concurrent first callers block on the same
/// initialization, so the dataset is parsed exactly once.
pub struct LazyInteractionIndex {
    source: Box<dyn InteractionSource + Send + Sync>,
    synonyms: Arc<SynonymTable>,
    cell: OnceLock<Arc<InteractionIndex>>,
}

impl LazyInteractionIndex {
    pub fn new(source: Box<dyn InteractionSource + Send + Sync>, synonyms: Arc<SynonymTable>) -> Self {
        Self {
            source,
            synonyms,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Arc<InteractionIndex> {
        let index = self.cell.get_or_init(|| {
            Arc::new(InteractionIndex::load(
                self.source.as_ref(),
                Arc::clone(&self.synonyms),
            ))
        });
        Arc::clone(index)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::interactions::source::{CsvInteractionSource, MemoryInteractionSource};
    use crate::models::Severity;

    fn sample_rows() -> Vec<RawInteraction> {
        vec![
            RawInteraction::new("Warfarin", "Aspirin", "Increased risk of bleeding when combined."),
            RawInteraction::new(
                "Simvastatin",
                "Clarithromycin",
                "The metabolism of Simvastatin can be decreased; contraindicated.",
            ),
            RawInteraction::new(
                "Sertraline",
                "Diazepam",
                "Monitor for additive sedation.",
            ),
            RawInteraction::new("", "Ibuprofen", "blank side"),
        ]
    }

    fn sample_index() -> InteractionIndex {
        InteractionIndex::build(sample_rows(), Arc::new(SynonymTable::builtin()))
    }

    #[test]
    fn build_stores_both_orderings() {
        let index = sample_index();
        assert_eq!(index.len(), 6);
        assert_eq!(
            index.status(),
            &IndexStatus::Loaded {
                records: 3,
                keys: 6
            }
        );
        let forward = index.lookup("warfarin", "acetylsalicylic acid").unwrap();
        let backward = index.lookup("Aspirin", "Warfarin").unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn lookup_is_symmetric_for_every_pair() {
        let index = sample_index();
        for row in sample_rows().into_iter().filter(|r| !r.drug_a.is_empty()) {
            let ab = index.find_interactions(&row.drug_a, &[&row.drug_b]);
            let ba = index.find_interactions(&row.drug_b, &[&row.drug_a]);
            assert_eq!(ab.len(), 1);
            assert_eq!(ba.len(), 1);
            assert_eq!(ab[0].severity, ba[0].severity);
            assert_eq!(ab[0].mechanism, ba[0].mechanism);
            assert_eq!(ab[0].effect, ba[0].effect);
        }
    }

    #[test]
    fn warfarin_aspirin_scenario() {
        let index = sample_index();
        let findings = index.find_interactions("Warfarin", &["Aspirin"]);
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.interacting_drug, "Aspirin");
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.mechanism, "Coagulation");
        assert!(finding.recommendation.to_lowercase().contains("extreme caution"));
    }

    #[test]
    fn brand_names_resolve_through_synonyms() {
        let index = sample_index();
        let findings = index.find_interactions("Marevan", &["AAS"]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].interacting_drug, "Aspirin");

        let findings = index.find_interactions("Aspirina", &["Coumadin"]);
        assert_eq!(findings[0].interacting_drug, "Warfarin");
    }

    #[test]
    fn empty_others_yields_nothing() {
        let index = sample_index();
        let none: [&str; 0] = [];
        assert!(index.find_interactions("Aspirin", &none).is_empty());
    }

    #[test]
    fn blank_entries_skipped_and_duplicates_kept() {
        let index = sample_index();
        let findings =
            index.find_interactions("Warfarin", &["", "  ", "Aspirin", "Paracetamol", "aspirina"]);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn findings_follow_order_of_others() {
        let index = sample_index();
        let rows = vec![
            RawInteraction::new("Warfarin", "Aspirin", "bleeding"),
            RawInteraction::new("Warfarin", "Simvastatin", "liver enzymes"),
        ];
        let index2 = InteractionIndex::build(rows, Arc::new(SynonymTable::builtin()));
        let findings = index2.find_interactions("Warfarin", &["Simvastatin", "Aspirin"]);
        let names: Vec<_> = findings.iter().map(|f| f.interacting_drug.as_str()).collect();
        assert_eq!(names, vec!["Simvastatin", "Aspirin"]);
        assert!(index.lookup("Warfarin", "Simvastatin").is_none());
    }

    #[test]
    fn repeated_pair_keeps_last_row_in_both_orderings() {
        let rows = vec![
            RawInteraction::new("A", "B", "monitor"),
            RawInteraction::new("B", "A", "fatal"),
        ];
        let index = InteractionIndex::build(rows, Arc::new(SynonymTable::builtin()));
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("a", "b").unwrap().severity, Severity::Critical);
        assert_eq!(index.lookup("b", "a").unwrap().severity, Severity::Critical);
    }

    #[test]
    fn missing_dataset_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvInteractionSource::new(dir.path().join("missing.csv"));
        let index = InteractionIndex::load(&source, Arc::new(SynonymTable::builtin()));
        assert!(index.is_degraded());
        assert!(index.is_empty());
        assert!(index.find_interactions("Warfarin", &["Aspirin"]).is_empty());
    }

    #[test]
    fn try_load_propagates_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvInteractionSource::new(dir.path().join("missing.csv"));
        let result = InteractionIndex::try_load(&source, Arc::new(SynonymTable::builtin()));
        assert!(matches!(result, Err(InteractionError::DatasetNotFound(_))));
    }

    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl InteractionSource for CountingSource {
        fn describe(&self) -> String {
            "counting".into()
        }

        fn load_rows(&self) -> Result<Vec<RawInteraction>, InteractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_rows())
        }
    }

    #[test]
    fn lazy_index_builds_once_under_concurrent_access() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = Arc::new(LazyInteractionIndex::new(
            Box::new(CountingSource {
                calls: Arc::clone(&calls),
            }),
            Arc::new(SynonymTable::builtin()),
        ));
        assert!(!lazy.is_initialized());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                std::thread::spawn(move || lazy.get().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 6);
        }

        assert!(lazy.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_index_over_memory_source() {
        let lazy = LazyInteractionIndex::new(
            Box::new(MemoryInteractionSource::new(sample_rows())),
            Arc::new(SynonymTable::builtin()),
        );
        assert_eq!(lazy.get().find_interactions("Diazepam", &["Sertraline"]).len(), 1);
    }
}
