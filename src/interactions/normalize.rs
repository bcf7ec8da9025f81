use std::collections::HashMap;
use std::path::Path;

use super::types::InteractionError;

/// Commercial and colloquial names (Brazilian and US market) mapped to the
/// scientific names used by the interaction dataset.
const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    // Aspirin
    ("aspirina", "acetylsalicylic acid"),
    ("aspirin", "acetylsalicylic acid"),
    ("aas", "acetylsalicylic acid"),
    ("ácido acetilsalicílico", "acetylsalicylic acid"),
    // Paracetamol
    ("paracetamol", "acetaminophen"),
    ("tylenol", "acetaminophen"),
    // Metformin
    ("metformina", "metformin"),
    ("glifage", "metformin"),
    // Losartan
    ("losartana", "losartan"),
    ("losartan potássico", "losartan"),
    ("cozaar", "losartan"),
    // Ibuprofen
    ("ibuprofeno", "ibuprofen"),
    ("advil", "ibuprofen"),
    ("motrin", "ibuprofen"),
    // Amoxicillin
    ("amoxicilina", "amoxicillin"),
    // Metamizole
    ("dipirona", "metamizole"),
    ("novalgina", "metamizole"),
    // Omeprazole
    ("omeprazol", "omeprazole"),
    // Sertraline
    ("sertralina", "sertraline"),
    ("zoloft", "sertraline"),
    // Fluoxetine
    ("fluoxetina", "fluoxetine"),
    ("prozac", "fluoxetine"),
    // Atorvastatin
    ("atorvastatina", "atorvastatin"),
    ("lipitor", "atorvastatin"),
    // Simvastatin
    ("simvastatina", "simvastatin"),
    ("zocor", "simvastatin"),
    // Warfarin
    ("varfarina", "warfarin"),
    ("coumadin", "warfarin"),
    ("marevan", "warfarin"),
    // Benzodiazepines
    ("valium", "diazepam"),
    ("rivotril", "clonazepam"),
];

/// Lower-case name -> canonical scientific name. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SynonymTable {
    /// Table bundled with the crate.
    pub fn builtin() -> Self {
        Self::from_pairs(
            BUILTIN_SYNONYMS
                .iter()
                .map(|(alias, canonical)| (alias.to_string(), canonical.to_string())),
        )
    }

    /// Build from arbitrary pairs. Keys and values are trimmed and lower-cased;
    /// a canonical name that is itself an alias resolves to its final target,
    /// so `normalize` stays idempotent. Aliases caught in a cycle all resolve
    /// to the cycle's lexicographically smallest member.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: HashMap<String, String> = pairs
            .into_iter()
            .map(|(alias, canonical)| {
                (
                    alias.trim().to_lowercase(),
                    canonical.trim().to_lowercase(),
                )
            })
            .filter(|(alias, canonical)| !alias.is_empty() && !canonical.is_empty())
            .collect();

        let mut cyclic = 0usize;
        let entries = raw
            .iter()
            .map(|(alias, canonical)| {
                let resolved = resolve_chain(&raw, canonical);
                if resolved.cyclic {
                    cyclic += 1;
                }
                (alias.clone(), resolved.target)
            })
            .collect();

        if cyclic > 0 {
            tracing::warn!(aliases = cyclic, "Synonym cycle collapsed to one name");
        }

        Self { entries }
    }

    /// Load a JSON object `{ "alias": "canonical", ... }`.
    pub fn load(path: &Path) -> Result<Self, InteractionError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            InteractionError::SynonymLoad(path.display().to_string(), e.to_string())
        })?;
        let pairs: HashMap<String, String> = serde_json::from_str(&json).map_err(|e| {
            InteractionError::SynonymParse(path.display().to_string(), e.to_string())
        })?;

        let table = Self::from_pairs(pairs);
        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "Synonym table loaded"
        );
        Ok(table)
    }

    /// Canonical name for an exact (trimmed, case-insensitive) alias.
    pub fn resolve(&self, raw_name: &str) -> Option<&str> {
        self.entries
            .get(&raw_name.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Trim, lower-case, then map through the table on an exact key hit.
    pub fn normalize(&self, raw_name: &str) -> String {
        let lowered = raw_name.trim().to_lowercase();
        match self.entries.get(&lowered) {
            Some(canonical) => canonical.clone(),
            None => lowered,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct Resolved {
    target: String,
    cyclic: bool,
}

/// Follow `start` through `raw` until a name with no further mapping. On a
/// cycle, the smallest member stands for the whole cycle.
fn resolve_chain(raw: &HashMap<String, String>, start: &str) -> Resolved {
    let mut path: Vec<&str> = vec![start];
    let mut current = start;

    while let Some(next) = raw.get(current) {
        if next == current {
            break;
        }
        if let Some(pos) = path.iter().position(|seen| *seen == next.as_str()) {
            let target = path[pos..].iter().min().copied().unwrap_or(current);
            return Resolved {
                target: target.to_string(),
                cyclic: true,
            };
        }
        path.push(next.as_str());
        current = next.as_str();
    }

    Resolved {
        target: current.to_string(),
        cyclic: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_brand_names() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize("Marevan"), "warfarin");
        assert_eq!(table.normalize("  TYLENOL "), "acetaminophen");
        assert_eq!(table.normalize("Aspirina"), "acetylsalicylic acid");
    }

    #[test]
    fn unknown_name_is_lowercased_and_trimmed() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize("  Levofloxacin "), "levofloxacin");
    }

    #[test]
    fn no_partial_matching() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize("aspirina 100mg"), "aspirina 100mg");
        assert_eq!(table.resolve("asp"), None);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize(""), "");
        assert_eq!(table.normalize("   "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let table = SynonymTable::builtin();
        for name in [
            "Aspirina", "AAS", "glifage", "Metformin", "Rivotril", "unknown drug", "", " Zoloft ",
        ] {
            let once = table.normalize(name);
            assert_eq!(table.normalize(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn chained_aliases_resolve_to_final_target() {
        let table = SynonymTable::from_pairs(vec![
            ("tylenol".to_string(), "Paracetamol".to_string()),
            ("paracetamol".to_string(), "acetaminophen".to_string()),
        ]);
        assert_eq!(table.normalize("Tylenol"), "acetaminophen");
        assert_eq!(table.normalize(&table.normalize("Tylenol")), "acetaminophen");
    }

    #[test]
    fn two_alias_cycle_is_idempotent() {
        let table = SynonymTable::from_pairs(vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "a".to_string()),
        ]);
        for name in ["a", "b"] {
            let once = table.normalize(name);
            assert_eq!(once, "a");
            assert_eq!(table.normalize(&once), once);
        }
    }

    #[test]
    fn cycle_behind_a_chain_resolves_to_one_name() {
        let table = SynonymTable::from_pairs(vec![
            ("brand".to_string(), "zeta".to_string()),
            ("zeta".to_string(), "gamma".to_string()),
            ("gamma".to_string(), "delta".to_string()),
            ("delta".to_string(), "zeta".to_string()),
        ]);
        for name in ["brand", "zeta", "gamma", "delta"] {
            let once = table.normalize(name);
            assert_eq!(once, "delta", "for {name}");
            assert_eq!(table.normalize(&once), once);
        }
    }

    #[test]
    fn self_mapping_is_kept() {
        let table = SynonymTable::from_pairs(vec![("x".to_string(), "X".to_string())]);
        assert_eq!(table.normalize("x"), "x");
    }

    #[test]
    fn load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"{"Puran T4": "levothyroxine", "glifage": "metformin"}"#).unwrap();

        let table = SynonymTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.normalize("puran t4"), "levothyroxine");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SynonymTable::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, InteractionError::SynonymLoad(_, _)));
    }

    #[test]
    fn load_malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = SynonymTable::load(&path).unwrap_err();
        assert!(matches!(err, InteractionError::SynonymParse(_, _)));
    }
}
