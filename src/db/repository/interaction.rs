use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rusqlite::{params, Connection, OpenFlags};
use serde::Serialize;

use crate::db::DatabaseError;
use crate::interactions::classify::{classify_category, classify_severity};
use crate::interactions::{
    CsvInteractionSource, InteractionError, InteractionSource, RawInteraction, SynonymTable,
};
use crate::models::Severity;

/// Source label of rows written by the CSV importer. A re-import replaces them.
pub const CSV_IMPORT_SOURCE: &str = "CSV Import";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
    pub replaced: usize,
    pub by_severity: BTreeMap<Severity, usize>,
}

/// Replace every earlier CSV-import row with `rows`, in one transaction.
/// Severity and category come from the same classifier the in-memory index uses.
pub fn import_rows(
    conn: &mut Connection,
    rows: &[RawInteraction],
    synonyms: &SynonymTable,
) -> Result<ImportStats, DatabaseError> {
    let now = chrono::Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
    let mut stats = ImportStats::default();

    let tx = conn.transaction()?;
    stats.replaced = tx.execute(
        "DELETE FROM drug_interactions WHERE source = ?1",
        params![CSV_IMPORT_SOURCE],
    )?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO drug_interactions
             (drug_a, drug_b, normalized_a, normalized_b, description, severity, category, source, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        for row in rows {
            let normalized_a = synonyms.normalize(&row.drug_a);
            let normalized_b = synonyms.normalize(&row.drug_b);
            if normalized_a.is_empty() || normalized_b.is_empty() {
                stats.skipped += 1;
                continue;
            }

            let severity = classify_severity(&row.description);
            stmt.execute(params![
                row.drug_a.trim(),
                row.drug_b.trim(),
                normalized_a,
                normalized_b,
                row.description,
                severity.as_str(),
                classify_category(&row.description),
                CSV_IMPORT_SOURCE,
                now,
            ])?;
            stats.imported += 1;
            *stats.by_severity.entry(severity).or_insert(0) += 1;
        }
    }

    tx.commit()?;
    Ok(stats)
}

/// Read a CSV dataset and import it. See [`import_rows`].
pub fn import_csv(
    conn: &mut Connection,
    path: &Path,
    synonyms: &SynonymTable,
) -> Result<ImportStats, InteractionError> {
    let rows = CsvInteractionSource::new(path).load_rows()?;
    let stats = import_rows(conn, &rows, synonyms)?;

    tracing::info!(
        path = %path.display(),
        imported = stats.imported,
        skipped = stats.skipped,
        replaced = stats.replaced,
        "Interaction CSV imported"
    );
    for (severity, count) in &stats.by_severity {
        tracing::info!(severity = severity.as_str(), count, "Imported interactions by severity");
    }

    Ok(stats)
}

/// All stored interactions as raw rows, in insertion order.
pub fn load_interactions(conn: &Connection) -> Result<Vec<RawInteraction>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT drug_a, drug_b, description FROM drug_interactions ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(RawInteraction {
            drug_a: row.get(0)?,
            drug_b: row.get(1)?,
            description: row.get(2)?,
        })
    })?;

    let mut interactions = Vec::new();
    for row in rows {
        interactions.push(row?);
    }
    Ok(interactions)
}

pub fn count_interactions(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM drug_interactions", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(count)
}

/// Stored row count per severity, lowest severity first.
pub fn severity_counts(conn: &Connection) -> Result<BTreeMap<Severity, i64>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT severity, COUNT(*) FROM drug_interactions GROUP BY severity")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (severity, count) = row?;
        counts.insert(Severity::from_str(&severity)?, count);
    }
    Ok(counts)
}

// ═══════════════════════════════════════════════════════════
// SQLite-backed interaction source
// ═══════════════════════════════════════════════════════════

/// Reads the imported `drug_interactions` table, opened read-only.
#[derive(Debug, Clone)]
pub struct SqliteInteractionSource {
    path: PathBuf,
}

impl SqliteInteractionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InteractionSource for SqliteInteractionSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn load_rows(&self) -> Result<Vec<RawInteraction>, InteractionError> {
        if !self.path.exists() {
            return Err(InteractionError::DatasetNotFound(
                self.path.display().to_string(),
            ));
        }
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(DatabaseError::from)?;
        let rows = load_interactions(&conn)?;
        tracing::info!(path = %self.path.display(), rows = rows.len(), "Interaction table read");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use super::*;
    use crate::db::sqlite::{open_database, open_memory_database};
    use crate::interactions::InteractionIndex;

    fn sample_rows() -> Vec<RawInteraction> {
        vec![
            RawInteraction::new("Warfarin", "Aspirin", "Increased risk of bleeding."),
            RawInteraction::new("Simvastatin", "Clarithromycin", "Contraindicated combination."),
            RawInteraction::new("Sertraline", "Diazepam", "Monitor for sedation."),
            RawInteraction::new("", "Ibuprofen", "blank"),
        ]
    }

    #[test]
    fn import_counts_by_severity() {
        let mut conn = open_memory_database().unwrap();
        let stats = import_rows(&mut conn, &sample_rows(), &SynonymTable::builtin()).unwrap();

        assert_eq!(stats.imported, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.replaced, 0);
        assert_eq!(stats.by_severity.get(&Severity::High), Some(&1));
        assert_eq!(stats.by_severity.get(&Severity::Critical), Some(&1));
        assert_eq!(stats.by_severity.get(&Severity::Medium), Some(&1));

        let counts = severity_counts(&conn).unwrap();
        assert_eq!(counts.values().sum::<i64>(), 3);
    }

    #[test]
    fn reimport_replaces_previous_rows() {
        let mut conn = open_memory_database().unwrap();
        let synonyms = SynonymTable::builtin();
        import_rows(&mut conn, &sample_rows(), &synonyms).unwrap();
        let stats = import_rows(&mut conn, &sample_rows()[..1], &synonyms).unwrap();

        assert_eq!(stats.replaced, 3);
        assert_eq!(count_interactions(&conn).unwrap(), 1);
    }

    #[test]
    fn stored_rows_are_normalized_and_classified() {
        let mut conn = open_memory_database().unwrap();
        import_rows(&mut conn, &sample_rows(), &SynonymTable::builtin()).unwrap();
        let (normalized_b, category): (String, String) = conn
            .query_row(
                "SELECT normalized_b, category FROM drug_interactions WHERE drug_a = 'Warfarin'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(normalized_b, "acetylsalicylic acid");
        assert_eq!(category, "Coagulation");
    }

    #[test]
    fn import_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Drug 1,Drug 2,Interaction Description").unwrap();
        writeln!(file, "Warfarin,Aspirin,Increased risk of bleeding.").unwrap();
        writeln!(file, "Lithium,Ibuprofen,\"May increase lithium serum concentration, monitor.\"").unwrap();
        drop(file);

        let mut conn = open_memory_database().unwrap();
        let stats = import_csv(&mut conn, &path, &SynonymTable::builtin()).unwrap();
        assert_eq!(stats.imported, 2);
    }

    #[test]
    fn import_csv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = open_memory_database().unwrap();
        let result = import_csv(&mut conn, &dir.path().join("nope.csv"), &SynonymTable::builtin());
        assert!(matches!(result, Err(InteractionError::DatasetNotFound(_))));
    }

    #[test]
    fn sqlite_source_feeds_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("medsafe.db");
        {
            let mut conn = open_database(&db_path).unwrap();
            import_rows(&mut conn, &sample_rows(), &SynonymTable::builtin()).unwrap();
        }

        let source = SqliteInteractionSource::new(&db_path);
        let index =
            InteractionIndex::try_load(&source, Arc::new(SynonymTable::builtin())).unwrap();
        assert_eq!(index.len(), 6);
        assert_eq!(index.find_interactions("Aspirin", &["Marevan"]).len(), 1);
    }

    #[test]
    fn sqlite_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = SqliteInteractionSource::new(dir.path().join("missing.db"));
        assert!(matches!(
            source.load_rows(),
            Err(InteractionError::DatasetNotFound(_))
        ));
    }
}
