pub mod clinical;
pub mod config;
pub mod db;
pub mod interactions;
pub mod models;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use clinical::ClinicalEngine;
use config::Settings;
use db::SqliteInteractionSource;
use interactions::{CsvInteractionSource, InteractionSource, LazyInteractionIndex, SynonymTable};

/// Install the fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Synonym table from the configured file, or the built-in table when none is
/// configured or the file cannot be used.
pub fn load_synonyms(settings: &Settings) -> Arc<SynonymTable> {
    let Some(path) = settings.synonyms_path.as_deref() else {
        return Arc::new(SynonymTable::builtin());
    };
    match SynonymTable::load(path) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to built-in synonym table");
            Arc::new(SynonymTable::builtin())
        }
    }
}

/// SQLite files (`.db`, `.sqlite`, `.sqlite3`) are read as an imported table,
/// anything else as CSV.
pub fn interaction_source(path: &Path) -> Box<dyn InteractionSource + Send + Sync> {
    let is_sqlite = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "db" | "sqlite" | "sqlite3"));
    if is_sqlite {
        Box::new(SqliteInteractionSource::new(path))
    } else {
        Box::new(CsvInteractionSource::new(path))
    }
}

/// Lazily-built index for the configured dataset.
pub fn lazy_index(settings: &Settings) -> LazyInteractionIndex {
    LazyInteractionIndex::new(
        interaction_source(&settings.interactions_path),
        load_synonyms(settings),
    )
}

/// Engine over the configured dataset. Builds the index on first call.
pub fn engine_from_settings(settings: &Settings) -> ClinicalEngine {
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);
    ClinicalEngine::new(lazy_index(settings).get())
}
