use std::path::{Path, PathBuf};

/// Application-level constants
pub const APP_NAME: &str = "MedSafe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_INTERACTIONS: &str = "MEDSAFE_INTERACTIONS";
pub const ENV_SYNONYMS: &str = "MEDSAFE_SYNONYMS";
pub const ENV_DB: &str = "MEDSAFE_DB";

pub const DATASET_FILE_NAME: &str = "db_drug_interactions.csv";
pub const DATABASE_FILE_NAME: &str = "medsafe.db";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "medsafe_lib=debug,medsafe=debug,warn"
    } else {
        "medsafe_lib=info,medsafe=info,warn"
    }
}

/// Get the application data directory
/// ~/MedSafe/ on all platforms, or ./MedSafe when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Dataset locations tried in order when no explicit path is configured.
pub fn dataset_candidates() -> Vec<PathBuf> {
    vec![
        app_data_dir().join(DATASET_FILE_NAME),
        Path::new("data").join(DATASET_FILE_NAME),
    ]
}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub interactions_path: PathBuf,
    pub synonyms_path: Option<PathBuf>,
    pub database_path: PathBuf,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Resolve settings through `lookup`, falling back to defaults.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let non_empty = |key: &str| lookup(key).filter(|p| !p.as_os_str().is_empty());

        let interactions_path = non_empty(ENV_INTERACTIONS).unwrap_or_else(|| {
            let candidates = dataset_candidates();
            candidates
                .iter()
                .find(|p| p.exists())
                .cloned()
                .unwrap_or_else(|| candidates[0].clone())
        });

        Self {
            interactions_path,
            synonyms_path: non_empty(ENV_SYNONYMS),
            database_path: non_empty(ENV_DB)
                .unwrap_or_else(|| app_data_dir().join(DATABASE_FILE_NAME)),
        }
    }
}
