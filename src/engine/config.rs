//! Runtime configuration, resolved from the environment with local defaults.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_DATA_DIR: &str = ".repairtrack";
const DB_FILE: &str = "state.db";

/// Where data lives and how logs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_json: bool,
}

impl Config {
    /// Builds config from `REPAIRTRACK_DIR` and `REPAIRTRACK_LOG_JSON`.
    ///
    /// An explicit `data_dir` (the `--data-dir` flag) wins over the environment.
    #[must_use]
    pub fn from_env(data_dir: Option<&Path>) -> Self {
        Self::resolve(
            data_dir,
            env::var("REPAIRTRACK_DIR").ok().as_deref(),
            env::var("REPAIRTRACK_LOG_JSON").ok().as_deref(),
        )
    }

    fn resolve(explicit: Option<&Path>, env_dir: Option<&str>, env_json: Option<&str>) -> Self {
        let data_dir = explicit
            .map(Path::to_path_buf)
            .or_else(|| env_dir.filter(|d| !d.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            data_dir,
            log_json: env_json.is_some_and(parse_bool),
        }
    }

    /// Path of the SQLite file inside the data directory.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
