//! Server configuration

use std::path::PathBuf;

/// Configuration for the sync service, passed in at startup.
///
/// There is no global state: everything the service needs to know lives
/// here, and paths for the persisted files derive from `data_dir`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Directory holding the table file, refined lists, and lock state
    pub data_dir: PathBuf,
    /// Field the update route uses to locate rows
    pub identifier_field: String,
    /// Default field for the search route
    pub search_field: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            data_dir: PathBuf::from("db"),
            identifier_field: "S.O.#".to_string(),
            search_field: "P.O.#".to_string(),
        }
    }
}

impl ServerConfig {
    /// Configuration rooted at the given data directory
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Path of the record table file
    pub fn table_path(&self) -> PathBuf {
        self.data_dir.join("jobs.csv")
    }

    /// Directory of the refined suggestion lists
    pub fn refined_dir(&self) -> PathBuf {
        self.data_dir.join("refined")
    }

    /// Path of the locked-field state file
    pub fn locks_path(&self) -> PathBuf {
        self.data_dir.join("locks.json")
    }
}
