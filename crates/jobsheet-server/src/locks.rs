//! Locked-field toggle state
//!
//! The client forms let an administrator lock individual fields against
//! editing. The toggle state is one small JSON file (field name -> bool)
//! owned by the server so every form sees the same locked set.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persisted locked-field toggles.
#[derive(Debug, Clone)]
pub struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Create a handle for the given state file path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current state; empty if the file does not exist yet.
    pub fn read(&self) -> io::Result<BTreeMap<String, bool>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Merge `updates` into the persisted state and return the result.
    /// Entries not named in `updates` survive unchanged.
    pub fn merge(&self, updates: &BTreeMap<String, bool>) -> io::Result<BTreeMap<String, bool>> {
        let mut states = self.read()?;
        for (field, locked) in updates {
            states.insert(field.clone(), *locked);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&states)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, content)?;
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let locks = LockFile::new(dir.path().join("locks.json"));

        assert!(locks.read().unwrap().is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_entries() {
        let dir = TempDir::new().unwrap();
        let locks = LockFile::new(dir.path().join("locks.json"));

        locks
            .merge(&BTreeMap::from([("Customer".to_string(), true)]))
            .unwrap();
        let merged = locks
            .merge(&BTreeMap::from([("REP".to_string(), false)]))
            .unwrap();

        assert_eq!(merged.get("Customer"), Some(&true));
        assert_eq!(merged.get("REP"), Some(&false));

        let reread = locks.read().unwrap();
        assert_eq!(reread.len(), 2);
    }

    #[test]
    fn test_merge_overwrites_named_entries() {
        let dir = TempDir::new().unwrap();
        let locks = LockFile::new(dir.path().join("locks.json"));

        locks
            .merge(&BTreeMap::from([("Customer".to_string(), true)]))
            .unwrap();
        locks
            .merge(&BTreeMap::from([("Customer".to_string(), false)]))
            .unwrap();

        assert_eq!(locks.read().unwrap().get("Customer"), Some(&false));
    }
}
