//! On-disk suggestion lists

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use jobsheet_core::{check_collisions, field_token, Record};

use crate::error::RefinedResult;

/// The field suggestion cache.
///
/// Each field gets one `<token>.txt` file under the cache directory, holding
/// the distinct non-empty values ever seen in that field, one per line.
/// Files are created lazily on first sync or add.
#[derive(Debug, Clone)]
pub struct RefinedCache {
    dir: PathBuf,
}

impl RefinedCache {
    /// Create a cache handle for the given directory. No I/O happens until
    /// an operation runs.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Union the distinct non-empty values of every field in `rows` into the
    /// on-disk lists, creating missing files as needed. Values are stored
    /// with surrounding whitespace trimmed (one value per line). Existing
    /// entries are never removed, so repeated syncs are idempotent.
    ///
    /// Fails with a token collision error when two distinct field names in
    /// `fields` would share one list file.
    pub fn sync_from_store(&self, fields: &[String], rows: &[Record]) -> RefinedResult<()> {
        check_collisions(fields.iter().map(String::as_str))?;
        fs::create_dir_all(&self.dir)?;

        for field in fields {
            let mut values: BTreeSet<String> = self.read_list(field)?.into_iter().collect();
            for row in rows {
                let text = row.text(field);
                let text = text.trim();
                if !text.is_empty() {
                    values.insert(text.to_string());
                }
            }
            self.write_list(field, values.iter())?;
        }
        Ok(())
    }

    /// The current on-disk list for a field, or empty if the field has never
    /// been synced.
    pub fn get_suggestions(&self, field: &str) -> RefinedResult<Vec<String>> {
        self.read_list(field)
    }

    /// Append `value` to the field's list if it is non-empty and not already
    /// present (case-sensitive exact match). Returns whether the value was
    /// added.
    pub fn add_value(&self, field: &str, value: &str) -> RefinedResult<bool> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        let existing = self.read_list(field)?;
        if existing.iter().any(|v| v == value) {
            return Ok(false);
        }

        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.list_path(field))?;
        writeln!(file, "{value}")?;
        Ok(true)
    }

    /// Every list on disk, keyed by field token.
    pub fn all_lists(&self) -> RefinedResult<BTreeMap<String, Vec<String>>> {
        let mut lists = BTreeMap::new();
        if !self.dir.exists() {
            return Ok(lists);
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if let Some(token) = path.file_stem().and_then(|s| s.to_str()) {
                lists.insert(token.to_string(), read_lines(&path)?);
            }
        }
        Ok(lists)
    }

    fn list_path(&self, field: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", field_token(field)))
    }

    fn read_list(&self, field: &str) -> RefinedResult<Vec<String>> {
        let path = self.list_path(field);
        if !path.exists() {
            return Ok(Vec::new());
        }
        Ok(read_lines(&path)?)
    }

    fn write_list<'a, I>(&self, field: &str, values: I) -> RefinedResult<()>
    where
        I: Iterator<Item = &'a String>,
    {
        let mut out = String::new();
        for value in values {
            out.push_str(value);
            out.push('\n');
        }
        fs::write(self.list_path(field), out)?;
        Ok(())
    }
}

/// Read a list file: one value per line, surrounding whitespace trimmed,
/// blank lines skipped.
fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
