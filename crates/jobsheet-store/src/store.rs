//! CSV-backed record table

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use jobsheet_core::{FieldValue, Record, Schema};

use crate::error::{StoreError, StoreResult};

/// The record table, persisted as one CSV file.
///
/// The header row is the schema; every data row is one [`Record`]. The store
/// tolerates ragged files: cells missing from a row read as empty, and cells
/// beyond the header are ignored.
///
/// Access is not safe under concurrent writers; callers that mutate from
/// multiple threads must serialize writes themselves (the HTTP service holds
/// a single write lock).
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    /// Create a store handle for the given file path. No I/O happens until
    /// an operation runs.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the backing file with the canonical header if absent,
    /// including any missing parent directories. Idempotent.
    pub fn ensure_initialized(&self) -> StoreResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(Schema::canonical().fields())?;
        writer.flush()?;
        Ok(())
    }

    /// Read the header row (the current schema, in stored order)
    pub fn list_fields(&self) -> StoreResult<Vec<String>> {
        let mut reader = self.open_reader()?;
        let headers = reader.headers()?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    /// Load the full table: the field list and every row.
    pub fn load(&self) -> StoreResult<(Vec<String>, Vec<Record>)> {
        let mut reader = self.open_reader()?;
        let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let row = result?;
            let mut record = Record::new();
            for (idx, field) in fields.iter().enumerate() {
                // Missing cells default to empty; extra cells are dropped
                let cell = row.get(idx).unwrap_or("");
                record.set(field.clone(), FieldValue::text(cell));
            }
            rows.push(record);
        }
        Ok((fields, rows))
    }

    /// All rows whose `field` equals `value`, comparing both sides as text.
    ///
    /// An empty result is not an error; the HTTP boundary decides whether
    /// "no matches" becomes a 404.
    pub fn find_by_field(&self, field: &str, value: &str) -> StoreResult<Vec<Record>> {
        let (fields, rows) = self.load()?;
        if !fields.iter().any(|f| f == field) {
            return Err(StoreError::UnknownField(field.to_string()));
        }
        Ok(rows
            .into_iter()
            .filter(|row| row.text(field) == value)
            .collect())
    }

    /// Append one row. Unspecified fields default to empty; keys not present
    /// in the header are ignored (the header is fixed at initialization).
    ///
    /// Fails with [`StoreError::EmptyRecord`] when the record carries no
    /// non-empty values.
    pub fn insert(&self, record: &Record) -> StoreResult<()> {
        if record.is_empty() || record.is_blank() {
            return Err(StoreError::EmptyRecord);
        }
        let fields = self.list_fields()?;

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(fields.iter().map(|f| record.text(f)))?;
        writer.flush()?;
        Ok(())
    }

    /// Overwrite the keys present in `patch` on the first row whose
    /// `id_field` equals `id_value`, leaving other fields untouched.
    ///
    /// Fails with [`StoreError::RowNotFound`] when no row matches; the file
    /// is not rewritten in that case.
    pub fn update_by_field(
        &self,
        id_field: &str,
        id_value: &str,
        patch: &Record,
    ) -> StoreResult<()> {
        let (fields, mut rows) = self.load()?;
        if !fields.iter().any(|f| f == id_field) {
            return Err(StoreError::UnknownField(id_field.to_string()));
        }

        let target = rows
            .iter_mut()
            .find(|row| row.text(id_field) == id_value)
            .ok_or_else(|| StoreError::RowNotFound {
                field: id_field.to_string(),
                value: id_value.to_string(),
            })?;

        for field in &fields {
            if let Some(value) = patch.get(field) {
                target.set(field.clone(), value.clone());
            }
        }

        self.write_all(&fields, &rows)
    }

    /// Rewrite the whole file: header row, then every record in field order
    fn write_all(&self, fields: &[String], rows: &[Record]) -> StoreResult<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(fields)?;
        for row in rows {
            writer.write_record(fields.iter().map(|f| row.text(f)))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn open_reader(&self) -> StoreResult<csv::Reader<File>> {
        if !self.path.exists() {
            return Err(StoreError::StoreMissing(self.path.clone()));
        }
        Ok(csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?)
    }
}
