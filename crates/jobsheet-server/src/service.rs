//! The sync service: sequences store and cache side effects

use std::collections::BTreeMap;
use std::fs;
use std::sync::Mutex;

use jobsheet_core::Record;
use jobsheet_refined::RefinedCache;
use jobsheet_store::TableStore;

use crate::config::ServerConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::locks::LockFile;
use crate::retry::with_retry;

/// The sync service.
///
/// Owns the record store, the suggestion cache, and the locked-field state,
/// and sequences every side effect between them: record writes feed the
/// suggestion lists for the affected fields, and a resync re-derives every
/// list from the whole table.
///
/// Store-mutating operations are serialized behind a single lock, closing
/// the read-modify-write race that concurrent writers would otherwise hit.
#[derive(Debug)]
pub struct SyncService {
    config: ServerConfig,
    store: TableStore,
    cache: RefinedCache,
    locks: LockFile,
    write_lock: Mutex<()>,
}

impl SyncService {
    /// Create the service and run the one-time initialization: data
    /// directory, backing table with the canonical header, and an initial
    /// suggestion sync. Idempotent, and the only place initialization
    /// happens; requests never re-derive state themselves.
    pub fn initialize(config: ServerConfig) -> ServiceResult<Self> {
        fs::create_dir_all(&config.data_dir)
            .map_err(|err| ServiceError::internal(format!("creating data directory: {err}")))?;

        let store = TableStore::new(config.table_path());
        let cache = RefinedCache::new(config.refined_dir());
        let locks = LockFile::new(config.locks_path());

        with_retry(|| store.ensure_initialized())?;
        let (fields, rows) = store.load()?;
        with_retry(|| cache.sync_from_store(&fields, &rows))?;

        log::info!(
            "initialized data directory {} ({} fields, {} rows)",
            config.data_dir.display(),
            fields.len(),
            rows.len()
        );

        Ok(Self {
            config,
            store,
            cache,
            locks,
            write_lock: Mutex::new(()),
        })
    }

    /// The service configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Current schema fields, in stored order
    pub fn headers(&self) -> ServiceResult<Vec<String>> {
        Ok(self.store.list_fields()?)
    }

    /// Every suggestion list on disk, keyed by field token
    pub fn refined_lists(&self) -> ServiceResult<BTreeMap<String, Vec<String>>> {
        Ok(self.cache.all_lists()?)
    }

    /// The full table: schema fields plus every row
    pub fn records(&self) -> ServiceResult<(Vec<String>, Vec<Record>)> {
        Ok(self.store.load()?)
    }

    /// Rows matching `value` in `field` (or the configured search field).
    ///
    /// No matches is a [`ServiceError::NotFound`] at this boundary.
    pub fn search(&self, field: Option<&str>, value: &str) -> ServiceResult<(Vec<String>, Vec<Record>)> {
        let field = field.unwrap_or(&self.config.search_field);
        let fields = self.store.list_fields()?;
        let rows = self.store.find_by_field(field, value)?;
        if rows.is_empty() {
            return Err(ServiceError::not_found(format!(
                "no rows found for {field} = \"{value}\""
            )));
        }
        Ok((fields, rows))
    }

    /// Insert one record and union its values into the suggestion lists for
    /// the affected fields.
    pub fn insert(&self, record: &Record) -> ServiceResult<String> {
        let _guard = self.write_guard();

        with_retry(|| self.store.insert(record))?;
        let fields = self.store.list_fields()?;
        self.absorb_values(&fields, record)?;

        log::info!("inserted record ({} fields set)", record.len());
        Ok("record added".to_string())
    }

    /// Patch the first row matching `id_value` on the configured identifier
    /// field, then union the patched values into the suggestion lists.
    pub fn update(&self, id_value: &str, patch: &Record) -> ServiceResult<String> {
        let _guard = self.write_guard();

        with_retry(|| {
            self.store
                .update_by_field(&self.config.identifier_field, id_value, patch)
        })?;
        let fields = self.store.list_fields()?;
        self.absorb_values(&fields, patch)?;

        log::info!(
            "updated record {} = {id_value}",
            self.config.identifier_field
        );
        Ok(format!(
            "record with {} = {id_value} updated",
            self.config.identifier_field
        ))
    }

    /// Add a single new suggestion value for a schema field.
    pub fn add_suggestion(&self, field: &str, value: &str) -> ServiceResult<String> {
        let _guard = self.write_guard();

        let value = value.trim();
        if value.is_empty() {
            return Err(ServiceError::bad_request("value must not be empty"));
        }
        let fields = self.store.list_fields()?;
        if !fields.iter().any(|f| f == field) {
            return Err(ServiceError::bad_request(format!("unknown field: {field}")));
        }

        let added = with_retry(|| self.cache.add_value(field, value))?;
        Ok(if added {
            format!("\"{value}\" added to {field}")
        } else {
            format!("\"{value}\" already present in {field}")
        })
    }

    /// Re-derive every suggestion list from the whole table.
    pub fn resync(&self) -> ServiceResult<String> {
        let _guard = self.write_guard();

        let (fields, rows) = self.store.load()?;
        with_retry(|| self.cache.sync_from_store(&fields, &rows))?;

        log::info!("refined lists synchronized ({} fields)", fields.len());
        Ok("refined lists synchronized".to_string())
    }

    /// The persisted locked-field toggles
    pub fn locks(&self) -> ServiceResult<BTreeMap<String, bool>> {
        self.locks
            .read()
            .map_err(|err| ServiceError::internal(format!("reading lock state: {err}")))
    }

    /// Merge locked-field toggles into the persisted state
    pub fn set_locks(&self, updates: &BTreeMap<String, bool>) -> ServiceResult<String> {
        let _guard = self.write_guard();

        self.locks
            .merge(updates)
            .map_err(|err| ServiceError::internal(format!("writing lock state: {err}")))?;
        Ok("lock state saved".to_string())
    }

    /// Union a record's non-empty values into the lists of the fields it
    /// actually carries.
    fn absorb_values(&self, fields: &[String], record: &Record) -> ServiceResult<()> {
        for field in fields {
            let text = record.text(field);
            if record.get(field).is_some() && !text.trim().is_empty() {
                with_retry(|| self.cache.add_value(field, &text))?;
            }
        }
        Ok(())
    }

    fn write_guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
