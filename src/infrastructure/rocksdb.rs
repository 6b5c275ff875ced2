use crate::domain::ports::SettingsStore;
use crate::domain::settings::Setting;
use crate::error::{FeeError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding addon settings rows.
pub const CF_SETTINGS: &str = "addon_settings";

const KEY_SEPARATOR: u8 = 0;

/// A persistent addon settings table backed by RocksDB.
///
/// Rows are keyed by `module \0 setting`, so a module's rows are contiguous and
/// can be read with a single prefix scan. Values are stored as raw UTF-8 strings.
///
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDbSettingsStore {
    db: Arc<DB>,
}

impl RocksDbSettingsStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_settings = ColumnFamilyDescriptor::new(CF_SETTINGS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_settings])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_SETTINGS)
            .ok_or_else(|| FeeError::StorageError("Settings column family not found".to_string()))
    }
}

fn module_prefix(module: &str) -> Vec<u8> {
    let mut prefix = module.as_bytes().to_vec();
    prefix.push(KEY_SEPARATOR);
    prefix
}

fn row_key(module: &str, key: &str) -> Vec<u8> {
    let mut row = module_prefix(module);
    row.extend_from_slice(key.as_bytes());
    row
}

fn decode(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| FeeError::StorageError(format!("Invalid UTF-8 in settings row: {}", e)))
}

#[async_trait]
impl SettingsStore for RocksDbSettingsStore {
    async fn settings(&self, module: &str) -> Result<Vec<Setting>> {
        let cf = self.cf()?;
        let prefix = module_prefix(module);

        let mut rows = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix.as_slice(), Direction::Forward));
        for item in iter {
            let (key, value) = item?;
            let Some(setting_key) = key.strip_prefix(prefix.as_slice()) else {
                break;
            };
            rows.push(Setting::new(module, decode(setting_key)?, decode(&value)?));
        }

        Ok(rows)
    }

    async fn exists(&self, module: &str, key: &str) -> Result<bool> {
        let cf = self.cf()?;
        Ok(self.db.get_pinned_cf(&cf, row_key(module, key))?.is_some())
    }

    async fn put(&self, setting: Setting) -> Result<()> {
        let cf = self.cf()?;
        self.db.put_cf(
            &cf,
            row_key(&setting.module, &setting.key),
            setting.value.as_bytes(),
        )?;
        Ok(())
    }
}
