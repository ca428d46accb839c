// storage/mod.rs
use crate::cleaning::FlatTable;
use crate::errors::StorageError;
use crate::scraper::SessionState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Byte-oriented put/get keyed by a filesystem-like path.
pub trait ObjectStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// Local filesystem store. Relative keys resolve against `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ObjectStore for FileStore {
    /// Writes through a temp file in the target directory, then renames.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let io_err = |e: std::io::Error| StorageError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(io_err)?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(io_err)?;
        temp.write_all(bytes).map_err(io_err)?;
        temp.flush().map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), bytes = bytes.len(), "💾 Wrote object");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key);
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
            _ => StorageError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })
    }
}

fn put_json<T: Serialize>(store: &impl ObjectStore, key: &str, value: &T) -> Result<(), StorageError> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
    store.put(key, &bytes)
}

fn get_json<T: DeserializeOwned>(store: &impl ObjectStore, key: &str) -> Result<T, StorageError> {
    let bytes = store.get(key)?;
    serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
        path: key.to_string(),
        message: e.to_string(),
    })
}

pub fn persist_raw(
    store: &impl ObjectStore,
    state: &SessionState,
    destination: &str,
) -> Result<(), StorageError> {
    put_json(store, destination, state)?;
    info!(
        destination,
        listings = state.listings.len(),
        details = state.details.len(),
        "💾 Raw session saved"
    );
    Ok(())
}

pub fn load_raw(store: &impl ObjectStore, source: &str) -> Result<SessionState, StorageError> {
    let state: SessionState = get_json(store, source)?;
    info!(
        source,
        locality = %state.locality,
        listings = state.listings.len(),
        details = state.details.len(),
        "📂 Raw session loaded"
    );
    Ok(state)
}

pub fn persist_flat(
    store: &impl ObjectStore,
    table: &FlatTable,
    destination: &str,
) -> Result<(), StorageError> {
    put_json(store, destination, table)?;
    info!(destination, rows = table.len(), columns = table.columns.len(), "💾 Clean table saved");
    Ok(())
}

pub fn load_flat(store: &impl ObjectStore, source: &str) -> Result<FlatTable, StorageError> {
    get_json(store, source)
}

