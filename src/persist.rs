//! Persistence boundary: the ledger as one opaque blob in a key-value
//! byte store.

use crate::ledger::Ledger;
use crate::model::Record;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The single key the ledger lives under.
pub const LEDGER_KEY: &str = "entries";

/// An opaque byte store keyed by name. The ledger neither knows nor cares
/// what sits behind it.
pub trait BlobStore {
    /// Fetch the bytes under `key`, `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `bytes` under `key`, replacing any previous value.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// A directory of files, one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Unable to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Unable to read {}", path.display())),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.key_path(key);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Unable to write to {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Unable to remove {}", path.display())),
        }
    }
}

/// Serialize the ledger (all fields, derived ones included) as pretty JSON
/// and store it under [`LEDGER_KEY`].
pub fn save_ledger(store: &dyn BlobStore, ledger: &Ledger) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger.records())
        .context("Failed to serialize the ledger to JSON")?;
    store.put(LEDGER_KEY, json.as_bytes())?;
    debug!(entries = ledger.len(), "saved ledger");
    Ok(())
}

/// Restore the ledger from [`LEDGER_KEY`]. An absent key yields an empty
/// ledger, not an error. Persisted running balances are not trusted; the
/// restore path recomputes them from profit.
pub fn load_ledger(store: &dyn BlobStore) -> Result<Ledger> {
    let Some(bytes) = store.get(LEDGER_KEY)? else {
        debug!("no persisted ledger found, starting empty");
        return Ok(Ledger::new());
    };
    let records: Vec<Record> =
        serde_json::from_slice(&bytes).context("Failed to parse the persisted ledger")?;
    Ok(Ledger::restore(records))
}

/// Delete the persisted blob, if any.
pub fn delete_ledger(store: &dyn BlobStore) -> Result<()> {
    store.remove(LEDGER_KEY)
}
