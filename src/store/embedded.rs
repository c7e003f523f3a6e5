//! Embedded-engine backend
//!
//! The on-disk store: composes the keyspace codec, the record codec, and
//! the transactional engine. Owns one data file at
//! `<data_dir>/inode/inodes.db`.

use std::fs;

use parking_lot::RwLock;
use tracing::warn;

use super::InodeStore;
use crate::config::Config;
use crate::engine::Database;
use crate::error::{Result, StoreError};
use crate::keyspace::InodeRef;
use crate::record::InodeRecord;

/// Registry name of this backend
pub const BACKEND_NAME: &str = "embedded";

const INODE_SUBDIR: &str = "inode";
const DATA_FILENAME: &str = "inodes.db";

/// Inode store backed by the embedded transactional engine
///
/// Lifecycle: `Open -> Closed` (terminal). The engine handle lives inside
/// an `Option`; `close` takes it out, after which every operation resolves
/// to `Closed` deterministically.
pub struct EmbeddedStore {
    db: RwLock<Option<Database>>,
}

impl EmbeddedStore {
    /// Open the store rooted at the configured data directory.
    ///
    /// Fails when the path is unwritable, another instance holds the lock,
    /// or the data file header is corrupt.
    pub fn open(config: &Config) -> Result<Self> {
        let dir = config.data_dir.join(INODE_SUBDIR);
        fs::create_dir_all(&dir)?;

        let db = Database::open(&dir.join(DATA_FILENAME), config.sync_strategy)?;
        Ok(Self {
            db: RwLock::new(Some(db)),
        })
    }
}

impl InodeStore for EmbeddedStore {
    fn get(&self, inode_ref: InodeRef) -> Result<InodeRecord> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let (namespace, key) = inode_ref.encode();
        db.view(|snapshot| {
            let bytes = snapshot
                .get(&namespace, &key)
                .ok_or(StoreError::NotFound)?;
            InodeRecord::from_bytes(&bytes).map_err(|e| {
                warn!(%inode_ref, error = %e, "stored inode record is unreadable");
                e
            })
        })
    }

    fn write(&self, inode_ref: InodeRef, record: &InodeRecord) -> Result<()> {
        // Marshal first: a serialization failure must leave the store
        // untouched.
        let bytes = record.to_bytes()?;

        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let (namespace, key) = inode_ref.encode();
        db.update(|tx| {
            tx.put(&namespace, key, bytes);
            Ok(())
        })
    }

    fn delete(&self, inode_ref: InodeRef) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let (namespace, key) = inode_ref.encode();
        db.update(|tx| {
            // A volume that never saw a write has no namespace; normalize
            // to NotFound instead of faulting.
            if !tx.contains_namespace(&namespace) {
                return Err(StoreError::NotFound);
            }
            // Absent key in an existing namespace: no-op success.
            tx.delete(&namespace, &key);
            Ok(())
        })
    }

    fn flush(&self) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;
        db.sync()
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.db.write();
        match guard.take() {
            Some(db) => db.close(),
            None => Err(StoreError::Closed),
        }
    }
}
