//! In-memory backend
//!
//! Satisfies the identical store contract over process memory. Used by
//! tests and by callers wanting a throwaway store; nothing survives the
//! process. Reuses the engine's table state so namespace semantics cannot
//! drift from the on-disk backend.

use bytes::Bytes;
use parking_lot::RwLock;

use super::InodeStore;
use crate::engine::Tables;
use crate::error::{Result, StoreError};
use crate::keyspace::InodeRef;
use crate::record::InodeRecord;

/// Registry name of this backend
pub const BACKEND_NAME: &str = "memory";

/// Volatile inode store with the same contract as the embedded backend
pub struct MemoryStore {
    tables: RwLock<Option<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Some(Tables::new())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InodeStore for MemoryStore {
    fn get(&self, inode_ref: InodeRef) -> Result<InodeRecord> {
        let guard = self.tables.read();
        let tables = guard.as_ref().ok_or(StoreError::Closed)?;

        let (namespace, key) = inode_ref.encode();
        let bytes = tables.get(&namespace, &key).ok_or(StoreError::NotFound)?;
        InodeRecord::from_bytes(bytes)
    }

    fn write(&self, inode_ref: InodeRef, record: &InodeRecord) -> Result<()> {
        let bytes = record.to_bytes()?;

        let mut guard = self.tables.write();
        let tables = guard.as_mut().ok_or(StoreError::Closed)?;

        let (namespace, key) = inode_ref.encode();
        tables.insert(&namespace, key, Bytes::from(bytes));
        Ok(())
    }

    fn delete(&self, inode_ref: InodeRef) -> Result<()> {
        let mut guard = self.tables.write();
        let tables = guard.as_mut().ok_or(StoreError::Closed)?;

        let (namespace, key) = inode_ref.encode();
        if !tables.contains_namespace(&namespace) {
            return Err(StoreError::NotFound);
        }
        tables.remove(&namespace, &key);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let guard = self.tables.read();
        guard.as_ref().ok_or(StoreError::Closed)?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut guard = self.tables.write();
        match guard.take() {
            Some(_) => Ok(()),
            None => Err(StoreError::Closed),
        }
    }
}
