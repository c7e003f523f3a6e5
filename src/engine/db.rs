//! Database handle
//!
//! Composes the lock, the commit log, and the table state into the
//! transactional contract:
//!
//! - `view` runs against a point-in-time snapshot; it never blocks behind a
//!   writer and never observes a transaction's partial effects.
//! - `update` serializes write transactions. Operations are staged in a
//!   [`WriteTx`]; only when the closure returns `Ok` is the batch appended
//!   to the log as one entry and published as the new committed state. An
//!   `Err` return or a panic inside the closure leaves no trace.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use tracing::info;

use super::entry::Operation;
use super::lock::{self, FileLock};
use super::recovery::LogRecovery;
use super::tables::Tables;
use super::writer::LogWriter;
use crate::config::SyncStrategy;
use crate::error::{Result, StoreError};

const LOCK_FILENAME: &str = "LOCK";

/// Single-writer/multi-reader transactional store over one data file
pub struct Database {
    /// Commit log (exclusive access during append/sync)
    log: Mutex<LogWriter>,

    /// Committed state; swapped wholesale on each commit
    tables: RwLock<Arc<Tables>>,

    /// Serializes write transactions (one active at a time)
    write_lock: Mutex<()>,

    /// Advisory lock held for the lifetime of this handle
    _lock: FileLock,
}

impl Database {
    /// Open or create the database at `path`.
    ///
    /// Acquires the exclusive advisory lock, replays the commit log
    /// (truncating a torn tail), and compacts the log when replay shows
    /// accumulated history.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let dir = path.parent().ok_or_else(|| {
            StoreError::Config(format!("data file path {:?} has no parent directory", path))
        })?;
        std::fs::create_dir_all(dir)?;

        let file_lock = lock::acquire(&dir.join(LOCK_FILENAME))?;

        let (tables, recovery) = LogRecovery::recover(path)?;
        if recovery.entries_recovered > 0 || recovery.bytes_truncated > 0 {
            info!(
                entries = recovery.entries_recovered,
                ops = recovery.ops_applied,
                last_lsn = recovery.last_lsn,
                truncated_bytes = recovery.bytes_truncated,
                "commit log recovered"
            );
        }

        let needs_compaction =
            recovery.bytes_truncated > 0 || recovery.ops_applied > tables.entry_count() as u64;
        let log = if needs_compaction {
            LogWriter::rewrite(path, &tables, sync_strategy)?
        } else {
            LogWriter::open(path, sync_strategy, recovery.last_lsn + 1)?
        };

        Ok(Self {
            log: Mutex::new(log),
            tables: RwLock::new(Arc::new(tables)),
            write_lock: Mutex::new(()),
            _lock: file_lock,
        })
    }

    /// Take a consistent point-in-time snapshot of the committed state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tables: self.tables.read().clone(),
        }
    }

    /// Run a read-only transaction against a snapshot.
    pub fn view<T>(&self, f: impl FnOnce(&Snapshot) -> Result<T>) -> Result<T> {
        f(&self.snapshot())
    }

    /// Run a write transaction.
    ///
    /// The staged batch commits atomically after `f` returns `Ok`: appended
    /// to the log as one entry (durable immediately only under
    /// `EveryCommit`), then applied and published. Nothing staged survives
    /// an `Err` or a panic.
    pub fn update<T>(&self, f: impl FnOnce(&mut WriteTx) -> Result<T>) -> Result<T> {
        let _guard = self.write_lock.lock();

        let mut tx = WriteTx {
            snapshot: self.tables.read().clone(),
            ops: Vec::new(),
        };
        let out = f(&mut tx)?;

        if tx.ops.is_empty() {
            return Ok(out);
        }

        self.log.lock().append(&tx.ops)?;

        let mut next = (*tx.snapshot).clone();
        next.apply_all(tx.ops);
        *self.tables.write() = Arc::new(next);

        Ok(out)
    }

    /// Force all committed entries to the persistent medium.
    pub fn sync(&self) -> Result<()> {
        self.log.lock().sync()
    }

    /// Flush and tear down, releasing the file handle and the lock.
    pub fn close(self) -> Result<()> {
        self.log.into_inner().sync()
    }
}

/// Consistent point-in-time view of the committed state
pub struct Snapshot {
    tables: Arc<Tables>,
}

impl Snapshot {
    pub fn get(&self, namespace: &str, key: &[u8]) -> Option<Bytes> {
        self.tables.get(namespace, key).cloned()
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.tables.contains_namespace(namespace)
    }

    pub fn entry_count(&self) -> usize {
        self.tables.entry_count()
    }
}

/// Staging area for one write transaction
///
/// Reads see the transaction's own pending operations layered over the
/// snapshot taken at transaction start.
pub struct WriteTx {
    snapshot: Arc<Tables>,
    ops: Vec<Operation>,
}

impl WriteTx {
    pub fn get(&self, namespace: &str, key: &[u8]) -> Option<Bytes> {
        for op in self.ops.iter().rev() {
            match op {
                Operation::Put {
                    namespace: ns,
                    key: k,
                    value,
                } if ns == namespace && k == key => {
                    return Some(Bytes::copy_from_slice(value));
                }
                Operation::Delete {
                    namespace: ns,
                    key: k,
                } if ns == namespace && k == key => return None,
                _ => {}
            }
        }
        self.snapshot.get(namespace, key).cloned()
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        if self.snapshot.contains_namespace(namespace) {
            return true;
        }
        self.ops
            .iter()
            .any(|op| matches!(op, Operation::Put { namespace: ns, .. } if ns == namespace))
    }

    /// Stage an upsert; the namespace is created lazily at commit.
    pub fn put(&mut self, namespace: &str, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(Operation::Put {
            namespace: namespace.to_string(),
            key,
            value,
        });
    }

    /// Stage a removal. Returns whether the key was visible to this
    /// transaction; staging is skipped for an absent key, so deleting one
    /// is a tolerated no-op rather than a fault.
    pub fn delete(&mut self, namespace: &str, key: &[u8]) -> bool {
        if self.get(namespace, key).is_none() {
            return false;
        }
        self.ops.push(Operation::Delete {
            namespace: namespace.to_string(),
            key: key.to_vec(),
        });
        true
    }
}
