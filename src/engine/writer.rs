//! Commit-log writer
//!
//! Appends framed entries to the data file and handles compaction: rewriting
//! the log as a batch of snapshot entries when replay shows accumulated
//! history.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::entry::{encode_entry, encode_file_header, Operation, FILE_HEADER_SIZE};
use super::tables::Tables;
use crate::config::SyncStrategy;
use crate::error::Result;

/// Target payload size for one compaction entry. Well under the per-entry
/// cap so the cap bounds individual transactions, never the store size.
const COMPACTION_BATCH_BYTES: usize = 4 * 1024 * 1024;

/// Appends committed transactions to the data file
pub struct LogWriter {
    file: File,
    next_lsn: u64,
    sync_strategy: SyncStrategy,
}

impl LogWriter {
    /// Open the log for appending. Lays down a fresh header when the file
    /// is new (or was truncated to nothing by recovery).
    pub fn open(path: &Path, sync_strategy: SyncStrategy, next_lsn: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        if file.metadata()?.len() < FILE_HEADER_SIZE as u64 {
            file.set_len(0)?;
            let mut file = file;
            file.write_all(&encode_file_header())?;
            file.sync_all()?;
            return Ok(Self {
                file,
                next_lsn: 1,
                sync_strategy,
            });
        }

        Ok(Self {
            file,
            next_lsn,
            sync_strategy,
        })
    }

    /// Append one committed transaction as a single entry. Returns its LSN.
    ///
    /// Durable immediately only under `SyncStrategy::EveryCommit`; otherwise
    /// durability is deferred to the next `sync`.
    pub fn append(&mut self, ops: &[Operation]) -> Result<u64> {
        let buf = encode_entry(self.next_lsn, ops)?;
        self.file.write_all(&buf)?;
        if self.sync_strategy == SyncStrategy::EveryCommit {
            self.file.sync_data()?;
        }

        let lsn = self.next_lsn;
        self.next_lsn += 1;
        Ok(lsn)
    }

    /// Force everything committed so far to the persistent medium.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Rewrite the log as snapshot entries holding the live state, then
    /// atomically replace the old file. Returns a writer positioned after
    /// the snapshot.
    ///
    /// The state is chunked into entries of roughly `COMPACTION_BATCH_BYTES`
    /// with consecutive LSNs, so a store larger than the per-entry payload
    /// cap compacts fine.
    pub fn rewrite(path: &Path, tables: &Tables, sync_strategy: SyncStrategy) -> Result<Self> {
        let tmp = path.with_extension("compact");
        let mut next_lsn = 1u64;
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&encode_file_header())?;

            let mut batch: Vec<Operation> = Vec::new();
            let mut batch_bytes = 0usize;
            for (namespace, key, value) in tables.iter_entries() {
                let op_bytes = namespace.len() + key.len() + value.len() + 32;
                if !batch.is_empty() && batch_bytes + op_bytes > COMPACTION_BATCH_BYTES {
                    file.write_all(&encode_entry(next_lsn, &batch)?)?;
                    next_lsn += 1;
                    batch.clear();
                    batch_bytes = 0;
                }
                batch.push(Operation::Put {
                    namespace: namespace.to_string(),
                    key: key.to_vec(),
                    value: value.to_vec(),
                });
                batch_bytes += op_bytes;
            }
            if !batch.is_empty() {
                file.write_all(&encode_entry(next_lsn, &batch)?)?;
                next_lsn += 1;
            }
            file.sync_all()?;
        }

        fs::rename(&tmp, path)?;
        if let Some(dir) = path.parent() {
            // Make the rename itself durable.
            File::open(dir)?.sync_all()?;
        }

        debug!(
            entries = tables.entry_count(),
            snapshot_entries = next_lsn - 1,
            "log compacted"
        );

        Self::open(path, sync_strategy, next_lsn)
    }

    /// LSN the next committed entry will carry.
    pub fn next_lsn(&self) -> u64 {
        self.next_lsn
    }
}
