//! Embedded Transactional Engine
//!
//! Durable, single-writer/multi-reader transactional store over one data
//! file. Committed write transactions are appended to a CRC-checked commit
//! log; the live state is an immutable in-memory snapshot rebuilt from the
//! log on open.
//!
//! ## Responsibilities
//! - Atomic commit: one log entry per write transaction, applied all-or-nothing
//! - Snapshot reads that never block behind, nor are blocked by, writers
//! - Crash recovery with torn-tail truncation
//! - Exclusive advisory lock so a second open of the same path fails fast
//! - Log compaction when replay shows accumulated history
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Header                                  │
//! │ ┌───────────┬─────────────┐             │
//! │ │ Magic (4) │ Version (2) │             │
//! │ └───────────┴─────────────┘             │
//! ├─────────────────────────────────────────┤
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Ops    │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Ops    │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! └─────────────────────────────────────────┘
//! ```
//! `Ops` is the bincode form of the transaction's operation batch.

mod db;
mod entry;
mod lock;
mod recovery;
mod tables;
mod writer;

pub use db::{Database, Snapshot, WriteTx};
pub use entry::{Operation, ENTRY_HEADER_SIZE, FILE_HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use recovery::{LogRecovery, RecoveryResult};
pub use tables::Tables;
pub use writer::LogWriter;
