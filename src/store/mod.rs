//! Store Module
//!
//! The public CRUD contract for inode metadata, plus the backend registry
//! that makes implementations selectable by name.
//!
//! ## Contract
//! - `get`: `NotFound` when the namespace or key is absent; `Corruption`
//!   when the stored bytes fail to parse
//! - `write`: marshals before touching the store; creates the per-volume
//!   namespace lazily; full overwrite on rewrite
//! - `delete`: `NotFound` for a missing namespace, success for a missing
//!   key inside an existing namespace (idempotent for crash-retry)
//! - `flush`: durability point; prior writes survive crash-and-reopen
//! - `close`: terminal; every later operation fails with `Closed`
//!
//! Operations block the calling thread until complete. There are no
//! background tasks, no timeouts, and no internal retries; callers needing
//! deadlines race the call externally.

mod embedded;
mod memory;
mod registry;

pub use embedded::EmbeddedStore;
pub use memory::MemoryStore;
pub use registry::{open_store, register_backend, BackendConstructor};

use crate::error::Result;
use crate::keyspace::InodeRef;
use crate::record::InodeRecord;

/// Capability set every inode store backend provides.
pub trait InodeStore: Send + Sync {
    /// Fetch the record for `inode_ref`.
    fn get(&self, inode_ref: InodeRef) -> Result<InodeRecord>;

    /// Persist `record` under `inode_ref`, overwriting any previous value.
    fn write(&self, inode_ref: InodeRef, record: &InodeRecord) -> Result<()>;

    /// Remove the record for `inode_ref`.
    fn delete(&self, inode_ref: InodeRef) -> Result<()>;

    /// Force all prior successful writes and deletes to the persistent
    /// medium.
    fn flush(&self) -> Result<()>;

    /// Tear down the store. Terminal: all subsequent operations, this one
    /// included, fail with `Closed`.
    fn close(&self) -> Result<()>;
}
