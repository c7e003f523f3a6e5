//! Record codec
//!
//! The inode record and its binary (de)serialization. The store treats a
//! record as an immutable value: it is marshaled once on write and persisted
//! verbatim, so `write` + `get` round-trips byte-identically.
//!
//! Encoding failures are caller bugs (`Serialization`); decoding failures
//! signal on-disk corruption or a format mismatch (`Corruption`) and are
//! never conflated with "not found".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Ownership and access bits for an inode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

/// Metadata record for one inode.
///
/// Owned logically by the metadata layer above; the store only moves it
/// through the record codec and persists the resulting bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InodeRecord {
    /// Volume this inode belongs to
    pub volume: u64,

    /// Inode id within the volume
    pub inode: u64,

    /// Logical file size in bytes
    pub size: u64,

    /// Ownership and mode bits
    pub permissions: Permissions,

    /// Creation time, unix millis
    pub created_ms: u64,

    /// Last modification time, unix millis
    pub modified_ms: u64,

    /// Extended attributes
    pub attrs: BTreeMap<String, Vec<u8>>,

    /// References into the block layer holding file content
    pub blocks: Vec<u64>,
}

impl InodeRecord {
    /// Marshal the record to its persistent byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Unmarshal a record from persisted bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| StoreError::Corruption(format!("inode record failed to parse: {}", e)))
    }
}
