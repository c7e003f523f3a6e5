//! Keyspace codec
//!
//! Deterministic mapping from an inode reference to its storage location:
//! the namespace (per-volume partition) and the ordered byte key within it.
//!
//! ## Encoding
//! - Namespace: decimal text form of the volume id (`"3"`, `"17"`, ...)
//! - Key: 16 lowercase hex digits of the inode id, zero padded
//!   (`0x2a` -> `"000000000000002a"`)
//!
//! The fixed-width hex key preserves numeric ordering lexicographically, so
//! the engine can later serve ordered range scans per volume. Two distinct
//! references can never collide on the same (namespace, key) pair, and
//! references differing only in volume land in different namespaces.

use serde::{Deserialize, Serialize};

/// Width of an encoded inode key in bytes (16 hex digits for a u64).
pub const KEY_WIDTH: usize = 16;

/// Composite identifier naming one inode record within the whole store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InodeRef {
    /// Volume the inode belongs to; selects the namespace
    pub volume: u64,

    /// Inode id within the volume; selects the key
    pub inode: u64,
}

impl InodeRef {
    pub fn new(volume: u64, inode: u64) -> Self {
        Self { volume, inode }
    }

    /// Namespace name for this reference: the volume id in decimal.
    pub fn namespace(&self) -> String {
        self.volume.to_string()
    }

    /// Byte key for this reference: fixed-width zero-padded hex.
    pub fn key(&self) -> Vec<u8> {
        format!("{:016x}", self.inode).into_bytes()
    }

    /// Encode to the (namespace, key) pair used by every store operation.
    pub fn encode(&self) -> (String, Vec<u8>) {
        (self.namespace(), self.key())
    }
}

impl std::fmt::Display for InodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:016x}", self.volume, self.inode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_fixed_width_hex() {
        let r = InodeRef::new(3, 42);
        assert_eq!(r.namespace(), "3");
        assert_eq!(r.key(), b"000000000000002a".to_vec());
        assert_eq!(r.key().len(), KEY_WIDTH);
        assert_eq!(InodeRef::new(0, u64::MAX).key(), b"ffffffffffffffff".to_vec());
    }

    #[test]
    fn key_order_matches_numeric_order() {
        let mut ids: Vec<u64> = vec![0, 1, 9, 10, 15, 16, 255, 256, 4096, u64::MAX / 2, u64::MAX];
        ids.sort_unstable();
        let keys: Vec<Vec<u8>> = ids.iter().map(|i| InodeRef::new(1, *i).key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn volumes_map_to_distinct_namespaces() {
        let a = InodeRef::new(1, 7);
        let b = InodeRef::new(2, 7);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.namespace(), b.namespace());
    }

    #[test]
    fn distinct_refs_never_collide() {
        let refs = [
            InodeRef::new(1, 1),
            InodeRef::new(1, 2),
            InodeRef::new(2, 1),
            InodeRef::new(12, 1),
            InodeRef::new(1, 21),
        ];
        let mut encoded: Vec<(String, Vec<u8>)> = refs.iter().map(|r| r.encode()).collect();
        encoded.sort();
        encoded.dedup();
        assert_eq!(encoded.len(), refs.len());
    }
}
