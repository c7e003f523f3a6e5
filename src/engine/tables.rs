//! In-memory table state
//!
//! The committed state of the engine: one ordered map per namespace, keyed
//! by the fixed-width inode key. Published behind an `Arc` so readers hold a
//! consistent snapshot while a writer prepares the next version. Values are
//! `Bytes`, which keeps full-map clones at commit time cheap.

use std::collections::BTreeMap;

use bytes::Bytes;

use super::entry::Operation;

/// Namespace -> ordered key map of stored values.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    namespaces: BTreeMap<String, BTreeMap<Vec<u8>, Bytes>>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value. `None` covers both a missing namespace and a
    /// missing key; neither is an error at this layer.
    pub fn get(&self, namespace: &str, key: &[u8]) -> Option<&Bytes> {
        self.namespaces.get(namespace)?.get(key)
    }

    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Upsert a key, creating the namespace lazily.
    pub fn insert(&mut self, namespace: &str, key: Vec<u8>, value: Bytes) {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key, value);
    }

    /// Remove a key. Returns whether it was present; a missing namespace
    /// or key is a no-op.
    pub fn remove(&mut self, namespace: &str, key: &[u8]) -> bool {
        self.namespaces
            .get_mut(namespace)
            .map_or(false, |table| table.remove(key).is_some())
    }

    /// Apply a committed operation batch in order.
    pub fn apply_all(&mut self, ops: Vec<Operation>) {
        for op in ops {
            match op {
                Operation::Put {
                    namespace,
                    key,
                    value,
                } => self.insert(&namespace, key, Bytes::from(value)),
                Operation::Delete { namespace, key } => {
                    self.remove(&namespace, &key);
                }
            }
        }
    }

    /// Total number of live entries across all namespaces.
    pub fn entry_count(&self) -> usize {
        self.namespaces.values().map(|t| t.len()).sum()
    }

    /// Iterate all live entries in (namespace, key) order. Used by log
    /// compaction to rewrite the current state as one snapshot entry.
    pub fn iter_entries(&self) -> impl Iterator<Item = (&str, &[u8], &Bytes)> {
        self.namespaces.iter().flat_map(|(ns, table)| {
            table
                .iter()
                .map(move |(key, value)| (ns.as_str(), key.as_slice(), value))
        })
    }
}
