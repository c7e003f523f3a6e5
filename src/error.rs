//! Error types for inodekv
//!
//! Provides a unified error type for all operations. Every error is returned
//! to the immediate caller; the store performs no internal retry or backoff.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for inodekv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Failure from the underlying file/disk layer, including lock
    /// contention when opening a database that another process holds.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    /// The referenced record (or its whole namespace) does not exist.
    /// Expected and recoverable; never conflated with a zero value.
    #[error("Inode not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Data Integrity Errors
    // -------------------------------------------------------------------------
    /// Stored bytes failed to parse. Signals on-disk corruption or a
    /// format mismatch, distinct from "not found".
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// Input could not be encoded. Indicates a caller bug, not a
    /// storage fault; the store is left untouched.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// Operation attempted after `close`. Terminal state; deterministic.
    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
