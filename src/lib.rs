//! # inodekv
//!
//! A persistent store for filesystem inode metadata with:
//! - Composite addressing by `(volume, inode)` reference
//! - Per-volume namespaces, created lazily on first write
//! - An embedded transactional commit-log engine (single data file)
//! - Crash recovery with torn-tail truncation
//! - Single-writer/multi-reader concurrency model
//! - Pluggable backends behind a process-wide registry
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Metadata Layer (caller)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ InodeRef / InodeRecord
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 InodeStore (trait facade)                    │
//! │           EmbeddedStore  ·  MemoryStore  ·  registry         │
//! └───────┬──────────────────────────┬──────────────────────────┘
//!         │ namespace + key          │ record bytes
//!         ▼                          ▼
//!  ┌─────────────┐           ┌──────────────┐
//!  │  Keyspace   │           │ Record Codec │
//!  │   Codec     │           │  (bincode)   │
//!  └─────────────┘           └──────────────┘
//!         │
//! ┌───────▼─────────────────────────────────────────────────────┐
//! │                   Engine (Database)                          │
//! │  ┌──────────────┐          ┌─────────────────────────────┐  │
//! │  │  Commit Log  │          │   Tables (Arc snapshots)    │  │
//! │  │  (Append)    │          │ namespace → ordered entries │  │
//! │  └──────────────┘          └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod keyspace;
pub mod record;
pub mod engine;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::{Config, SyncStrategy};
pub use keyspace::InodeRef;
pub use record::{InodeRecord, Permissions};
pub use store::{open_store, register_backend, InodeStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of inodekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
