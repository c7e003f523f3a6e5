//! Configuration for inodekv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Name of the default on-disk backend.
pub const DEFAULT_BACKEND: &str = "embedded";

/// Main configuration for an inodekv store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files.
    /// Internal structure:
    ///   {data_dir}/
    ///     └── inode/
    ///         └── inodes.db    (commit log, owned exclusively)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Backend Selection
    // -------------------------------------------------------------------------
    /// Registered backend name to instantiate ("embedded", "memory", ...)
    pub backend: String,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: when to fsync the commit log
    pub sync_strategy: SyncStrategy,
}

/// Commit-log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every committed write transaction (safest, slowest)
    EveryCommit,

    /// fsync only on explicit `flush`/`close` (the contractual durability
    /// point is `flush` either way)
    Manual,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./inodekv_data"),
            backend: DEFAULT_BACKEND.to_string(),
            sync_strategy: SyncStrategy::Manual,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the backend name used for registry selection
    pub fn backend(mut self, name: impl Into<String>) -> Self {
        self.config.backend = name.into();
        self
    }

    /// Set the commit-log sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
