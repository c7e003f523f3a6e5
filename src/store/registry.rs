//! Backend registry
//!
//! Process-wide, append-only mapping from a backend name to its
//! constructor. The built-in backends are inserted exactly once when the
//! registry is first touched; external backends register at startup via
//! [`register_backend`]. Re-registering a taken name is a configuration
//! error, never a silent overwrite.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::{embedded, memory, EmbeddedStore, InodeStore, MemoryStore};
use crate::config::Config;
use crate::error::{Result, StoreError};

/// Constructor for one backend
pub type BackendConstructor = fn(&Config) -> Result<Box<dyn InodeStore>>;

static REGISTRY: Lazy<RwLock<HashMap<String, BackendConstructor>>> = Lazy::new(|| {
    let mut backends: HashMap<String, BackendConstructor> = HashMap::new();
    backends.insert(embedded::BACKEND_NAME.to_string(), open_embedded);
    backends.insert(memory::BACKEND_NAME.to_string(), open_memory);
    RwLock::new(backends)
});

fn open_embedded(config: &Config) -> Result<Box<dyn InodeStore>> {
    Ok(Box::new(EmbeddedStore::open(config)?))
}

fn open_memory(_config: &Config) -> Result<Box<dyn InodeStore>> {
    Ok(Box::new(MemoryStore::new()))
}

/// Register an additional backend under `name`.
///
/// Intended for process initialization. Fails with `Config` when the name
/// is already taken (the built-ins included).
pub fn register_backend(name: &str, constructor: BackendConstructor) -> Result<()> {
    let mut registry = REGISTRY.write();
    if registry.contains_key(name) {
        return Err(StoreError::Config(format!(
            "backend {:?} is already registered",
            name
        )));
    }
    registry.insert(name.to_string(), constructor);
    Ok(())
}

/// Instantiate the backend named by `config.backend`.
pub fn open_store(config: &Config) -> Result<Box<dyn InodeStore>> {
    let constructor = *REGISTRY.read().get(&config.backend).ok_or_else(|| {
        StoreError::Config(format!("unknown backend {:?}", config.backend))
    })?;
    constructor(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_cannot_be_overwritten() {
        let err = register_backend(memory::BACKEND_NAME, open_memory).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        register_backend("registry-test-backend", open_memory).unwrap();
        let err = register_backend("registry-test-backend", open_memory).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn unknown_backend_is_a_config_error() {
        let config = Config::builder().backend("no-such-backend").build();
        assert!(matches!(open_store(&config), Err(StoreError::Config(_))));
    }

    #[test]
    fn selects_backend_by_name() {
        let config = Config::builder().backend(memory::BACKEND_NAME).build();
        let store = open_store(&config).unwrap();
        store.close().unwrap();
    }
}
