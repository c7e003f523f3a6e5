//! Advisory file lock
//!
//! One exclusive `flock` per open database, held for the lifetime of the
//! handle. A second open of the same path fails fast instead of silently
//! sharing state. The lock lives on a sibling `LOCK` file rather than the
//! data file itself, because compaction replaces the data file by rename.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use nix::fcntl::{Flock, FlockArg};

use crate::error::{Result, StoreError};

/// Held advisory lock; released on drop.
pub struct FileLock {
    _flock: Flock<std::fs::File>,
}

/// Acquire an exclusive non-blocking lock on `path`, creating the file if
/// needed. Contention maps to an `Io` error, as does any other failure of
/// the file layer.
pub fn acquire(path: &Path) -> Result<FileLock> {
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;

    match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
        Ok(flock) => Ok(FileLock { _flock: flock }),
        Err((_, errno)) => Err(StoreError::Io(io::Error::new(
            io::ErrorKind::WouldBlock,
            format!(
                "database at {:?} is locked by another instance ({})",
                path.parent().unwrap_or(path),
                errno
            ),
        ))),
    }
}
