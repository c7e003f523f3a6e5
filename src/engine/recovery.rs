//! Commit-log recovery
//!
//! Replays the data file at open and rebuilds the table state.
//!
//! Recovery tolerates exactly the damage a crash can cause: a torn or
//! corrupt tail. Entries are replayed in order until the first short read,
//! checksum mismatch, undecodable payload, or LSN discontinuity; everything
//! after that point is truncated with a warning. A file whose header itself
//! is damaged fails the open with `Corruption` instead.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::warn;

use super::entry::{
    check_file_header, decode_payload, EntryHeader, ENTRY_HEADER_SIZE, FILE_HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use super::tables::Tables;
use crate::error::Result;

/// Result of a recovery pass
#[derive(Debug, Default)]
pub struct RecoveryResult {
    /// Number of committed entries replayed
    pub entries_recovered: u64,

    /// Total operations applied across all replayed entries
    pub ops_applied: u64,

    /// LSN of the last valid entry (0 when the log is empty)
    pub last_lsn: u64,

    /// Bytes cut from the tail (torn or corrupt writes)
    pub bytes_truncated: u64,
}

/// Handles crash recovery of the commit log
pub struct LogRecovery;

impl LogRecovery {
    /// Replay `path` and rebuild the table state.
    ///
    /// A missing file or one too short to hold a header counts as a fresh
    /// store; the writer lays down a new header afterwards.
    pub fn recover(path: &Path) -> Result<(Tables, RecoveryResult)> {
        let mut tables = Tables::new();
        let mut result = RecoveryResult::default();

        if !path.exists() {
            return Ok((tables, result));
        }

        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        if file_len < FILE_HEADER_SIZE as u64 {
            // Crash before the header hit the disk; treat as fresh.
            if file_len > 0 {
                truncate_to(path, 0)?;
                result.bytes_truncated = file_len;
            }
            return Ok((tables, result));
        }

        let mut reader = BufReader::new(file);
        let mut header = [0u8; FILE_HEADER_SIZE];
        reader.read_exact(&mut header)?;
        check_file_header(&header)?;

        let mut valid_len = FILE_HEADER_SIZE as u64;

        loop {
            let mut head_buf = [0u8; ENTRY_HEADER_SIZE];
            let n = read_full(&mut reader, &mut head_buf)?;
            if n == 0 {
                break; // clean end of log
            }
            if n < ENTRY_HEADER_SIZE {
                warn!(bytes = n, "torn entry header at end of log");
                break;
            }

            let header = EntryHeader::parse(&head_buf);
            if header.len > MAX_PAYLOAD_SIZE {
                warn!(lsn = header.lsn, len = header.len, "implausible entry length, treating tail as corrupt");
                break;
            }
            if header.lsn != result.last_lsn + 1 {
                warn!(
                    lsn = header.lsn,
                    expected = result.last_lsn + 1,
                    "LSN discontinuity, treating tail as corrupt"
                );
                break;
            }

            let mut payload = vec![0u8; header.len as usize];
            let n = read_full(&mut reader, &mut payload)?;
            if n < payload.len() {
                warn!(lsn = header.lsn, "torn entry payload at end of log");
                break;
            }

            let ops = match decode_payload(&header, &payload) {
                Ok(ops) => ops,
                Err(e) => {
                    warn!(lsn = header.lsn, error = %e, "corrupt entry, truncating tail");
                    break;
                }
            };

            result.entries_recovered += 1;
            result.ops_applied += ops.len() as u64;
            result.last_lsn = header.lsn;
            tables.apply_all(ops);
            valid_len += (ENTRY_HEADER_SIZE + payload.len()) as u64;
        }

        if valid_len < file_len {
            result.bytes_truncated = file_len - valid_len;
            warn!(
                bytes = result.bytes_truncated,
                "truncating torn/corrupt log tail"
            );
            truncate_to(path, valid_len)?;
        }

        Ok((tables, result))
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn truncate_to(path: &Path, len: u64) -> std::io::Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(len)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::super::entry::{encode_entry, encode_file_header, Operation};
    use super::*;
    use crate::error::StoreError;

    fn put(ns: &str, key: &[u8], value: &[u8]) -> Operation {
        Operation::Put {
            namespace: ns.to_string(),
            key: key.to_vec(),
            value: value.to_vec(),
        }
    }

    fn write_log(path: &Path, batches: &[Vec<Operation>]) {
        let mut file = File::create(path).unwrap();
        file.write_all(&encode_file_header()).unwrap();
        for (i, ops) in batches.iter().enumerate() {
            file.write_all(&encode_entry(i as u64 + 1, ops).unwrap())
                .unwrap();
        }
    }

    #[test]
    fn missing_file_is_a_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let (tables, result) = LogRecovery::recover(&dir.path().join("inodes.db")).unwrap();
        assert_eq!(tables.entry_count(), 0);
        assert_eq!(result.entries_recovered, 0);
    }

    #[test]
    fn replays_committed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inodes.db");
        write_log(
            &path,
            &[
                vec![put("1", b"a", b"v1"), put("2", b"a", b"v2")],
                vec![Operation::Delete {
                    namespace: "2".to_string(),
                    key: b"a".to_vec(),
                }],
            ],
        );

        let (tables, result) = LogRecovery::recover(&path).unwrap();
        assert_eq!(result.entries_recovered, 2);
        assert_eq!(result.last_lsn, 2);
        assert_eq!(result.bytes_truncated, 0);
        assert_eq!(tables.get("1", b"a").unwrap().as_ref(), b"v1");
        assert!(tables.get("2", b"a").is_none());
    }

    #[test]
    fn truncates_torn_tail_and_keeps_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inodes.db");
        write_log(&path, &[vec![put("1", b"a", b"v1")]]);

        // Simulate a crash mid-append: half an entry of garbage.
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0xAB; 11]).unwrap();
        drop(file);

        let (tables, result) = LogRecovery::recover(&path).unwrap();
        assert_eq!(result.entries_recovered, 1);
        assert_eq!(result.bytes_truncated, 11);
        assert_eq!(tables.get("1", b"a").unwrap().as_ref(), b"v1");

        // A second pass sees a clean file.
        let (_, result) = LogRecovery::recover(&path).unwrap();
        assert_eq!(result.bytes_truncated, 0);
    }

    #[test]
    fn corrupt_entry_stops_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inodes.db");
        write_log(
            &path,
            &[vec![put("1", b"a", b"v1")], vec![put("1", b"b", b"v2")]],
        );

        // Flip a bit inside the second entry's payload.
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        std::fs::write(&path, &bytes).unwrap();

        let (tables, result) = LogRecovery::recover(&path).unwrap();
        assert_eq!(result.entries_recovered, 1);
        assert!(result.bytes_truncated > 0);
        assert!(tables.get("1", b"b").is_none());
    }

    #[test]
    fn damaged_header_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inodes.db");
        std::fs::write(&path, b"not a data file").unwrap();

        let err = LogRecovery::recover(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corruption(_)));
    }
}
