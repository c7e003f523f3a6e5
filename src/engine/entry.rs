//! Commit-log entry definitions and framing
//!
//! Each committed write transaction becomes exactly one log entry:
//! a fixed header (LSN, CRC32 of the payload, payload length) followed by
//! the bincode-encoded operation batch.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Magic bytes at the start of every data file
pub const MAGIC: [u8; 4] = *b"IKVL";

/// On-disk format version
pub const FORMAT_VERSION: u16 = 1;

/// File header size: 4 bytes magic + 2 bytes version
pub const FILE_HEADER_SIZE: usize = 6;

/// Entry header size: 8 bytes LSN + 4 bytes CRC + 4 bytes length
pub const ENTRY_HEADER_SIZE: usize = 16;

/// Maximum payload size for one entry (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Operations that can be committed against the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Upsert a key; creates the namespace if it does not exist yet
    Put {
        namespace: String,
        key: Vec<u8>,
        value: Vec<u8>,
    },

    /// Remove a key; a missing namespace or key is a no-op on apply
    Delete { namespace: String, key: Vec<u8> },
}

/// Parsed fixed-size entry header
#[derive(Debug, Clone, Copy)]
pub struct EntryHeader {
    pub lsn: u64,
    pub crc: u32,
    pub len: u32,
}

impl EntryHeader {
    /// Parse a header from its fixed-size byte form.
    pub fn parse(buf: &[u8; ENTRY_HEADER_SIZE]) -> Self {
        let lsn = u64::from_be_bytes([
            buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
        ]);
        let crc = u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let len = u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]);
        Self { lsn, crc, len }
    }
}

/// Encode the file header.
pub fn encode_file_header() -> [u8; FILE_HEADER_SIZE] {
    let mut buf = [0u8; FILE_HEADER_SIZE];
    buf[0..4].copy_from_slice(&MAGIC);
    buf[4..6].copy_from_slice(&FORMAT_VERSION.to_be_bytes());
    buf
}

/// Validate a file header read from disk.
pub fn check_file_header(buf: &[u8; FILE_HEADER_SIZE]) -> Result<()> {
    if buf[0..4] != MAGIC {
        return Err(StoreError::Corruption(
            "data file has unrecognized magic bytes".to_string(),
        ));
    }
    let version = u16::from_be_bytes([buf[4], buf[5]]);
    if version != FORMAT_VERSION {
        return Err(StoreError::Corruption(format!(
            "unsupported data file version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }
    Ok(())
}

/// Encode one committed transaction as a framed log entry.
pub fn encode_entry(lsn: u64, ops: &[Operation]) -> Result<Vec<u8>> {
    let payload = bincode::serialize(ops).map_err(|e| StoreError::Serialization(e.to_string()))?;
    if payload.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(StoreError::Serialization(format!(
            "transaction payload of {} bytes exceeds the {} byte limit",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let crc = crc32fast::hash(&payload);

    let mut buf = Vec::with_capacity(ENTRY_HEADER_SIZE + payload.len());
    buf.extend_from_slice(&lsn.to_be_bytes());
    buf.extend_from_slice(&crc.to_be_bytes());
    buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode an entry payload back into its operation batch, verifying the CRC.
pub fn decode_payload(header: &EntryHeader, payload: &[u8]) -> Result<Vec<Operation>> {
    let crc = crc32fast::hash(payload);
    if crc != header.crc {
        return Err(StoreError::Corruption(format!(
            "entry lsn={} checksum mismatch (stored {:#010x}, computed {:#010x})",
            header.lsn, header.crc, crc
        )));
    }
    bincode::deserialize(payload).map_err(|e| {
        StoreError::Corruption(format!("entry lsn={} failed to parse: {}", header.lsn, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_round_trip() {
        let ops = vec![
            Operation::Put {
                namespace: "3".to_string(),
                key: b"000000000000002a".to_vec(),
                value: b"record".to_vec(),
            },
            Operation::Delete {
                namespace: "3".to_string(),
                key: b"0000000000000001".to_vec(),
            },
        ];
        let buf = encode_entry(7, &ops).unwrap();
        let header = EntryHeader::parse(buf[..ENTRY_HEADER_SIZE].try_into().unwrap());
        assert_eq!(header.lsn, 7);
        assert_eq!(header.len as usize, buf.len() - ENTRY_HEADER_SIZE);
        let back = decode_payload(&header, &buf[ENTRY_HEADER_SIZE..]).unwrap();
        assert_eq!(back, ops);
    }

    #[test]
    fn flipped_payload_bit_fails_crc() {
        let ops = vec![Operation::Delete {
            namespace: "1".to_string(),
            key: b"k".to_vec(),
        }];
        let mut buf = encode_entry(1, &ops).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0x01;
        let header = EntryHeader::parse(buf[..ENTRY_HEADER_SIZE].try_into().unwrap());
        let err = decode_payload(&header, &buf[ENTRY_HEADER_SIZE..]).unwrap_err();
        assert!(matches!(err, StoreError::Corruption(_)));
    }

    #[test]
    fn header_check_rejects_bad_magic() {
        let mut header = encode_file_header();
        header[0] = b'X';
        assert!(matches!(
            check_file_header(&header),
            Err(StoreError::Corruption(_))
        ));
        assert!(check_file_header(&encode_file_header()).is_ok());
    }
}
