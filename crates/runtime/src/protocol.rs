//! Wire encoding for snapshots and deposit requests.
//!
//! The transport itself is an external collaborator; this module fixes the
//! byte layout both ends agree on. Encoding is bincode's legacy fixed-width
//! config (little-endian, fixint), which lays the data out exactly as
//! documented here:
//!
//! - record (13 bytes): `kind: i32`, `value: i32`, `save_state: i32`,
//!   `persisted: u8`
//! - snapshot: `revision: u64`, `count: u64`, then `count` records
//!
//! Order within a snapshot is not semantically meaningful; consumers treat
//! the records as a multiset and sort for display.

use hold_core::ItemRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoded size of one record.
pub const RECORD_WIRE_SIZE: usize = 13;
/// Encoded size of a snapshot before its records.
pub const SNAPSHOT_HEADER_SIZE: usize = 16;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("failed to encode wire frame")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode wire frame")]
    Decode(#[source] bincode::Error),
}

/// Full store contents as transmitted for replication or export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub revision: u64,
    pub records: Vec<ItemRecord>,
}

pub fn encode_snapshot(revision: u64, records: &[ItemRecord]) -> Result<Vec<u8>, ProtocolError> {
    bincode::serialize(&(revision, records)).map_err(ProtocolError::Encode)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, ProtocolError> {
    bincode::deserialize(bytes).map_err(ProtocolError::Decode)
}

pub fn encode_deposit(record: &ItemRecord) -> Result<Vec<u8>, ProtocolError> {
    bincode::serialize(record).map_err(ProtocolError::Encode)
}

pub fn decode_deposit(bytes: &[u8]) -> Result<ItemRecord, ProtocolError> {
    bincode::deserialize(bytes).map_err(ProtocolError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hold_core::ItemKindId;

    fn record(kind: i32, value: i32, save_state: i32, persisted: bool) -> ItemRecord {
        ItemRecord {
            kind: ItemKindId(kind),
            value,
            save_state,
            persisted_through_rounds: persisted,
        }
    }

    #[test]
    fn record_layout_is_thirteen_bytes_little_endian() {
        let encoded = encode_deposit(&record(1, 2, 3, true)).expect("encode");
        assert_eq!(encoded.len(), RECORD_WIRE_SIZE);
        assert_eq!(
            encoded,
            vec![1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 1],
        );
    }

    #[test]
    fn snapshot_layout_matches_header_plus_records() {
        let records = [record(7, 70, 0, false), record(8, 0, 5, true)];
        let encoded = encode_snapshot(42, &records).expect("encode");

        assert_eq!(encoded.len(), SNAPSHOT_HEADER_SIZE + 2 * RECORD_WIRE_SIZE);
        assert_eq!(&encoded[..8], &42u64.to_le_bytes());
        assert_eq!(&encoded[8..16], &2u64.to_le_bytes());

        let decoded = decode_snapshot(&encoded).expect("decode");
        assert_eq!(decoded.revision, 42);
        assert_eq!(decoded.records, records);
    }

    #[test]
    fn empty_snapshot_is_just_the_header() {
        let encoded = encode_snapshot(0, &[]).expect("encode");
        assert_eq!(encoded.len(), SNAPSHOT_HEADER_SIZE);
    }

    #[test]
    fn truncated_frames_fail_to_decode() {
        let encoded = encode_snapshot(3, &[record(1, 10, 0, false)]).expect("encode");
        assert!(decode_snapshot(&encoded[..encoded.len() - 1]).is_err());
        assert!(decode_snapshot(&[]).is_err());
        assert!(decode_deposit(&[1, 2, 3]).is_err());
    }
}
