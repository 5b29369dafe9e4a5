//! Versioned envelope serialization for stored response snapshots.
//!
//! Every response snapshot the proxy writes into a cache partition is
//! wrapped in a small postcard envelope:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "OKIT"              u32                postcard::to_allocvec
//! ```
//!
//! Invalid magic or a version mismatch rejects the entry; the proxy then
//! treats it as a miss, evicts it, and refetches. Snapshots are never
//! migrated in place.
//!
//! Object-store records go through `serde_json` instead: they carry
//! self-describing, loosely structured payloads (arbitrary result items)
//! that a non-self-describing format cannot round-trip.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for snapshot envelopes: b"OKIT".
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"OKIT";

/// Current snapshot schema version.
///
/// Increment when the stored [`crate::request::Response`] shape changes.
/// Old entries are then rejected with `SchemaVersionMismatch` and
/// refetched on next access; this is expected during deployments.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Versioned envelope wrapping a snapshot payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotEnvelope<T> {
    /// Must be b"OKIT"
    pub magic: [u8; 4],
    /// Must match [`SNAPSHOT_VERSION`]
    pub version: u32,
    /// The stored snapshot
    pub payload: T,
}

impl<T> SnapshotEnvelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            payload,
        }
    }
}

/// Serialize a snapshot with its envelope.
///
/// # Errors
///
/// Returns `Error::Serialization` if postcard encoding fails.
pub fn serialize_snapshot<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = SnapshotEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        log::error!("Snapshot serialization failed: {}", e);
        Error::Serialization(e.to_string())
    })
}

/// Deserialize and validate a snapshot envelope.
///
/// Validation order: envelope decode, magic, version. Each failure maps
/// to its own error variant so callers can distinguish corruption from a
/// deploy-time schema bump.
///
/// # Errors
///
/// - `Error::Deserialization`: corrupted envelope or payload
/// - `Error::InvalidCacheEntry`: magic is not b"OKIT"
/// - `Error::SchemaVersionMismatch`: entry written by other code version
pub fn deserialize_snapshot<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: SnapshotEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        log::error!("Snapshot deserialization failed: {}", e);
        Error::Deserialization(e.to_string())
    })?;

    if envelope.magic != SNAPSHOT_MAGIC {
        log::warn!(
            "Invalid snapshot: expected magic {:?}, got {:?}",
            SNAPSHOT_MAGIC,
            envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            SNAPSHOT_MAGIC, envelope.magic
        )));
    }

    if envelope.version != SNAPSHOT_VERSION {
        log::warn!(
            "Snapshot version mismatch: expected {}, got {}",
            SNAPSHOT_VERSION,
            envelope.version
        );
        return Err(Error::SchemaVersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Response;

    #[test]
    fn test_roundtrip() {
        let response = Response::ok(b"<html>app</html>".to_vec())
            .with_content_type("text/html");

        let bytes = serialize_snapshot(&response).unwrap();
        let decoded: Response = deserialize_snapshot(&bytes).unwrap();

        assert_eq!(response, decoded);
    }

    #[test]
    fn test_envelope_fields() {
        let bytes = serialize_snapshot(&Response::ok(b"x".to_vec())).unwrap();
        let envelope: SnapshotEnvelope<Response> = postcard::from_bytes(&bytes).unwrap();

        assert_eq!(envelope.magic, SNAPSHOT_MAGIC);
        assert_eq!(envelope.version, SNAPSHOT_VERSION);
        assert_eq!(envelope.payload.status, 200);
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let envelope = SnapshotEnvelope {
            magic: *b"XXXX",
            version: SNAPSHOT_VERSION,
            payload: Response::ok(b"x".to_vec()),
        };
        let bytes = postcard::to_allocvec(&envelope).unwrap();

        let result: Result<Response> = deserialize_snapshot(&bytes);
        assert!(matches!(result, Err(Error::InvalidCacheEntry(_))));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let envelope = SnapshotEnvelope {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION + 1,
            payload: Response::ok(b"x".to_vec()),
        };
        let bytes = postcard::to_allocvec(&envelope).unwrap();

        let result: Result<Response> = deserialize_snapshot(&bytes);
        assert!(matches!(
            result,
            Err(Error::SchemaVersionMismatch {
                expected: SNAPSHOT_VERSION,
                found,
            }) if found == SNAPSHOT_VERSION + 1
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let result: Result<Response> = deserialize_snapshot(&[0xff, 0x01]);
        assert!(result.is_err());
    }
}
