//! Error types for the offline toolkit.

use std::fmt;

/// Result type for offline-kit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the offline toolkit.
///
/// The proxy and the object store have very different propagation rules
/// (see the crate docs): network failures are expected and almost always
/// absorbed by a fallback, while storage failures only surface for the
/// operations where the user's own action would otherwise be lost.
#[derive(Debug, Clone)]
pub enum Error {
    /// Network fetch failed (offline, DNS failure, timeout).
    ///
    /// Expected and non-fatal. Every proxy read path defines a fallback
    /// (cached entry, offline page); this variant only reaches callers
    /// when no fallback exists.
    Network(String),

    /// Object-store engine failure (quota exceeded, corruption,
    /// unsupported environment).
    ///
    /// Propagated only from `enqueue_pending_message` and
    /// `clear_all_collections`; all other store operations degrade to
    /// empty/`None` results and log instead.
    Storage(String),

    /// Serialization failed when converting a record or response snapshot
    /// to bytes.
    Serialization(String),

    /// Deserialization failed when decoding stored bytes.
    ///
    /// Indicates corrupted or malformed data. The offending entry should
    /// be evicted and recomputed, never repaired in place.
    Deserialization(String),

    /// Cache miss with no fallback: a network request failed and nothing
    /// was cached for its identity.
    ///
    /// The only way this subsystem fails a request, e.g. a first-ever API
    /// call issued while offline.
    CacheMiss,

    /// App-shell precache failed during install.
    ///
    /// Install is all-or-nothing: a partially cached shell is worse than
    /// no shell, so one failed asset fails the whole install and the
    /// previous proxy generation stays in control.
    Install(String),

    /// Stored response snapshot has a corrupted envelope or bad magic.
    ///
    /// Returned when the snapshot header is not `b"OKIT"` or the envelope
    /// cannot be decoded. The entry is evicted and refetched.
    InvalidCacheEntry(String),

    /// Snapshot schema version does not match the compiled code.
    ///
    /// Expected during deployments; the entry is evicted and refetched on
    /// the next request. No action needed.
    SchemaVersionMismatch {
        /// Version the compiled code writes
        expected: u32,
        /// Version found in the stored envelope
        found: u32,
    },

    /// Invalid configuration (empty shell manifest, bad partition name).
    Config(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::CacheMiss => write!(f, "Cache miss"),
            Error::Install(msg) => write!(f, "Install failed: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::SchemaVersionMismatch { expected, found } => {
                write!(
                    f,
                    "Snapshot version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::Config(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::Storage(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::Deserialization(e.to_string())
        } else {
            Error::Serialization(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
