//! Offline object store: durable collections that survive reloads and
//! offline periods.
//!
//! Three collections, owned exclusively by foreground application code
//! (the proxy never touches them):
//!
//! - `ideas` - last known-good result set per session, for offline
//!   viewing. Last-write-wins per session, never merged.
//! - `pending_messages` - FIFO queue of user writes captured while the
//!   backend was unreachable. An entry leaves the queue only on
//!   confirmed delivery or an explicit bulk clear.
//! - `documents` - cached document metadata.
//!
//! # Error policy
//!
//! Cache writes must never break the primary user flow, so almost every
//! operation absorbs engine failures: reads degrade to `None`/empty and
//! writes log. Two exceptions propagate, because the user's own action
//! would otherwise be silently lost: [`OfflineStore::enqueue_pending_message`]
//! (dropped user-authored content is unacceptable) and
//! [`OfflineStore::clear_all_collections`] (an explicit user action that
//! must report success or failure).
//!
//! # Concurrency
//!
//! Every operation is one self-contained engine call; no transaction is
//! ever held across a network await. The engine serializes internally,
//! so callers need no external locks.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod inmemory;

pub use inmemory::InMemoryObjectStore;

/// Current object-store schema version. Bump when a collection or index
/// is added; [`OfflineStore::open`] migrates idempotently.
pub const SCHEMA_VERSION: u32 = 1;

/// Collection holding cached result sets, keyed by session id.
pub const COLLECTION_IDEAS: &str = "ideas";
/// Collection holding queued outbound messages, keyed by generated id.
pub const COLLECTION_PENDING: &str = "pending_messages";
/// Collection holding cached document metadata, keyed by document id.
pub const COLLECTION_DOCUMENTS: &str = "documents";

const ALL_COLLECTIONS: [&str; 3] = [COLLECTION_IDEAS, COLLECTION_PENDING, COLLECTION_DOCUMENTS];

/// Trait for object-store engine implementations.
///
/// Abstracts the underlying keyed storage (IndexedDB-like databases,
/// embedded key-value stores, plain maps for tests). Collections are
/// flat key→bytes maps; secondary lookups are built in the typed layer.
///
/// **IMPORTANT:** All methods use `&self`; implementations use interior
/// mutability and serialize their own mutations.
#[allow(async_fn_in_trait)]
pub trait ObjectStore: Send + Sync + Clone {
    /// Create a collection if missing. Idempotent.
    async fn ensure_collection(&self, collection: &str) -> Result<()>;

    /// Read one record's bytes.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Insert or overwrite one record.
    async fn put(&self, collection: &str, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Delete one record. No error if already absent.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// All records in a collection, unordered.
    async fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Delete every record in a collection (the collection remains).
    async fn clear(&self, collection: &str) -> Result<()>;

    /// Stored schema version; 0 before the first migration.
    async fn schema_version(&self) -> Result<u32>;

    /// Record a completed migration.
    async fn set_schema_version(&self, version: u32) -> Result<()>;
}

/// A cached result set for one session. Overwritten wholesale on every
/// successful fetch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultSetRecord {
    pub session_id: String,
    pub items: Vec<serde_json::Value>,
    /// Milliseconds since the epoch at save time.
    pub cached_at: u64,
}

/// A user write queued while the backend was unreachable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingMessage {
    /// Unique id generated at enqueue time.
    pub id: String,
    pub session_id: String,
    /// Opaque payload, e.g. chat message text.
    pub content: String,
    /// Strictly monotonic milliseconds; FIFO order within a session.
    pub timestamp: u64,
}

/// Cached metadata for a document available offline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub metadata: serde_json::Value,
    pub cached_at: u64,
}

struct StoreInner<S: ObjectStore> {
    engine: S,
    /// Last issued message timestamp, for strict monotonicity even when
    /// the wall clock stalls within a millisecond.
    last_timestamp: AtomicU64,
}

/// Typed handle over the offline collections.
///
/// `Clone` is cheap and shares the same underlying connection; there is
/// no module-level global. [`OfflineStore::open`] is idempotent, so
/// concurrent opens against a shared engine are safe.
///
/// # Example
///
/// ```ignore
/// let store = OfflineStore::open(InMemoryObjectStore::new()).await?;
/// let id = store.enqueue_pending_message("s1", "hello").await?;
/// let pending = store.list_pending_messages().await;
/// assert_eq!(pending[0].id, id);
/// ```
pub struct OfflineStore<S: ObjectStore> {
    inner: Arc<StoreInner<S>>,
}

impl<S: ObjectStore> Clone for OfflineStore<S> {
    fn clone(&self) -> Self {
        OfflineStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ObjectStore> OfflineStore<S> {
    /// Open the store, migrating the schema if needed.
    ///
    /// Migration creates any missing collection and records
    /// [`SCHEMA_VERSION`]; re-running it is a no-op, so repeated or
    /// concurrent opens share state without duplicate setup.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` when the engine cannot complete the
    /// migration (the store would be unusable).
    pub async fn open(engine: S) -> Result<Self> {
        let stored = engine.schema_version().await?;
        if stored < SCHEMA_VERSION {
            info!(
                "migrating offline store schema {} -> {}",
                stored, SCHEMA_VERSION
            );
            for collection in ALL_COLLECTIONS {
                engine.ensure_collection(collection).await?;
            }
            engine.set_schema_version(SCHEMA_VERSION).await?;
        }

        Ok(OfflineStore {
            inner: Arc::new(StoreInner {
                engine,
                last_timestamp: AtomicU64::new(0),
            }),
        })
    }

    pub fn engine(&self) -> &S {
        &self.inner.engine
    }

    // ------------------------------------------------------------------
    // Result sets
    // ------------------------------------------------------------------

    /// Upsert the cached result set for a session. Wholesale overwrite,
    /// never a merge. Failures are logged, never surfaced: losing a
    /// cache write must not break the flow that produced the results.
    pub async fn save_result_set(&self, session_id: &str, items: Vec<serde_json::Value>) {
        let record = ResultSetRecord {
            session_id: session_id.to_string(),
            items,
            cached_at: self.now_millis(),
        };

        let result = async {
            let bytes = serde_json::to_vec(&record)?;
            self.inner
                .engine
                .put(COLLECTION_IDEAS, session_id, bytes)
                .await
        }
        .await;

        if let Err(e) = result {
            warn!("saving result set for {} failed: {}", session_id, e);
        }
    }

    /// Last known-good items for a session; `None` on absence *or* any
    /// storage/decode failure.
    pub async fn get_result_set(&self, session_id: &str) -> Option<Vec<serde_json::Value>> {
        let bytes = match self.inner.engine.get(COLLECTION_IDEAS, session_id).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("reading result set for {} failed: {}", session_id, e);
                return None;
            }
        };

        match serde_json::from_slice::<ResultSetRecord>(&bytes) {
            Ok(record) => Some(record.items),
            Err(e) => {
                warn!("corrupt result set for {}: {}", session_id, e);
                None
            }
        }
    }

    /// Every cached item across all sessions, flattened, for an offline
    /// "show whatever we have" view. Degrades to empty.
    pub async fn get_all_result_sets(&self) -> Vec<serde_json::Value> {
        let rows = match self.inner.engine.scan(COLLECTION_IDEAS).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("scanning result sets failed: {}", e);
                return Vec::new();
            }
        };

        let mut items = Vec::new();
        for (key, bytes) in rows {
            match serde_json::from_slice::<ResultSetRecord>(&bytes) {
                Ok(record) => items.extend(record.items),
                Err(e) => warn!("skipping corrupt result set {}: {}", key, e),
            }
        }
        items
    }

    // ------------------------------------------------------------------
    // Pending messages
    // ------------------------------------------------------------------

    /// Queue a user write for later delivery and return its generated
    /// id.
    ///
    /// # Errors
    ///
    /// The only store mutation that propagates failure: if the queue
    /// write itself fails, the caller must know the user's input was
    /// lost.
    pub async fn enqueue_pending_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<String> {
        let message = PendingMessage {
            id: Uuid::now_v7().to_string(),
            session_id: session_id.to_string(),
            content: content.to_string(),
            timestamp: self.next_timestamp(),
        };

        let bytes = serde_json::to_vec(&message)?;
        self.inner
            .engine
            .put(COLLECTION_PENDING, &message.id, bytes)
            .await
            .map_err(|e| Error::Storage(format!("enqueue failed: {}", e)))?;

        debug!(
            "queued pending message {} for session {}",
            message.id, message.session_id
        );
        Ok(message.id)
    }

    /// All pending messages, sorted ascending by timestamp. The sort
    /// lives here so drain order is not a caller footgun. Degrades to
    /// empty.
    pub async fn list_pending_messages(&self) -> Vec<PendingMessage> {
        let rows = match self.inner.engine.scan(COLLECTION_PENDING).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("scanning pending messages failed: {}", e);
                return Vec::new();
            }
        };

        let mut messages: Vec<PendingMessage> = rows
            .into_iter()
            .filter_map(|(key, bytes)| match serde_json::from_slice(&bytes) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("skipping corrupt pending message {}: {}", key, e);
                    None
                }
            })
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// Pending messages for one session, timestamp order.
    pub async fn pending_messages_for_session(&self, session_id: &str) -> Vec<PendingMessage> {
        let mut messages = self.list_pending_messages().await;
        messages.retain(|m| m.session_id == session_id);
        messages
    }

    /// Remove one delivered message. Idempotent; failures logged.
    pub async fn remove_pending_message(&self, id: &str) {
        if let Err(e) = self.inner.engine.delete(COLLECTION_PENDING, id).await {
            warn!("removing pending message {} failed: {}", id, e);
        }
    }

    /// Empty the queue after a successful bulk drain. Failures logged.
    pub async fn clear_pending_messages(&self) {
        if let Err(e) = self.inner.engine.clear(COLLECTION_PENDING).await {
            warn!("clearing pending messages failed: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Upsert one document's metadata. Failures logged.
    pub async fn save_document(&self, document: &DocumentRecord) {
        let result = async {
            let bytes = serde_json::to_vec(document)?;
            self.inner
                .engine
                .put(COLLECTION_DOCUMENTS, &document.id, bytes)
                .await
        }
        .await;

        if let Err(e) = result {
            warn!("saving document {} failed: {}", document.id, e);
        }
    }

    /// One document's metadata; `None` on absence or failure.
    pub async fn get_document(&self, id: &str) -> Option<DocumentRecord> {
        let bytes = match self.inner.engine.get(COLLECTION_DOCUMENTS, id).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("reading document {} failed: {}", id, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("corrupt document {}: {}", id, e);
                None
            }
        }
    }

    /// Every cached document. Degrades to empty.
    pub async fn list_documents(&self) -> Vec<DocumentRecord> {
        let rows = match self.inner.engine.scan(COLLECTION_DOCUMENTS).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("scanning documents failed: {}", e);
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|(key, bytes)| match serde_json::from_slice(&bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("skipping corrupt document {}: {}", key, e);
                    None
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Bulk clear
    // ------------------------------------------------------------------

    /// Wipe all three collections.
    ///
    /// Backs the explicit "clear my cached data" user action, so unlike
    /// every other write this propagates failure: the user must know
    /// whether their request completed.
    ///
    /// # Errors
    ///
    /// Returns the first engine error encountered.
    pub async fn clear_all_collections(&self) -> Result<()> {
        for collection in ALL_COLLECTIONS {
            self.inner.engine.clear(collection).await?;
        }
        info!("all offline collections cleared");
        Ok(())
    }

    // ------------------------------------------------------------------

    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Wall-clock milliseconds, bumped past the last issued value so
    /// timestamps are strictly increasing even within one millisecond.
    fn next_timestamp(&self) -> u64 {
        let now = self.now_millis();
        self.inner
            .last_timestamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .map(|last| now.max(last + 1))
            .unwrap_or(now)
    }
}
