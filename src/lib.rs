//! # offline-kit
//!
//! An offline-first toolkit for applications that must keep working when
//! the network does not: request interception with per-category caching
//! strategies, a durable offline object store for queued user writes,
//! and a sync coordinator that drains the queue when connectivity
//! returns.
//!
//! ## Architecture
//!
//! Three cooperating components, dependency order leaves-first:
//!
//! 1. [`OfflineStore`] - schema'd local collections (cached result sets,
//!    a FIFO queue of pending outbound messages, document metadata).
//!    Owned by foreground application code; no other component touches
//!    it.
//! 2. [`EdgeProxy`] - intercepts every outgoing request, classifies it
//!    and applies one of four caching strategies over named, versioned
//!    cache partitions. Exclusively owns the partitions.
//! 3. [`SyncCoordinator`] - watches connectivity and broadcasts
//!    "sync now" to open clients on reconnect; the application drains
//!    the queue with its own transport.
//!
//! The proxy and the store have independent lifecycles by design: cache
//! partitions are versioned per deployment and purged on activation,
//! while store collections persist across deployments until explicitly
//! cleared.
//!
//! ## Quick start
//!
//! ```ignore
//! use offline_kit::{
//!     EdgeProxy, FakeNetwork, InMemoryObjectStore, InMemoryPartitions,
//!     OfflineStore, Request,
//! };
//!
//! # async fn demo() -> offline_kit::Result<()> {
//! // The proxy, over your NetworkClient implementation.
//! let proxy = EdgeProxy::new(InMemoryPartitions::new(), FakeNetwork::new());
//! proxy.install().await?;   // precache the app shell, all-or-nothing
//! proxy.activate().await?;  // purge stale partitions, take control
//!
//! let response = proxy.handle_fetch(&Request::get("/rest/v1/ideas")).await?;
//!
//! // The store, for offline-composed writes.
//! let store = OfflineStore::open(InMemoryObjectStore::new()).await?;
//! let id = store.enqueue_pending_message("session-1", "hello").await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod error;
pub mod net;
pub mod observability;
pub mod partition;
pub mod proxy;
pub mod request;
pub mod serialization;
pub mod service;
pub mod store;
pub mod strategy;
pub mod sync;

// Re-exports for convenience
pub use error::{Error, Result};
pub use net::{FakeNetwork, NetworkClient};
pub use partition::{InMemoryPartitions, PartitionConfig, PartitionStore};
pub use proxy::{EdgeProxy, ProxyState, ShellManifest};
pub use request::{ClassifierConfig, Method, Request, RequestClass, RequestMode, Response};
pub use service::OfflineService;
pub use store::{
    DocumentRecord, InMemoryObjectStore, ObjectStore, OfflineStore, PendingMessage,
    ResultSetRecord,
};
pub use strategy::{CatchAllCaching, FetchStrategy};
pub use sync::{
    drain_pending_messages, ClientMessage, DrainReport, MessageTransport, SyncCoordinator,
    PENDING_MESSAGES_SYNC_TAG,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
