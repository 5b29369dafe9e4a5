//! High-level offline service for applications.
//!
//! Bundles the edge proxy, the offline store handle and the sync
//! coordinator behind one `Clone`-able value for easy sharing across
//! tasks, without external `Arc<Mutex<>>` wrappers. The proxy's methods
//! take `&self` and the store handle is already shared, so a plain `Arc`
//! suffices.

use crate::error::Result;
use crate::net::NetworkClient;
use crate::partition::PartitionStore;
use crate::proxy::EdgeProxy;
use crate::request::{Request, Response};
use crate::store::{ObjectStore, OfflineStore};
use crate::sync::{drain_pending_messages, DrainReport, MessageTransport, SyncCoordinator};
use std::sync::Arc;

/// Shared handle over the whole offline subsystem.
///
/// # Example
///
/// ```ignore
/// let service = OfflineService::new(proxy, store, coordinator);
///
/// // Cheap to clone into any task.
/// let for_worker = service.clone();
/// tokio::spawn(async move {
///     let _ = for_worker.fetch(&Request::get("/rest/v1/ideas")).await;
/// });
/// ```
pub struct OfflineService<P, N, S>
where
    P: PartitionStore + 'static,
    N: NetworkClient + 'static,
    S: ObjectStore,
{
    proxy: Arc<EdgeProxy<P, N>>,
    store: OfflineStore<S>,
    coordinator: SyncCoordinator,
}

impl<P, N, S> Clone for OfflineService<P, N, S>
where
    P: PartitionStore + 'static,
    N: NetworkClient + 'static,
    S: ObjectStore,
{
    fn clone(&self) -> Self {
        OfflineService {
            proxy: Arc::clone(&self.proxy),
            store: self.store.clone(),
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<P, N, S> OfflineService<P, N, S>
where
    P: PartitionStore + 'static,
    N: NetworkClient + 'static,
    S: ObjectStore,
{
    pub fn new(proxy: EdgeProxy<P, N>, store: OfflineStore<S>, coordinator: SyncCoordinator) -> Self {
        OfflineService {
            proxy: Arc::new(proxy),
            store,
            coordinator,
        }
    }

    /// Install and activate the proxy in one step.
    ///
    /// # Errors
    ///
    /// Propagates install failures (all-or-nothing shell precache) and
    /// activation failures.
    pub async fn start(&self) -> Result<()> {
        self.proxy.install().await?;
        self.proxy.activate().await
    }

    /// Intercept one request through the proxy.
    pub async fn fetch(&self, request: &Request) -> Result<Response> {
        self.proxy.handle_fetch(request).await
    }

    /// One drain pass over the pending-message queue with the
    /// application's transport.
    pub async fn sync_now<T: MessageTransport>(&self, transport: &T) -> DrainReport {
        drain_pending_messages(&self.store, transport).await
    }

    pub fn proxy(&self) -> &EdgeProxy<P, N> {
        &self.proxy
    }

    pub fn store(&self) -> &OfflineStore<S> {
        &self.store
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::FakeNetwork;
    use crate::partition::InMemoryPartitions;
    use crate::store::InMemoryObjectStore;
    use tokio::sync::{broadcast, watch};

    async fn make_service(
    ) -> OfflineService<InMemoryPartitions, FakeNetwork, InMemoryObjectStore> {
        let network = FakeNetwork::new();
        network.route("GET /", Response::ok(b"app".to_vec()));
        network.route("GET /offline.html", Response::ok(b"offline".to_vec()));
        network.route("GET /manifest.json", Response::ok(b"{}".to_vec()));

        let proxy = EdgeProxy::new(InMemoryPartitions::new(), network);
        let store = OfflineStore::open(InMemoryObjectStore::new())
            .await
            .expect("open failed");
        let (sender, _) = broadcast::channel(16);
        let (_tx, connectivity) = watch::channel(true);
        let coordinator = SyncCoordinator::new(sender, connectivity);

        OfflineService::new(proxy, store, coordinator)
    }

    #[tokio::test]
    async fn test_start_and_fetch() {
        let service = make_service().await;
        service.start().await.expect("start failed");

        let response = service
            .fetch(&Request::navigate("/"))
            .await
            .expect("fetch failed");
        assert_eq!(response.body, b"app");
    }

    #[tokio::test]
    async fn test_clone_shares_components() {
        let service = make_service().await;
        let other = service.clone();

        service.store().save_result_set("s1", vec![]).await;
        assert!(other.store().get_result_set("s1").await.is_some());
        assert!(Arc::ptr_eq(&service.proxy, &other.proxy));
    }
}
