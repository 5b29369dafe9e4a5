//! Network boundary: the fetch-capable client the proxy delegates to.
//!
//! The proxy never speaks a protocol of its own. Whatever requests the
//! application already issues pass through unchanged; the proxy only
//! inspects method, URL and response status. Implement [`NetworkClient`]
//! over your HTTP stack of choice; [`FakeNetwork`] is the in-crate
//! implementation used for tests and examples.

use crate::error::{Error, Result};
use crate::request::{Request, Response};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for the underlying network transport.
///
/// No timeout or cancellation is imposed here; implementations rely on
/// their own stack's defaults. A hung fetch delays that one response
/// without blocking other requests or any storage operation.
/// The future is declared `Send` explicitly because the proxy spawns
/// background revalidations; implement with a plain `async fn`.
pub trait NetworkClient: Send + Sync + Clone {
    /// Perform the request against the real network.
    ///
    /// # Returns
    /// - `Ok(response)` - any HTTP response, including 4xx/5xx
    ///
    /// # Errors
    /// Returns `Err(Error::Network)` only when no response was obtained
    /// at all (offline, DNS failure, timeout).
    fn fetch(
        &self,
        request: &Request,
    ) -> impl std::future::Future<Output = Result<Response>> + Send;
}

/// Scriptable in-memory network for tests.
///
/// Routes are keyed by request identity (`"{method} {url}"`). Unrouted
/// requests get a 404 response; flipping [`FakeNetwork::set_online`] to
/// `false` makes every fetch fail like a dead connection.
///
/// # Example
///
/// ```ignore
/// let network = FakeNetwork::new();
/// network.route("GET https://app.example/app.js", Response::ok(b"v1".to_vec()));
/// network.set_online(false);
/// assert!(network.fetch(&Request::get("https://app.example/app.js")).await.is_err());
/// ```
#[derive(Clone)]
pub struct FakeNetwork {
    routes: Arc<DashMap<String, Response>>,
    counts: Arc<DashMap<String, usize>>,
    online: Arc<AtomicBool>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        FakeNetwork {
            routes: Arc::new(DashMap::new()),
            counts: Arc::new(DashMap::new()),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Script (or overwrite) the response for a request identity.
    pub fn route(&self, identity: impl Into<String>, response: Response) {
        self.routes.insert(identity.into(), response);
    }

    /// Simulate connectivity loss/restoration.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// How many times a request identity reached the network.
    pub fn fetch_count(&self, identity: &str) -> usize {
        self.counts.get(identity).map(|c| *c).unwrap_or(0)
    }
}

impl Default for FakeNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkClient for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response> {
        let identity = request.cache_identity();

        if !self.is_online() {
            debug!("fake network OFFLINE, failing {}", identity);
            return Err(Error::Network(format!("offline: {}", identity)));
        }

        *self.counts.entry(identity.clone()).or_insert(0) += 1;

        match self.routes.get(&identity) {
            Some(response) => {
                debug!("fake network {} -> {}", identity, response.status);
                Ok(response.clone())
            }
            None => {
                debug!("fake network {} -> 404 (unrouted)", identity);
                Ok(Response::new(404, Vec::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routed_response() {
        let network = FakeNetwork::new();
        network.route("GET /x", Response::ok(b"hello".to_vec()));

        let response = network
            .fetch(&Request::get("/x"))
            .await
            .expect("Fetch failed");
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"hello");
    }

    #[tokio::test]
    async fn test_unrouted_is_404() {
        let network = FakeNetwork::new();
        let response = network
            .fetch(&Request::get("/missing"))
            .await
            .expect("Fetch failed");
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_offline_fails_fetch() {
        let network = FakeNetwork::new();
        network.route("GET /x", Response::ok(b"hello".to_vec()));
        network.set_online(false);

        let result = network.fetch(&Request::get("/x")).await;
        assert!(matches!(result, Err(Error::Network(_))));

        network.set_online(true);
        assert!(network.fetch(&Request::get("/x")).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_counting() {
        let network = FakeNetwork::new();
        network.route("GET /x", Response::ok(b"hello".to_vec()));

        for _ in 0..3 {
            network.fetch(&Request::get("/x")).await.expect("Fetch failed");
        }
        assert_eq!(network.fetch_count("GET /x"), 3);
        assert_eq!(network.fetch_count("GET /y"), 0);
    }
}
