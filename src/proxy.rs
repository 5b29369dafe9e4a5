//! Network edge proxy: request interception and per-category caching.
//!
//! The proxy sits between the application and the network, classifies
//! every outgoing request and applies one of the four fetch strategies
//! (see [`crate::strategy`]). It exclusively owns the cache partitions;
//! nothing else writes to them, and the proxy never touches the offline
//! object store.
//!
//! # Lifecycle
//!
//! ```text
//! Installing --install()--> Installed --activate()--> Active
//! ```
//!
//! - **Installing**: [`EdgeProxy::install`] eagerly fetches the app-shell
//!   manifest into the shell partition, all-or-nothing.
//! - **Installed**: waiting to take over; a `SkipWaiting` client message
//!   forces immediate activation.
//! - **Active**: [`EdgeProxy::activate`] has purged every partition not
//!   in the current allow-list and broadcast `Activated` to open clients.
//!   Fetches are now intercepted; before activation they pass straight
//!   through to the network.

use crate::error::{Error, Result};
use crate::net::NetworkClient;
use crate::observability::{NoOpMetrics, ProxyMetrics};
use crate::partition::{PartitionConfig, PartitionRole, PartitionStore};
use crate::request::{ClassifierConfig, Request, Response};
use crate::serialization::{deserialize_snapshot, serialize_snapshot};
use crate::strategy::{CatchAllCaching, FetchStrategy};
use crate::sync::ClientMessage;
use std::future::Future;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};

/// Proxy lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyState {
    Installing,
    Installed,
    Active,
}

impl std::fmt::Display for ProxyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyState::Installing => write!(f, "Installing"),
            ProxyState::Installed => write!(f, "Installed"),
            ProxyState::Active => write!(f, "Active"),
        }
    }
}

const STATE_INSTALLING: u8 = 0;
const STATE_INSTALLED: u8 = 1;
const STATE_ACTIVE: u8 = 2;

/// The app-shell manifest: the minimal asset set needed to render
/// something before any network call succeeds.
#[derive(Clone, Debug)]
pub struct ShellManifest {
    /// URLs precached at install time.
    pub assets: Vec<String>,
    /// The asset served when a navigation fails offline. Must be one of
    /// `assets`.
    pub offline_url: String,
}

impl Default for ShellManifest {
    fn default() -> Self {
        ShellManifest {
            assets: vec![
                "/".to_string(),
                "/offline.html".to_string(),
                "/manifest.json".to_string(),
            ],
            offline_url: "/offline.html".to_string(),
        }
    }
}

impl ShellManifest {
    pub fn new(assets: Vec<String>, offline_url: impl Into<String>) -> Result<Self> {
        let offline_url = offline_url.into();
        if assets.is_empty() {
            return Err(Error::Config("shell manifest has no assets".to_string()));
        }
        if !assets.contains(&offline_url) {
            return Err(Error::Config(format!(
                "offline page {} is not in the shell manifest",
                offline_url
            )));
        }
        Ok(ShellManifest { assets, offline_url })
    }

    fn offline_identity(&self) -> String {
        Request::get(self.offline_url.clone()).cache_identity()
    }
}

/// Tracker for detached write-through tasks.
///
/// The response path never awaits a cache write; the write runs as a
/// background task with a log-and-drop error boundary. The tracker only
/// exists so `quiesce()` can wait for outstanding writes in tests and on
/// shutdown.
#[derive(Clone)]
struct BackgroundWrites {
    pending: Arc<AtomicUsize>,
    notify: Arc<Notify>,
}

impl BackgroundWrites {
    fn new() -> Self {
        BackgroundWrites {
            pending: Arc::new(AtomicUsize::new(0)),
            notify: Arc::new(Notify::new()),
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let pending = Arc::clone(&self.pending);
        let notify = Arc::clone(&self.notify);
        tokio::spawn(async move {
            task.await;
            if pending.fetch_sub(1, Ordering::SeqCst) == 1 {
                notify.notify_waiters();
            }
        });
    }

    async fn quiesce(&self) {
        loop {
            let notified = self.notify.notified();
            if self.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// The network edge proxy.
///
/// # Example
///
/// ```ignore
/// use offline_kit::{EdgeProxy, FakeNetwork, InMemoryPartitions};
///
/// let proxy = EdgeProxy::new(InMemoryPartitions::new(), network);
/// proxy.install().await?;
/// proxy.activate().await?;
///
/// let response = proxy.handle_fetch(&Request::get("/rest/v1/ideas")).await?;
/// ```
pub struct EdgeProxy<P: PartitionStore + 'static, N: NetworkClient + 'static> {
    cache: P,
    network: N,
    partitions: PartitionConfig,
    classifier: ClassifierConfig,
    shell: ShellManifest,
    catch_all: CatchAllCaching,
    metrics: Box<dyn ProxyMetrics>,
    broadcast: Option<broadcast::Sender<ClientMessage>>,
    state: AtomicU8,
    writes: BackgroundWrites,
}

impl<P: PartitionStore, N: NetworkClient> EdgeProxy<P, N> {
    /// Create a proxy in the `Installing` state with default
    /// configuration.
    pub fn new(cache: P, network: N) -> Self {
        EdgeProxy {
            cache,
            network,
            partitions: PartitionConfig::default(),
            classifier: ClassifierConfig::default(),
            shell: ShellManifest::default(),
            catch_all: CatchAllCaching::default(),
            metrics: Box::new(NoOpMetrics),
            broadcast: None,
            state: AtomicU8::new(STATE_INSTALLING),
            writes: BackgroundWrites::new(),
        }
    }

    /// Set the partition generations for this proxy version.
    pub fn with_partitions(mut self, partitions: PartitionConfig) -> Self {
        self.partitions = partitions;
        self
    }

    /// Set the request classifier configuration.
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Set the app-shell manifest precached at install.
    pub fn with_shell(mut self, shell: ShellManifest) -> Self {
        self.shell = shell;
        self
    }

    /// Set the catch-all write-through policy.
    pub fn with_catch_all_caching(mut self, policy: CatchAllCaching) -> Self {
        self.catch_all = policy;
        self
    }

    /// Set a custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn ProxyMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Attach the client broadcast channel. `Activated` messages are
    /// sent here on activation; without a channel activation is silent.
    pub fn with_broadcast(mut self, sender: broadcast::Sender<ClientMessage>) -> Self {
        self.broadcast = Some(sender);
        self
    }

    pub fn state(&self) -> ProxyState {
        match self.state.load(Ordering::SeqCst) {
            STATE_INSTALLING => ProxyState::Installing,
            STATE_INSTALLED => ProxyState::Installed,
            _ => ProxyState::Active,
        }
    }

    pub fn cache(&self) -> &P {
        &self.cache
    }

    /// Precache the app shell, all-or-nothing.
    ///
    /// Every manifest asset is fetched (concurrently) before anything is
    /// written; a single failure (network error or non-200) fails the
    /// install and writes nothing, leaving any previous proxy generation
    /// in control. A partially cached shell is worse than no shell.
    ///
    /// # Errors
    ///
    /// Returns `Error::Install` naming an asset that failed.
    pub async fn install(&self) -> Result<()> {
        info!(
            "installing proxy generation {} ({} shell assets)",
            self.partitions.shell_generation,
            self.shell.assets.len()
        );

        let fetches = self.shell.assets.iter().map(|url| async move {
            let request = Request::get(url.clone());
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::Install(format!("{}: {}", url, e)))?;
            if !response.is_success() {
                return Err(Error::Install(format!(
                    "{}: status {}",
                    url, response.status
                )));
            }
            Ok((request.cache_identity(), response))
        });
        let snapshots = futures::future::try_join_all(fetches).await?;

        let shell_partition = self.partitions.name(PartitionRole::Shell);
        for (identity, response) in snapshots {
            let bytes = serialize_snapshot(&response)?;
            self.cache.put(&shell_partition, &identity, bytes).await?;
        }

        self.state.store(STATE_INSTALLED, Ordering::SeqCst);
        info!("proxy installed, awaiting activation");
        Ok(())
    }

    /// Purge stale partitions and take control.
    ///
    /// Every existing partition whose name is not in the current
    /// allow-list is deleted; this is the only eviction mechanism across
    /// deployments. Open clients are claimed immediately via an
    /// `Activated` broadcast, no reload required.
    pub async fn activate(&self) -> Result<()> {
        if self.state() == ProxyState::Active {
            return Ok(());
        }

        let allow = self.partitions.allow_list();
        for name in self.cache.list_partitions().await? {
            if !allow.contains(&name) {
                info!("purging stale partition {}", name);
                self.cache.drop_partition(&name).await?;
            }
        }

        self.state.store(STATE_ACTIVE, Ordering::SeqCst);
        info!(
            "proxy activated (generation {})",
            self.partitions.shell_generation
        );

        if let Some(sender) = &self.broadcast {
            // Receiver lag/absence is not an activation failure.
            let _ = sender.send(ClientMessage::Activated {
                generation: self.partitions.shell_generation.clone(),
            });
        }
        Ok(())
    }

    /// React to a control message from a client.
    ///
    /// `SkipWaiting` forces immediate activation of an installed proxy;
    /// everything else is ignored here.
    pub async fn handle_message(&self, message: &ClientMessage) {
        if matches!(message, ClientMessage::SkipWaiting) {
            if self.state() == ProxyState::Installed {
                if let Err(e) = self.activate().await {
                    error!("skip-waiting activation failed: {}", e);
                }
            }
        }
    }

    /// Intercept one outgoing request.
    ///
    /// Before activation, requests pass straight through to the network.
    /// Once active, the request is classified and dispatched; see
    /// [`FetchStrategy`] for the per-category flows.
    ///
    /// # Errors
    ///
    /// `Error::CacheMiss` when the network failed and nothing was cached
    /// for the request identity; `Error::Network` for a failed
    /// navigation with no stored offline page. Every other failure mode
    /// has a fallback and is absorbed.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Response> {
        if self.state() != ProxyState::Active {
            debug!("proxy not active, passing through {}", request.url);
            return self.network.fetch(request).await;
        }

        let class = self.classifier.classify(request);
        let strategy = FetchStrategy::for_class(class);
        debug!(
            "fetch {} classified {} -> {}",
            request.cache_identity(),
            class,
            strategy
        );

        match strategy {
            FetchStrategy::NetworkFirstShell => self.fetch_navigation(request).await,
            FetchStrategy::StaleWhileRevalidate => self.fetch_static(request).await,
            FetchStrategy::NetworkFirstApi => {
                let cacheable = request.method.is_get();
                self.network_first(request, PartitionRole::Api, cacheable)
                    .await
            }
            FetchStrategy::NetworkFirst => {
                let cacheable = self.catch_all.allows(request.method.is_get());
                self.network_first(request, PartitionRole::Main, cacheable)
                    .await
            }
        }
    }

    /// Wait for all outstanding background cache writes.
    ///
    /// The response path never blocks on these; call this from tests or
    /// on shutdown when the writes must have landed.
    pub async fn quiesce(&self) {
        self.writes.quiesce().await;
    }

    // ------------------------------------------------------------------
    // Strategies
    // ------------------------------------------------------------------

    /// Navigation: network-first, offline page on failure.
    async fn fetch_navigation(&self, request: &Request) -> Result<Response> {
        let identity = request.cache_identity();
        self.metrics.record_network_fetch(&identity);

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.write_through(PartitionRole::Shell, &identity, &response);
                }
                Ok(response)
            }
            Err(e) => {
                debug!("navigation {} failed ({}), serving offline page", identity, e);
                let shell = self.partitions.name(PartitionRole::Shell);
                match self.read_snapshot(&shell, &self.shell.offline_identity()).await {
                    Some(page) => {
                        self.metrics.record_fallback(&identity);
                        Ok(page)
                    }
                    None => {
                        self.metrics.record_error(&identity, &e.to_string());
                        Err(e)
                    }
                }
            }
        }
    }

    /// Static assets: cached immediately, refreshed in the background.
    async fn fetch_static(&self, request: &Request) -> Result<Response> {
        let identity = request.cache_identity();
        let partition = self.partitions.name(PartitionRole::StaticAssets);

        if let Some(cached) = self.read_snapshot(&partition, &identity).await {
            self.metrics.record_cache_hit(&identity);
            self.spawn_revalidate(request.clone(), partition, identity);
            return Ok(cached);
        }

        self.metrics.record_network_fetch(&identity);
        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.write_through(PartitionRole::StaticAssets, &identity, &response);
                }
                Ok(response)
            }
            Err(e) => {
                // A concurrent revalidation may have landed an entry
                // since the miss; it is the only stale copy left.
                match self.read_snapshot(&partition, &identity).await {
                    Some(stale) => {
                        self.metrics.record_fallback(&identity);
                        Ok(stale)
                    }
                    None => {
                        self.metrics.record_error(&identity, &e.to_string());
                        Err(e)
                    }
                }
            }
        }
    }

    /// API and catch-all: network-first with cache fallback.
    async fn network_first(
        &self,
        request: &Request,
        role: PartitionRole,
        cacheable: bool,
    ) -> Result<Response> {
        let identity = request.cache_identity();
        self.metrics.record_network_fetch(&identity);

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() && cacheable {
                    self.write_through(role, &identity, &response);
                }
                Ok(response)
            }
            Err(e) => {
                let partition = self.partitions.name(role);
                match self.read_snapshot(&partition, &identity).await {
                    Some(cached) => {
                        self.metrics.record_fallback(&identity);
                        Ok(cached)
                    }
                    None => {
                        debug!("no cached fallback for {} ({})", identity, e);
                        self.metrics.record_error(&identity, &e.to_string());
                        Err(Error::CacheMiss)
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Cache plumbing
    // ------------------------------------------------------------------

    /// Read and decode a snapshot; invalid or version-mismatched entries
    /// are evicted and reported as a miss.
    async fn read_snapshot(&self, partition: &str, identity: &str) -> Option<Response> {
        let bytes = match self.cache.get(partition, identity).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("cache read failed for {}/{}: {}", partition, identity, e);
                return None;
            }
        };

        match deserialize_snapshot::<Response>(&bytes) {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("evicting bad snapshot {}/{}: {}", partition, identity, e);
                let _ = self.cache.delete(partition, identity).await;
                None
            }
        }
    }

    /// Detached write-through. The caller's response is already on its
    /// way; a failed write is logged and dropped.
    fn write_through(&self, role: PartitionRole, identity: &str, response: &Response) {
        self.metrics.record_write_through(identity);

        let partition = self.partitions.name(role);
        let identity = identity.to_string();
        let cache = self.cache.clone();
        let bytes = match serialize_snapshot(response) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("write-through serialization failed for {}: {}", identity, e);
                return;
            }
        };

        self.writes.spawn(async move {
            if let Err(e) = cache.put(&partition, &identity, bytes).await {
                warn!("write-through failed for {}/{}: {}", partition, identity, e);
            }
        });
    }

    /// Detached revalidation for a cache-hit static asset: refresh the
    /// entry on 200 so the *next* request sees the new bytes. The
    /// current caller already has the cached response.
    fn spawn_revalidate(&self, request: Request, partition: String, identity: String) {
        let network = self.network.clone();
        let cache = self.cache.clone();

        self.writes.spawn(async move {
            match network.fetch(&request).await {
                Ok(response) if response.is_success() => {
                    match serialize_snapshot(&response) {
                        Ok(bytes) => {
                            if let Err(e) = cache.put(&partition, &identity, bytes).await {
                                warn!("revalidation write failed for {}: {}", identity, e);
                            }
                        }
                        Err(e) => {
                            warn!("revalidation serialization failed for {}: {}", identity, e)
                        }
                    }
                }
                Ok(response) => {
                    debug!("revalidation for {} got status {}, keeping stale entry",
                        identity, response.status);
                }
                Err(e) => {
                    debug!("revalidation fetch failed for {}: {}", identity, e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::FakeNetwork;
    use crate::partition::InMemoryPartitions;
    use crate::request::Method;

    fn shell_network() -> FakeNetwork {
        let network = FakeNetwork::new();
        network.route("GET /", Response::ok(b"<html>app</html>".to_vec()));
        network.route(
            "GET /offline.html",
            Response::ok(b"<html>offline</html>".to_vec()),
        );
        network.route("GET /manifest.json", Response::ok(b"{}".to_vec()));
        network
    }

    async fn active_proxy(
        network: FakeNetwork,
    ) -> EdgeProxy<InMemoryPartitions, FakeNetwork> {
        let proxy = EdgeProxy::new(InMemoryPartitions::new(), network);
        proxy.install().await.expect("install failed");
        proxy.activate().await.expect("activate failed");
        proxy
    }

    #[tokio::test]
    async fn test_lifecycle_transitions() {
        let proxy = EdgeProxy::new(InMemoryPartitions::new(), shell_network());
        assert_eq!(proxy.state(), ProxyState::Installing);

        proxy.install().await.expect("install failed");
        assert_eq!(proxy.state(), ProxyState::Installed);

        proxy.activate().await.expect("activate failed");
        assert_eq!(proxy.state(), ProxyState::Active);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let network = FakeNetwork::new();
        network.route("GET /", Response::ok(b"app".to_vec()));
        network.route("GET /manifest.json", Response::ok(b"{}".to_vec()));
        // /offline.html unrouted -> 404

        let cache = InMemoryPartitions::new();
        let proxy = EdgeProxy::new(cache.clone(), network);
        let result = proxy.install().await;

        assert!(matches!(result, Err(Error::Install(_))));
        assert_eq!(proxy.state(), ProxyState::Installing);
        assert_eq!(cache.entry_count("app-shell-v1"), 0);
    }

    #[tokio::test]
    async fn test_activation_purges_stale_partitions() {
        let cache = InMemoryPartitions::new();
        // Leftovers from an older deployment.
        cache
            .put("app-shell-v0", "GET /", b"old".to_vec())
            .await
            .expect("put");
        cache
            .put("static-v0", "GET /app.js", b"old".to_vec())
            .await
            .expect("put");

        let proxy = EdgeProxy::new(cache.clone(), shell_network());
        proxy.install().await.expect("install failed");
        proxy.activate().await.expect("activate failed");

        let names = cache.list_partitions().await.expect("list");
        assert!(!names.contains(&"app-shell-v0".to_string()));
        assert!(!names.contains(&"static-v0".to_string()));
        assert!(names.contains(&"app-shell-v1".to_string()));
    }

    #[tokio::test]
    async fn test_skip_waiting_activates() {
        let proxy = EdgeProxy::new(InMemoryPartitions::new(), shell_network());
        proxy.install().await.expect("install failed");

        proxy.handle_message(&ClientMessage::SkipWaiting).await;
        assert_eq!(proxy.state(), ProxyState::Active);
    }

    #[tokio::test]
    async fn test_passthrough_before_activation() {
        let network = shell_network();
        network.route("GET /rest/v1/ideas", Response::ok(b"[]".to_vec()));

        let cache = InMemoryPartitions::new();
        let proxy = EdgeProxy::new(cache.clone(), network);

        let response = proxy
            .handle_fetch(&Request::get("/rest/v1/ideas"))
            .await
            .expect("fetch failed");
        assert_eq!(response.status, 200);
        // Not intercepted: nothing cached.
        proxy.quiesce().await;
        assert_eq!(cache.entry_count("api-v1"), 0);
    }

    #[tokio::test]
    async fn test_navigation_falls_back_to_offline_page() {
        let network = shell_network();
        let proxy = active_proxy(network.clone()).await;

        network.set_online(false);
        let response = proxy
            .handle_fetch(&Request::navigate("/dashboard"))
            .await
            .expect("navigation should never fail with a cached shell");
        assert_eq!(response.body, b"<html>offline</html>");
    }

    #[tokio::test]
    async fn test_api_mutations_never_cached() {
        let network = shell_network();
        network.route("POST /rest/v1/ideas", Response::ok(b"created".to_vec()));

        let proxy = active_proxy(network.clone()).await;
        let cache = proxy.cache().clone();

        let request = Request::with_method(Method::Post, "/rest/v1/ideas");
        let response = proxy.handle_fetch(&request).await.expect("fetch failed");
        assert_eq!(response.status, 200);

        proxy.quiesce().await;
        assert_eq!(cache.entry_count("api-v1"), 0);
    }

    #[tokio::test]
    async fn test_api_offline_without_cache_is_cache_miss() {
        let network = shell_network();
        let proxy = active_proxy(network.clone()).await;

        network.set_online(false);
        let result = proxy.handle_fetch(&Request::get("/rest/v1/ideas")).await;
        assert!(matches!(result, Err(Error::CacheMiss)));
    }

    #[tokio::test]
    async fn test_stale_while_revalidate_serves_cached_then_updates() {
        let network = shell_network();
        network.route("GET /app.js", Response::ok(b"v1".to_vec()));

        let proxy = active_proxy(network.clone()).await;

        // Miss: awaits network, caches v1.
        let first = proxy
            .handle_fetch(&Request::get("/app.js"))
            .await
            .expect("fetch failed");
        assert_eq!(first.body, b"v1");
        proxy.quiesce().await;

        // The network now serves v2; the hit still returns v1 and
        // refreshes in the background.
        network.route("GET /app.js", Response::ok(b"v2".to_vec()));
        let second = proxy
            .handle_fetch(&Request::get("/app.js"))
            .await
            .expect("fetch failed");
        assert_eq!(second.body, b"v1");
        proxy.quiesce().await;

        // Third call sees the refreshed bytes.
        let third = proxy
            .handle_fetch(&Request::get("/app.js"))
            .await
            .expect("fetch failed");
        assert_eq!(third.body, b"v2");
        proxy.quiesce().await;
    }

    #[tokio::test]
    async fn test_catch_all_policy_controls_write_through() {
        let network = shell_network();
        network.route("POST /misc/echo", Response::ok(b"echo".to_vec()));

        // Legacy behavior: cache every 200.
        let proxy = EdgeProxy::new(InMemoryPartitions::new(), network.clone())
            .with_catch_all_caching(CatchAllCaching::AllMethods);
        proxy.install().await.expect("install failed");
        proxy.activate().await.expect("activate failed");

        let request = Request::with_method(Method::Post, "/misc/echo");
        proxy.handle_fetch(&request).await.expect("fetch failed");
        proxy.quiesce().await;
        assert_eq!(proxy.cache().entry_count("main-v1"), 1);

        // Offline, the cached POST response is the fallback.
        network.set_online(false);
        let fallback = proxy.handle_fetch(&request).await.expect("fallback");
        assert_eq!(fallback.body, b"echo");
    }

    #[tokio::test]
    async fn test_corrupted_snapshot_is_evicted() {
        let network = shell_network();
        network.route("GET /rest/v1/ideas", Response::ok(b"fresh".to_vec()));

        let proxy = active_proxy(network.clone()).await;
        let cache = proxy.cache().clone();

        // Plant garbage where a snapshot should be.
        cache
            .put("api-v1", "GET /rest/v1/ideas", vec![0xde, 0xad])
            .await
            .expect("put");

        network.set_online(false);
        // Garbage entry does not count as a fallback.
        let result = proxy.handle_fetch(&Request::get("/rest/v1/ideas")).await;
        assert!(matches!(result, Err(Error::CacheMiss)));
        assert_eq!(cache.entry_count("api-v1"), 0);
    }
}
