//! Basic usage walkthrough: install the proxy, lose the network, keep
//! working, reconnect and drain the queued writes.
//!
//! Run with: cargo run --example basic_usage

use offline_kit::{
    drain_pending_messages, EdgeProxy, FakeNetwork, InMemoryObjectStore, InMemoryPartitions,
    MessageTransport, OfflineStore, PendingMessage, Request, Response, Result, SyncCoordinator,
    PENDING_MESSAGES_SYNC_TAG,
};
use tokio::sync::{broadcast, watch};

/// Transport that pretends to POST each queued message to a backend.
struct PrintlnTransport;

impl MessageTransport for PrintlnTransport {
    async fn deliver(&self, message: &PendingMessage) -> Result<()> {
        println!(
            "  [backend] delivered {:?} for session {}",
            message.content, message.session_id
        );
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    // A scriptable network stands in for the real one.
    let network = FakeNetwork::new();
    network.route("GET /", Response::ok(b"<html>app shell</html>".to_vec()));
    network.route(
        "GET /offline.html",
        Response::ok(b"<html>you are offline</html>".to_vec()),
    );
    network.route("GET /manifest.json", Response::ok(b"{}".to_vec()));
    network.route(
        "GET /rest/v1/ideas?select=*",
        Response::ok(br#"[{"idea":"food truck"}]"#.to_vec()),
    );

    println!("=== Install and activate ===");
    let proxy = EdgeProxy::new(InMemoryPartitions::new(), network.clone());
    proxy.install().await?;
    proxy.activate().await?;
    println!("  proxy state: {}", proxy.state());

    println!("\n=== Online fetches ===");
    let ideas = proxy
        .handle_fetch(&Request::get("/rest/v1/ideas?select=*"))
        .await?;
    println!("  ideas (network): {}", ideas.body_text());
    proxy.quiesce().await;

    println!("\n=== Connectivity drops ===");
    let (connectivity_tx, connectivity_rx) = watch::channel(true);
    let (broadcast_tx, mut client_rx) = broadcast::channel(16);
    let coordinator = SyncCoordinator::new(broadcast_tx, connectivity_rx);
    tokio::spawn(coordinator.clone().run());

    network.set_online(false);
    connectivity_tx.send(false).ok();
    println!("  client saw: {:?}", client_rx.recv().await.ok());

    // Navigation still works: the cached offline page takes over.
    let page = proxy.handle_fetch(&Request::navigate("/dashboard")).await?;
    println!("  navigation while offline: {}", page.body_text());

    // The cached API response still serves.
    let stale = proxy
        .handle_fetch(&Request::get("/rest/v1/ideas?select=*"))
        .await?;
    println!("  ideas (cache fallback): {}", stale.body_text());

    // User keeps typing; writes queue up locally.
    let store = OfflineStore::open(InMemoryObjectStore::new()).await?;
    store.enqueue_pending_message("session-1", "hello").await?;
    store.enqueue_pending_message("session-1", "world").await?;
    coordinator.register_sync(PENDING_MESSAGES_SYNC_TAG);
    println!(
        "  queued {} messages for later",
        store.list_pending_messages().await.len()
    );

    println!("\n=== Connectivity returns ===");
    network.set_online(true);
    connectivity_tx.send(true).ok();
    println!("  client saw: {:?}", client_rx.recv().await.ok());
    println!("  client saw: {:?}", client_rx.recv().await.ok());

    let report = drain_pending_messages(&store, &PrintlnTransport).await;
    println!(
        "  drain: {} delivered, {} remaining",
        report.delivered, report.remaining
    );

    Ok(())
}
