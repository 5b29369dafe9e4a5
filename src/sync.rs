//! Connectivity signaling and pending-queue draining.
//!
//! The coordinator bridges offline-queued writes back to the network
//! when connectivity returns. It deliberately does **not** resend
//! anything itself: it has no knowledge of the backend's write API. On
//! an offline→online transition it broadcasts a `SyncPending` message
//! per registered sync tag; the foreground application reacts by calling
//! [`drain_pending_messages`] with its own [`MessageTransport`].
//!
//! All client↔proxy signaling uses [`ClientMessage`], a tagged enum, so
//! receivers pattern-match exhaustively instead of sniffing ad hoc
//! fields.

use crate::error::Result;
use crate::store::{ObjectStore, OfflineStore, PendingMessage};
use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

/// Sync tag registered for the pending-message queue.
pub const PENDING_MESSAGES_SYNC_TAG: &str = "pending-messages";

/// Messages broadcast between the proxy/coordinator and open clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Connectivity returned and the named sync was requested; clients
    /// should drain the corresponding queue now.
    SyncPending { tag: String },
    /// A client asks a newly installed proxy to take over immediately.
    SkipWaiting,
    /// Connectivity restored.
    Online,
    /// Connectivity lost.
    Offline,
    /// A proxy generation finished activating and claimed all clients.
    Activated { generation: String },
}

/// Connectivity/sync coordinator.
///
/// Watches a connectivity signal and relays it to every open client,
/// emitting one `SyncPending` per registered tag whenever the signal
/// flips from offline to online. Registrations are one-shot: a tag fires
/// once per registration, mirroring platform background-sync semantics.
///
/// # Example
///
/// ```ignore
/// let (connectivity_tx, connectivity_rx) = watch::channel(true);
/// let (broadcast_tx, mut client_rx) = broadcast::channel(16);
///
/// let coordinator = SyncCoordinator::new(broadcast_tx, connectivity_rx);
/// coordinator.register_sync(PENDING_MESSAGES_SYNC_TAG);
/// tokio::spawn(coordinator.clone().run());
///
/// connectivity_tx.send(false).unwrap();
/// connectivity_tx.send(true).unwrap();
/// // client_rx now sees Offline, Online, SyncPending { tag }
/// ```
#[derive(Clone)]
pub struct SyncCoordinator {
    sender: broadcast::Sender<ClientMessage>,
    connectivity: watch::Receiver<bool>,
    /// Connectivity observed at construction. `run` compares against
    /// this, not the value at its first poll, so a transition landing
    /// before the task is polled is still relayed.
    initial_online: bool,
    tags: Arc<DashSet<String>>,
}

impl SyncCoordinator {
    pub fn new(
        sender: broadcast::Sender<ClientMessage>,
        connectivity: watch::Receiver<bool>,
    ) -> Self {
        let initial_online = *connectivity.borrow();
        SyncCoordinator {
            sender,
            connectivity,
            initial_online,
            tags: Arc::new(DashSet::new()),
        }
    }

    /// Request a sync for `tag` on the next reconnect. Idempotent until
    /// the tag fires.
    pub fn register_sync(&self, tag: impl Into<String>) {
        let tag = tag.into();
        debug!("sync registered for tag {}", tag);
        self.tags.insert(tag);
    }

    /// Whether a sync is currently registered for `tag`.
    pub fn has_registration(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// A fresh receiver for the client broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientMessage> {
        self.sender.subscribe()
    }

    /// Watch connectivity until the signal source goes away.
    ///
    /// Every transition is relayed as `Online`/`Offline`; an
    /// offline→online transition additionally fires the registered sync
    /// tags. Send errors (no open clients) are ignored: the signal is
    /// best-effort and the registrations stay put for the next trigger.
    pub async fn run(mut self) {
        let mut was_online = self.initial_online;

        while self.connectivity.changed().await.is_ok() {
            let online = *self.connectivity.borrow();
            if online == was_online {
                continue;
            }
            was_online = online;

            if online {
                info!("connectivity restored");
                let _ = self.sender.send(ClientMessage::Online);
                self.fire_registered_syncs();
            } else {
                info!("connectivity lost");
                let _ = self.sender.send(ClientMessage::Offline);
            }
        }
        debug!("connectivity signal closed, coordinator stopping");
    }

    fn fire_registered_syncs(&self) {
        let tags: Vec<String> = self.tags.iter().map(|t| t.key().clone()).collect();
        for tag in tags {
            if self
                .sender
                .send(ClientMessage::SyncPending { tag: tag.clone() })
                .is_ok()
            {
                self.tags.remove(&tag);
            }
            // On send failure the registration survives for the next
            // transition; no sync request is ever dropped silently.
        }
    }
}

/// The foreground application's delivery seam: how one queued message
/// becomes a confirmed backend write.
#[allow(async_fn_in_trait)]
pub trait MessageTransport: Send + Sync {
    /// Deliver one message.
    ///
    /// # Errors
    /// Returns `Err` when delivery was not confirmed; the message then
    /// stays queued.
    async fn deliver(&self, message: &PendingMessage) -> Result<()>;
}

/// Outcome of one drain pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages delivered and removed from the queue.
    pub delivered: usize,
    /// Messages still queued (delivery failed or was never attempted).
    pub remaining: usize,
}

impl DrainReport {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Drain the pending-message queue in timestamp order.
///
/// Each message is delivered and only then removed; a failed delivery
/// stops the pass, leaving that message and everything after it queued
/// for the next trigger. Stopping (rather than skipping ahead) keeps
/// per-session FIFO intact. Draining an empty queue is a no-op, so
/// repeated triggers are harmless.
pub async fn drain_pending_messages<S, T>(
    store: &OfflineStore<S>,
    transport: &T,
) -> DrainReport
where
    S: ObjectStore,
    T: MessageTransport,
{
    let pending = store.list_pending_messages().await;
    let total = pending.len();
    let mut delivered = 0;

    for message in pending {
        match transport.deliver(&message).await {
            Ok(()) => {
                store.remove_pending_message(&message.id).await;
                delivered += 1;
            }
            Err(e) => {
                warn!(
                    "delivery of pending message {} failed, stopping drain: {}",
                    message.id, e
                );
                break;
            }
        }
    }

    let report = DrainReport {
        delivered,
        remaining: total - delivered,
    };
    info!(
        "drain pass: {} delivered, {} remaining",
        report.delivered, report.remaining
    );
    report
}
