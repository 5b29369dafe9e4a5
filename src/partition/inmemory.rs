//! In-memory partition store (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access; one inner map per
//! partition, created on first write and dropped wholesale on eviction.

use super::PartitionStore;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory partition store.
///
/// `Clone` is cheap and shares the same underlying partitions, which is
/// how the proxy and its detached write-through tasks see one store.
///
/// # Example
///
/// ```no_run
/// use offline_kit::partition::{InMemoryPartitions, PartitionStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryPartitions::new();
///
///     store.put("static-v1", "GET /app.js", b"bundle".to_vec()).await?;
///     assert!(store.get("static-v1", "GET /app.js").await?.is_some());
///
///     store.drop_partition("static-v1").await?;
///     assert!(store.get("static-v1", "GET /app.js").await?.is_none());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryPartitions {
    partitions: Arc<DashMap<String, DashMap<String, Vec<u8>>>>,
}

impl InMemoryPartitions {
    pub fn new() -> Self {
        InMemoryPartitions {
            partitions: Arc::new(DashMap::new()),
        }
    }

    /// Number of entries in one partition (0 when absent).
    pub fn entry_count(&self, partition: &str) -> usize {
        self.partitions
            .get(partition)
            .map(|p| p.len())
            .unwrap_or(0)
    }

    /// Total stored bytes across all partitions.
    pub fn total_bytes(&self) -> usize {
        self.partitions
            .iter()
            .map(|p| p.iter().map(|e| e.value().len()).sum::<usize>())
            .sum()
    }
}

impl Default for InMemoryPartitions {
    fn default() -> Self {
        Self::new()
    }
}

impl PartitionStore for InMemoryPartitions {
    async fn get(&self, partition: &str, identity: &str) -> Result<Option<Vec<u8>>> {
        let hit = self
            .partitions
            .get(partition)
            .and_then(|p| p.get(identity).map(|e| e.value().clone()));

        match &hit {
            Some(_) => debug!("partition GET {}/{} -> HIT", partition, identity),
            None => debug!("partition GET {}/{} -> MISS", partition, identity),
        }
        Ok(hit)
    }

    async fn put(&self, partition: &str, identity: &str, bytes: Vec<u8>) -> Result<()> {
        self.partitions
            .entry(partition.to_string())
            .or_default()
            .insert(identity.to_string(), bytes);
        debug!("partition PUT {}/{}", partition, identity);
        Ok(())
    }

    async fn delete(&self, partition: &str, identity: &str) -> Result<()> {
        if let Some(p) = self.partitions.get(partition) {
            p.remove(identity);
        }
        debug!("partition DELETE {}/{}", partition, identity);
        Ok(())
    }

    async fn list_partitions(&self) -> Result<Vec<String>> {
        Ok(self.partitions.iter().map(|p| p.key().clone()).collect())
    }

    async fn drop_partition(&self, partition: &str) -> Result<()> {
        self.partitions.remove(partition);
        info!("partition DROP {}", partition);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = InMemoryPartitions::new();

        store
            .put("static-v1", "GET /app.js", b"bundle".to_vec())
            .await
            .expect("Failed to put");

        let value = store
            .get("static-v1", "GET /app.js")
            .await
            .expect("Failed to get");
        assert_eq!(value, Some(b"bundle".to_vec()));
    }

    #[tokio::test]
    async fn test_miss_on_absent_partition() {
        let store = InMemoryPartitions::new();
        let value = store
            .get("nonexistent", "GET /x")
            .await
            .expect("Failed to get");
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = InMemoryPartitions::new();

        store
            .put("api-v1", "GET /rest/ideas", b"old".to_vec())
            .await
            .expect("Failed to put");
        store
            .put("api-v1", "GET /rest/ideas", b"new".to_vec())
            .await
            .expect("Failed to put");

        let value = store
            .get("api-v1", "GET /rest/ideas")
            .await
            .expect("Failed to get");
        assert_eq!(value, Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryPartitions::new();

        store
            .put("main-v1", "GET /x", b"data".to_vec())
            .await
            .expect("Failed to put");
        store.delete("main-v1", "GET /x").await.expect("delete");
        store.delete("main-v1", "GET /x").await.expect("delete again");

        assert_eq!(
            store.get("main-v1", "GET /x").await.expect("get"),
            None
        );
    }

    #[tokio::test]
    async fn test_list_and_drop_partitions() {
        let store = InMemoryPartitions::new();

        store
            .put("app-shell-v1", "GET /", b"html".to_vec())
            .await
            .expect("put");
        store
            .put("app-shell-v2", "GET /", b"html2".to_vec())
            .await
            .expect("put");

        let mut names = store.list_partitions().await.expect("list");
        names.sort();
        assert_eq!(names, vec!["app-shell-v1", "app-shell-v2"]);

        store.drop_partition("app-shell-v1").await.expect("drop");
        assert!(!store.has_partition("app-shell-v1").await.expect("has"));
        assert!(store.has_partition("app-shell-v2").await.expect("has"));
    }

    #[tokio::test]
    async fn test_clone_shares_store() {
        let store = InMemoryPartitions::new();
        let other = store.clone();

        store
            .put("main-v1", "GET /x", b"data".to_vec())
            .await
            .expect("put");
        assert_eq!(other.entry_count("main-v1"), 1);
    }
}
