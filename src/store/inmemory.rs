//! In-memory object-store engine (default, thread-safe, async).
//!
//! DashMap-backed; `Clone` shares the same collections, which stands in
//! for the shared database connection of a real persistent engine.

use super::ObjectStore;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Thread-safe in-memory object-store engine.
#[derive(Clone)]
pub struct InMemoryObjectStore {
    collections: Arc<DashMap<String, DashMap<String, Vec<u8>>>>,
    version: Arc<AtomicU32>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        InMemoryObjectStore {
            collections: Arc::new(DashMap::new()),
            version: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Names of all existing collections.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.iter().map(|c| c.key().clone()).collect()
    }

    /// Number of records in one collection (0 when absent).
    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        self.collections.entry(collection.to_string()).or_default();
        debug!("store ENSURE {}", collection);
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(key).map(|r| r.value().clone())))
    }

    async fn put(&self, collection: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        match self.collections.get(collection) {
            Some(c) => {
                c.insert(key.to_string(), bytes);
                debug!("store PUT {}/{}", collection, key);
                Ok(())
            }
            None => Err(Error::Storage(format!(
                "collection {} does not exist",
                collection
            ))),
        }
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        if let Some(c) = self.collections.get(collection) {
            c.remove(key);
        }
        debug!("store DELETE {}/{}", collection, key);
        Ok(())
    }

    async fn scan(&self, collection: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|r| (r.key().clone(), r.value().clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn clear(&self, collection: &str) -> Result<()> {
        if let Some(c) = self.collections.get(collection) {
            c.clear();
        }
        info!("store CLEAR {}", collection);
        Ok(())
    }

    async fn schema_version(&self) -> Result<u32> {
        Ok(self.version.load(Ordering::SeqCst))
    }

    async fn set_schema_version(&self, version: u32) -> Result<()> {
        self.version.store(version, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_requires_collection() {
        let engine = InMemoryObjectStore::new();

        let result = engine.put("ideas", "s1", b"{}".to_vec()).await;
        assert!(matches!(result, Err(Error::Storage(_))));

        engine.ensure_collection("ideas").await.expect("ensure");
        engine.put("ideas", "s1", b"{}".to_vec()).await.expect("put");
        assert_eq!(
            engine.get("ideas", "s1").await.expect("get"),
            Some(b"{}".to_vec())
        );
    }

    #[tokio::test]
    async fn test_ensure_collection_idempotent() {
        let engine = InMemoryObjectStore::new();
        engine.ensure_collection("ideas").await.expect("ensure");
        engine.put("ideas", "s1", b"{}".to_vec()).await.expect("put");
        engine.ensure_collection("ideas").await.expect("ensure again");
        assert_eq!(engine.record_count("ideas"), 1);
    }

    #[tokio::test]
    async fn test_scan_and_clear() {
        let engine = InMemoryObjectStore::new();
        engine.ensure_collection("pending").await.expect("ensure");
        engine.put("pending", "a", vec![1]).await.expect("put");
        engine.put("pending", "b", vec![2]).await.expect("put");

        assert_eq!(engine.scan("pending").await.expect("scan").len(), 2);
        assert!(engine.scan("absent").await.expect("scan").is_empty());

        engine.clear("pending").await.expect("clear");
        assert_eq!(engine.record_count("pending"), 0);
        assert!(engine.collection_names().contains(&"pending".to_string()));
    }

    #[tokio::test]
    async fn test_schema_version_roundtrip() {
        let engine = InMemoryObjectStore::new();
        assert_eq!(engine.schema_version().await.expect("version"), 0);
        engine.set_schema_version(3).await.expect("set");
        assert_eq!(engine.schema_version().await.expect("version"), 3);
    }
}
