//! Cache partitions: named, versioned buckets of response snapshots.
//!
//! The proxy owns a set of partitions, one per logical role (app shell,
//! generic main, static assets, api responses). Each partition name
//! carries a generation suffix; activating a new proxy version deletes
//! every partition whose name is not in the current allow-list. That
//! deletion is the only eviction mechanism across deployments.

use crate::error::Result;

pub mod inmemory;

pub use inmemory::InMemoryPartitions;

/// The four logical partition roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionRole {
    /// Root document, offline page, manifest; also navigation write-throughs.
    Shell,
    /// Catch-all write-throughs.
    Main,
    /// Static assets under stale-while-revalidate.
    StaticAssets,
    /// GET API responses.
    Api,
}

impl PartitionRole {
    fn prefix(&self) -> &'static str {
        match self {
            PartitionRole::Shell => "app-shell",
            PartitionRole::Main => "main",
            PartitionRole::StaticAssets => "static",
            PartitionRole::Api => "api",
        }
    }
}

/// Current partition names, derived from per-role generations.
///
/// The shell and main partitions share one rotating generation (they are
/// invalidated together on deploy); static and api generations rotate
/// independently so each can be invalidated on its own schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionConfig {
    pub shell_generation: String,
    pub static_generation: String,
    pub api_generation: String,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        PartitionConfig {
            shell_generation: "v1".to_string(),
            static_generation: "v1".to_string(),
            api_generation: "v1".to_string(),
        }
    }
}

impl PartitionConfig {
    pub fn new(
        shell_generation: impl Into<String>,
        static_generation: impl Into<String>,
        api_generation: impl Into<String>,
    ) -> Self {
        PartitionConfig {
            shell_generation: shell_generation.into(),
            static_generation: static_generation.into(),
            api_generation: api_generation.into(),
        }
    }

    /// Current name for a role: `"{prefix}-{generation}"`.
    pub fn name(&self, role: PartitionRole) -> String {
        let generation = match role {
            PartitionRole::Shell | PartitionRole::Main => &self.shell_generation,
            PartitionRole::StaticAssets => &self.static_generation,
            PartitionRole::Api => &self.api_generation,
        };
        format!("{}-{}", role.prefix(), generation)
    }

    /// Every partition name a freshly activated proxy keeps alive.
    /// Anything else is eligible for deletion on activation.
    pub fn allow_list(&self) -> Vec<String> {
        [
            PartitionRole::Shell,
            PartitionRole::Main,
            PartitionRole::StaticAssets,
            PartitionRole::Api,
        ]
        .iter()
        .map(|role| self.name(*role))
        .collect()
    }
}

/// Trait for partition storage implementations.
///
/// Abstracts the platform cache API so the proxy can run against an
/// in-memory store in tests or a real HTTP cache in production.
/// Partitions are created implicitly on first write; entries are
/// last-write-wins per request identity.
///
/// **IMPORTANT:** All methods use `&self`; implementations use interior
/// mutability so the proxy can serve concurrent requests without locks.
/// `put` is declared with an explicit `Send` future because the proxy
/// runs write-throughs as spawned tasks; implement it with a plain
/// `async fn`.
#[allow(async_fn_in_trait)]
pub trait PartitionStore: Send + Sync + Clone {
    /// Retrieve a stored snapshot by request identity.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - snapshot found
    /// - `Ok(None)` - no entry (also when the partition does not exist)
    async fn get(&self, partition: &str, identity: &str) -> Result<Option<Vec<u8>>>;

    /// Store a snapshot, creating the partition on first write.
    fn put(
        &self,
        partition: &str,
        identity: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Remove one entry. No error if already absent.
    async fn delete(&self, partition: &str, identity: &str) -> Result<()>;

    /// Names of every existing partition, current or stale.
    async fn list_partitions(&self) -> Result<Vec<String>>;

    /// Delete an entire partition and all its entries.
    async fn drop_partition(&self, partition: &str) -> Result<()>;

    /// Check whether a partition currently exists (optional optimization).
    async fn has_partition(&self, partition: &str) -> Result<bool> {
        Ok(self
            .list_partitions()
            .await?
            .iter()
            .any(|name| name == partition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_names() {
        let config = PartitionConfig::new("v3", "v1", "v2");
        assert_eq!(config.name(PartitionRole::Shell), "app-shell-v3");
        assert_eq!(config.name(PartitionRole::Main), "main-v3");
        assert_eq!(config.name(PartitionRole::StaticAssets), "static-v1");
        assert_eq!(config.name(PartitionRole::Api), "api-v2");
    }

    #[test]
    fn test_allow_list_covers_all_roles() {
        let config = PartitionConfig::default();
        let allow = config.allow_list();
        assert_eq!(allow.len(), 4);
        assert!(allow.contains(&"app-shell-v1".to_string()));
        assert!(allow.contains(&"main-v1".to_string()));
        assert!(allow.contains(&"static-v1".to_string()));
        assert!(allow.contains(&"api-v1".to_string()));
    }

    #[test]
    fn test_shell_and_main_share_generation() {
        let config = PartitionConfig::new("v9", "v1", "v1");
        assert_eq!(config.name(PartitionRole::Shell), "app-shell-v9");
        assert_eq!(config.name(PartitionRole::Main), "main-v9");
    }
}
