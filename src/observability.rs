//! Metrics hooks for proxy fetch handling.
//!
//! Implement [`ProxyMetrics`] to feed your monitoring system; every hook
//! receives the request identity. Defaults log via the `log` crate, and
//! [`NoOpMetrics`] silences everything (used when no metrics handler is
//! configured).
//!
//! ```ignore
//! struct PrometheusMetrics;
//!
//! impl ProxyMetrics for PrometheusMetrics {
//!     fn record_cache_hit(&self, _identity: &str) {
//!         // counter!("proxy_cache_hits").inc();
//!     }
//!     // ... other hooks
//! }
//!
//! // let proxy = EdgeProxy::new(...).with_metrics(Box::new(PrometheusMetrics));
//! ```

/// Trait for proxy metrics collection.
pub trait ProxyMetrics: Send + Sync {
    /// A request was served from a cache partition.
    fn record_cache_hit(&self, identity: &str) {
        debug!("proxy HIT: {}", identity);
    }

    /// A request went to the network (cache miss or network-first).
    fn record_network_fetch(&self, identity: &str) {
        debug!("proxy NETWORK: {}", identity);
    }

    /// A 200 response was scheduled for write-through.
    fn record_write_through(&self, identity: &str) {
        debug!("proxy WRITE-THROUGH: {}", identity);
    }

    /// The network failed and a cached fallback (or the offline page)
    /// was served instead.
    fn record_fallback(&self, identity: &str) {
        debug!("proxy FALLBACK: {}", identity);
    }

    /// A request failed with no fallback available.
    fn record_error(&self, identity: &str, error: &str) {
        warn!("proxy ERROR for {}: {}", identity, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl ProxyMetrics for NoOpMetrics {
    fn record_cache_hit(&self, _identity: &str) {}
    fn record_network_fetch(&self, _identity: &str) {}
    fn record_write_through(&self, _identity: &str) {}
    fn record_fallback(&self, _identity: &str) {}
    fn record_error(&self, _identity: &str, _error: &str) {}
}
