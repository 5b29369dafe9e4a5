//! Fetch strategies applied by the network edge proxy.
//!
//! Every intercepted request is classified (see [`crate::request`]) and
//! dispatched to one of four strategies. The strategies differ in what
//! they prioritize:
//!
//! | Strategy | Priority | Offline behavior |
//! |----------|----------|------------------|
//! | **NetworkFirstShell** | freshness | serve the stored offline page |
//! | **StaleWhileRevalidate** | latency | serve the cached asset as-is |
//! | **NetworkFirstApi** | freshness | fall back to last cached GET |
//! | **NetworkFirst** | freshness | fall back to last cached entry |
//!
//! Navigation and API calls prioritize freshness because users must see
//! current data, but both degrade gracefully offline. Static assets
//! prioritize latency: a slightly stale script is safe to show once while
//! the cache silently upgrades in the background.

use crate::request::RequestClass;

/// Strategy enum controlling how a request is served and cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStrategy {
    /// **NetworkFirstShell**: navigation requests.
    ///
    /// Flow:
    /// 1. Attempt network
    /// 2. On 200: write through to the app-shell partition (detached)
    /// 3. On any network failure: serve the stored offline fallback page
    NetworkFirstShell,

    /// **StaleWhileRevalidate**: static assets.
    ///
    /// Flow:
    /// 1. Check cache
    /// 2. If hit: return cached entry immediately, refresh it in the
    ///    background (detached fetch, overwrite on 200)
    /// 3. If miss: await the network, write through on 200
    /// 4. Network failure with no cached entry propagates
    StaleWhileRevalidate,

    /// **NetworkFirstApi**: backend API calls.
    ///
    /// Flow:
    /// 1. Attempt network
    /// 2. On 200 **and** GET: write through to the api partition.
    ///    Mutating requests never touch the cache.
    /// 3. On network failure: fall back to the cached entry if one
    ///    exists, otherwise fail with `CacheMiss`
    NetworkFirstApi,

    /// **NetworkFirst**: catch-all for unclassified requests.
    ///
    /// Same flow as `NetworkFirstApi`, but write-through follows the
    /// configured [`CatchAllCaching`] policy instead of being
    /// unconditionally GET-only.
    NetworkFirst,
}

impl FetchStrategy {
    /// Map a request class to its strategy.
    pub fn for_class(class: RequestClass) -> Self {
        match class {
            RequestClass::Navigation => FetchStrategy::NetworkFirstShell,
            RequestClass::StaticAsset => FetchStrategy::StaleWhileRevalidate,
            RequestClass::Api => FetchStrategy::NetworkFirstApi,
            RequestClass::Default => FetchStrategy::NetworkFirst,
        }
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::NetworkFirstShell => write!(f, "NetworkFirstShell"),
            FetchStrategy::StaleWhileRevalidate => write!(f, "StaleWhileRevalidate"),
            FetchStrategy::NetworkFirstApi => write!(f, "NetworkFirstApi"),
            FetchStrategy::NetworkFirst => write!(f, "NetworkFirst"),
        }
    }
}

/// Write-through policy for the catch-all strategy.
///
/// The catch-all covers requests outside the declared navigation, static
/// and API shapes. Caching *any* 200 there would also capture
/// non-idempotent or user-specific responses, so the behavior is an
/// explicit policy rather than an implicit default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CatchAllCaching {
    /// Write through GET responses only (shipped default).
    #[default]
    GetOnly,
    /// Write through every 200 regardless of method.
    AllMethods,
    /// Never write through; cache fallback still applies to reads.
    Disabled,
}

impl CatchAllCaching {
    /// Whether a 200 response for the given method should be stored.
    pub fn allows(&self, method_is_get: bool) -> bool {
        match self {
            CatchAllCaching::GetOnly => method_is_get,
            CatchAllCaching::AllMethods => true,
            CatchAllCaching::Disabled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_for_class() {
        assert_eq!(
            FetchStrategy::for_class(RequestClass::Navigation),
            FetchStrategy::NetworkFirstShell
        );
        assert_eq!(
            FetchStrategy::for_class(RequestClass::StaticAsset),
            FetchStrategy::StaleWhileRevalidate
        );
        assert_eq!(
            FetchStrategy::for_class(RequestClass::Api),
            FetchStrategy::NetworkFirstApi
        );
        assert_eq!(
            FetchStrategy::for_class(RequestClass::Default),
            FetchStrategy::NetworkFirst
        );
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(
            FetchStrategy::StaleWhileRevalidate.to_string(),
            "StaleWhileRevalidate"
        );
        assert_eq!(FetchStrategy::NetworkFirst.to_string(), "NetworkFirst");
    }

    #[test]
    fn test_catch_all_policy() {
        assert!(CatchAllCaching::GetOnly.allows(true));
        assert!(!CatchAllCaching::GetOnly.allows(false));
        assert!(CatchAllCaching::AllMethods.allows(false));
        assert!(!CatchAllCaching::Disabled.allows(true));
        assert_eq!(CatchAllCaching::default(), CatchAllCaching::GetOnly);
    }
}
