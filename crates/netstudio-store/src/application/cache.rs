//! Query cache mirroring on-disk state.
//!
//! The UI reads through two logical queries:
//!
//! | Query key  | Value                                   |
//! |------------|-----------------------------------------|
//! | `netList`  | the index, in insertion order           |
//! | `net`      | the full record of one network, by id   |
//!
//! Results are memoised until a mutation invalidates their key.
//! Invalidating `net` drops every cached record, not just one id, so a
//! mutation never has to know which ids a view currently shows.
//!
//! Invalidations are also broadcast so views can re-query.  A subscriber
//! that falls behind receives `RecvError::Lagged` and should simply refetch
//! everything.

use std::collections::HashMap;
use std::fmt;

use netstudio_core::{NetId, NetworkConfig, NetworkSummary};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

/// Capacity of the invalidation broadcast channel.
const INVALIDATION_CHANNEL_CAPACITY: usize = 64;

/// Logical name of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The list of all networks.
    NetList,
    /// The full record of a network.
    Net,
}

impl QueryKey {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKey::NetList => "netList",
            QueryKey::Net => "net",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Memoised query results plus the invalidation broadcaster.
///
/// Every invalidation bumps a generation counter.  A reader captures the
/// generation before it reads the store and hands it back when storing the
/// result; if a mutation invalidated anything in between, the result is
/// dropped instead of cached, so a read that overlapped a mutation can never
/// pin pre-mutation state.
pub struct QueryCache {
    entries: Mutex<Entries>,
    events: broadcast::Sender<QueryKey>,
}

#[derive(Default)]
struct Entries {
    generation: u64,
    net_list: Option<Vec<NetworkSummary>>,
    nets: HashMap<NetId, NetworkConfig>,
}

impl Default for QueryCache {
    fn default() -> Self {
        let (events, _) = broadcast::channel(INVALIDATION_CHANNEL_CAPACITY);
        Self {
            entries: Mutex::new(Entries::default()),
            events,
        }
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current invalidation generation; capture it before reading the store.
    pub async fn generation(&self) -> u64 {
        self.entries.lock().await.generation
    }

    pub async fn net_list(&self) -> Option<Vec<NetworkSummary>> {
        self.entries.lock().await.net_list.clone()
    }

    /// Caches `list` if nothing was invalidated since `generation`.
    ///
    /// Returns `false` when the result was dropped as superseded.
    pub async fn store_net_list(&self, list: Vec<NetworkSummary>, generation: u64) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.generation != generation {
            return false;
        }
        entries.net_list = Some(list);
        true
    }

    pub async fn net(&self, id: NetId) -> Option<NetworkConfig> {
        self.entries.lock().await.nets.get(&id).cloned()
    }

    /// Caches `config` if nothing was invalidated since `generation`.
    ///
    /// Returns `false` when the result was dropped as superseded.
    pub async fn store_net(&self, config: NetworkConfig, generation: u64) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.generation != generation {
            return false;
        }
        entries.nets.insert(config.id, config);
        true
    }

    /// Drops the cached results for `key` and notifies subscribers.
    pub async fn invalidate(&self, key: QueryKey) {
        {
            let mut entries = self.entries.lock().await;
            entries.generation = entries.generation.wrapping_add(1);
            match key {
                QueryKey::NetList => entries.net_list = None,
                QueryKey::Net => entries.nets.clear(),
            }
        }
        debug!(query = %key, "query invalidated");
        // An error only means nobody is subscribed right now.
        let _ = self.events.send(key);
    }

    /// Returns a receiver for future invalidations.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.events.subscribe()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use netstudio_core::ModelType;
    use uuid::Uuid;

    fn config() -> NetworkConfig {
        NetworkConfig::new(Uuid::new_v4(), ModelType::MultilayerPerceptron)
    }

    #[tokio::test]
    async fn test_cache_starts_empty() {
        let cache = QueryCache::new();
        assert!(cache.net_list().await.is_none());
        assert!(cache.net(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_net_list_keeps_net_entries() {
        // Arrange
        let cache = QueryCache::new();
        let net = config();
        cache.store_net_list(vec![net.summary()], 0).await;
        cache.store_net(net.clone(), 0).await;

        // Act
        cache.invalidate(QueryKey::NetList).await;

        // Assert
        assert!(cache.net_list().await.is_none());
        assert_eq!(cache.net(net.id).await, Some(net));
    }

    #[tokio::test]
    async fn test_invalidate_net_drops_every_cached_record() {
        let cache = QueryCache::new();
        let a = config();
        let b = config();
        cache.store_net(a.clone(), 0).await;
        cache.store_net(b.clone(), 0).await;

        cache.invalidate(QueryKey::Net).await;

        assert!(cache.net(a.id).await.is_none());
        assert!(cache.net(b.id).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_notifies_subscribers_in_order() {
        // Arrange
        let cache = QueryCache::new();
        let mut rx = cache.subscribe();

        // Act
        cache.invalidate(QueryKey::NetList).await;
        cache.invalidate(QueryKey::Net).await;

        // Assert
        assert_eq!(rx.recv().await.unwrap(), QueryKey::NetList);
        assert_eq!(rx.recv().await.unwrap(), QueryKey::Net);
    }

    #[tokio::test]
    async fn test_invalidate_without_subscribers_does_not_fail() {
        let cache = QueryCache::new();
        cache.invalidate(QueryKey::Net).await;
    }

    #[tokio::test]
    async fn test_result_read_before_invalidation_is_not_cached() {
        // Arrange: a reader captures the generation, then a mutation lands.
        let cache = QueryCache::new();
        let net = config();
        let before = cache.generation().await;
        cache.invalidate(QueryKey::Net).await;

        // Act
        let stored_net = cache.store_net(net.clone(), before).await;
        let stored_list = cache.store_net_list(vec![net.summary()], before).await;

        // Assert
        assert!(!stored_net);
        assert!(!stored_list);
        assert!(cache.net(net.id).await.is_none());
        assert!(cache.net_list().await.is_none());
    }

    #[tokio::test]
    async fn test_result_with_current_generation_is_cached() {
        let cache = QueryCache::new();
        cache.invalidate(QueryKey::NetList).await;
        let net = config();

        let generation = cache.generation().await;
        assert!(cache.store_net(net.clone(), generation).await);

        assert_eq!(cache.net(net.id).await, Some(net));
    }

    #[test]
    fn test_query_keys_use_ui_names() {
        assert_eq!(QueryKey::NetList.to_string(), "netList");
        assert_eq!(QueryKey::Net.to_string(), "net");
    }
}
