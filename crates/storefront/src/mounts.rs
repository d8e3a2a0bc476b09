//! Live configurator mounts.
//!
//! Each product page load mounts a fresh [`Configurator`] under a random ID
//! that the page sends back with every HTMX request. Mounts live in a `moka`
//! cache; idling out (or capacity eviction) is the unmount, and the eviction
//! listener tears the configurator down so no pending image transition
//! outlives its page.

use std::sync::Arc;
use std::time::Duration;

use drape_core::Configurator;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A mounted configurator. The mutex serializes events from one page.
pub type SharedConfigurator = Arc<Mutex<Configurator>>;

/// Default number of concurrently mounted configurators.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Default idle time before a mount is discarded.
pub const DEFAULT_IDLE: Duration = Duration::from_secs(30 * 60);

/// Registry of mounted configurators.
#[derive(Clone)]
pub struct MountRegistry {
    cache: Cache<Uuid, SharedConfigurator>,
}

impl Default for MountRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_IDLE)
    }
}

impl MountRegistry {
    /// Create a registry holding at most `capacity` mounts, each discarded
    /// after `idle` without requests.
    #[must_use]
    pub fn new(capacity: u64, idle: Duration) -> Self {
        // At capacity evict the least recently used mount, never the new one.
        let cache = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .time_to_idle(idle)
            .eviction_listener(|id: Arc<Uuid>, configurator: SharedConfigurator, cause| {
                tracing::debug!(mount = %id, ?cause, "Configurator unmounted");
                // A request still holding the lock keeps its own Arc and
                // finishes normally; the mount is unreachable either way.
                if let Ok(mut configurator) = configurator.try_lock() {
                    configurator.unmount();
                }
            })
            .build();

        Self { cache }
    }

    /// Mount a configurator and return its ID.
    pub async fn mount(&self, configurator: Configurator) -> Uuid {
        let id = Uuid::new_v4();
        self.cache
            .insert(id, Arc::new(Mutex::new(configurator)))
            .await;
        tracing::debug!(mount = %id, "Configurator mounted");
        id
    }

    /// Look up a live mount.
    pub async fn get(&self, id: &Uuid) -> Option<SharedConfigurator> {
        self.cache.get(id).await
    }

    /// Discard a mount.
    pub async fn unmount(&self, id: &Uuid) {
        self.cache.invalidate(id).await;
    }

    /// Apply pending evictions (and run the eviction listener).
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    /// Approximate number of live mounts.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
