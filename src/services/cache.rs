use crate::models::PetProfile;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cached pet lists, keyed by customer
///
/// Entries are dropped when the customer's pets change through this service:
/// a create invalidates that customer, a delete invalidates every list that
/// contains the deleted pet. The TTL bounds staleness from edits made
/// elsewhere (for example in the Shopify admin).
///
/// Every invalidation bumps a generation counter. A list loaded while the
/// generation moved is not kept, so a slow List can never cache a result
/// that predates a concurrent create or delete.
#[derive(Clone)]
pub struct PetListCache {
    lists: moka::future::Cache<String, Arc<Vec<PetProfile>>>,
    generation: Arc<AtomicU64>,
}

impl PetListCache {
    /// Create a new cache
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let lists = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            lists,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Current generation; capture it before loading a list to insert
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub async fn get(&self, customer_id: &str) -> Option<Arc<Vec<PetProfile>>> {
        let key = CacheKey::pets(customer_id);
        let hit = self.lists.get(&key).await;
        if hit.is_some() {
            tracing::trace!("Pet list cache hit: {}", key);
        }
        hit
    }

    /// Cache a list loaded at `generation`
    ///
    /// Skipped when an invalidation happened since. The generation is checked
    /// again after the write since an invalidation may land in between.
    pub async fn insert(&self, customer_id: &str, pets: Vec<PetProfile>, generation: u64) {
        let key = CacheKey::pets(customer_id);
        if self.generation() != generation {
            tracing::trace!("Pet list changed while loading, not cached: {}", key);
            return;
        }

        self.lists.insert(key.clone(), Arc::new(pets)).await;

        if self.generation() != generation {
            self.lists.invalidate(&key).await;
            tracing::trace!("Pet list changed while loading, dropped: {}", key);
        }
    }

    /// Drop the cached list of one customer
    pub async fn invalidate_customer(&self, customer_id: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let key = CacheKey::pets(customer_id);
        self.lists.invalidate(&key).await;
        tracing::trace!("Invalidated pet list: {}", key);
    }

    /// Drop every cached list that contains the given pet
    pub async fn invalidate_pet(&self, pet_id: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let keys: Vec<Arc<String>> = self
            .lists
            .iter()
            .filter(|(_, pets)| pets.iter().any(|p| p.id == pet_id))
            .map(|(key, _)| key)
            .collect();

        for key in keys {
            self.lists.invalidate(key.as_str()).await;
            tracing::trace!("Invalidated pet list: {}", key);
        }
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a customer's pet list
    pub fn pets(customer_id: &str) -> String {
        format!("pets:{}", customer_id)
    }
}
