//! Query engine: filter specifications resolved against the indices.
//!
//! A query picks one index bucket as its base (the most selective field
//! present, in the order faction > country > region > violence type) and
//! applies the remaining fields as a linear filter over that base. The base
//! choice only changes cost; every choice yields the same set.
//!
//! Results are memoized by the filter's canonical key.

mod plan;


use std::sync::{Arc, Mutex};

use conflux_types::{CachePolicy, CacheStats, EventFilter};

use crate::cache::{BoundedCache, lock};
use crate::dataset::{EventIdx, EventSet, EventStore};
use crate::index::Indices;

pub use plan::{BaseIndex, QueryPlan};

pub struct QueryEngine {
    store: Arc<EventStore>,
    indices: Arc<Indices>,
    cache: Mutex<BoundedCache<String, EventSet>>,
}

impl QueryEngine {
    pub fn new(
        store: Arc<EventStore>,
        indices: Arc<Indices>,
        cache_capacity: usize,
        policy: CachePolicy,
    ) -> Self {
        Self {
            store,
            indices,
            cache: Mutex::new(BoundedCache::new(cache_capacity, policy)),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    /// Events matching `filter`, in load order.
    pub fn filter(&self, filter: &EventFilter) -> EventSet {
        let key = filter.canonical_key();
        if let Some(hit) = lock(&self.cache).get(&key) {
            tracing::trace!(%key, "Query cache hit");
            return hit;
        }

        let result = self.evaluate(filter);
        tracing::debug!(%key, events = result.len(), "Query evaluated");
        lock(&self.cache).insert(key, result.clone());
        result
    }

    /// Evaluate without touching the cache.
    pub fn evaluate(&self, filter: &EventFilter) -> EventSet {
        let Some(plan) = QueryPlan::resolve(filter, &self.store) else {
            return EventSet::empty();
        };

        let matches = |idx: &EventIdx| plan.matches_residual(self.store.get(*idx));
        match plan.base_bucket(&self.indices) {
            Some(bucket) => bucket.iter().filter(|idx| matches(*idx)).copied().collect(),
            None => (0..self.store.len() as u32)
                .map(EventIdx)
                .filter(matches)
                .collect(),
        }
    }

    /// Events of one country under the remaining filter fields.
    pub fn country_events(&self, country: &str, filter: &EventFilter) -> EventSet {
        self.filter(&filter.clone().with_country(country))
    }

    /// Events where the faction fought on either side, under the remaining filter fields.
    pub fn faction_events(&self, faction: &str, filter: &EventFilter) -> EventSet {
        self.filter(&filter.clone().with_faction(faction))
    }

    /// Events of one region; replaces any region set in `filter`.
    pub fn region_events(&self, region: &str, filter: &EventFilter) -> EventSet {
        let mut filter = filter.clone();
        filter.regions.clear();
        self.filter(&filter.with_region(region))
    }

    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        lock(&self.cache).stats()
    }
}
