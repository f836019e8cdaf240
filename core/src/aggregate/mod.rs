//! Aggregation engine: derived summaries over an event subset.
//!
//! Every aggregate is a pure function of the store and an [`EventSet`].
//! Results are memoized per aggregate kind, keyed by the set itself, so two
//! different subsets can never share an entry.

mod country;
mod faction;
mod overview;
mod ranking;
mod series;


use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use conflux_types::{
    CachePolicy, CacheStats, CasualtyBreakdown, Coordinates, MonthCell, RegionTotal,
    SeasonTotal, TypeTally, ViolenceType, ViolenceTypeTotal, YearTotal,
};
use serde::Serialize;

use crate::cache::{BoundedCache, lock, merge_stats};
use crate::dataset::{EventIdx, EventSet, EventStore};

// ─────────────────────────────────────────────────────────────────────────────
// Result Types
// ─────────────────────────────────────────────────────────────────────────────

/// Per-country rollup for the map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAggregate {
    pub name: String,
    /// Region of the first event seen for this country
    pub region: String,
    pub total_casualties: u64,
    pub total_events: usize,
    /// Mean position of geolocated events, None if there are none
    pub coordinates: Option<Coordinates>,
    pub type_composition: BTreeMap<ViolenceType, TypeTally>,
    /// Highest `best`; first in load order on ties
    pub deadliest_event: EventIdx,
    pub events: Vec<EventIdx>,
    pub events_with_coords: Vec<EventIdx>,
}

/// Activity of one faction. Casualties are that faction's own side deaths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionAggregate {
    pub name: String,
    pub conflict_count: usize,
    pub casualties: u64,
    pub as_side_a: usize,
    pub as_side_b: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionLink {
    pub source: String,
    pub target: String,
    pub events: usize,
    /// Sum of `best` over the pair's events
    pub casualties: u64,
}

/// Force-graph input: factions connected by the dyads they fought in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FactionGraph {
    pub nodes: Vec<FactionAggregate>,
    pub links: Vec<FactionLink>,
}

/// Headline numbers for the statistics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetOverview {
    pub total_events: usize,
    pub total_casualties: u64,
    pub low_total: u64,
    pub high_total: u64,
    pub breakdown: CasualtyBreakdown,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub countries: usize,
    pub factions: usize,
    pub deadliest_event: Option<EventIdx>,
    pub mean_casualties: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

type Memo<T> = Mutex<BoundedCache<EventSet, Arc<T>>>;

fn memo<T>(capacity: usize, policy: CachePolicy) -> Memo<T> {
    Mutex::new(BoundedCache::new(capacity, policy))
}

pub struct AggregateEngine {
    store: Arc<EventStore>,
    countries: Memo<Vec<CountryAggregate>>,
    years: Memo<Vec<YearTotal>>,
    months: Memo<Vec<MonthCell>>,
    seasons: Memo<Vec<SeasonTotal>>,
    violence_types: Memo<Vec<ViolenceTypeTotal>>,
    regions: Memo<Vec<RegionTotal>>,
    factions: Memo<Vec<FactionAggregate>>,
    overview: Memo<DatasetOverview>,
}

impl AggregateEngine {
    /// `cache_capacity` applies to each aggregate kind separately.
    pub fn new(store: Arc<EventStore>, cache_capacity: usize, policy: CachePolicy) -> Self {
        Self {
            store,
            countries: memo(cache_capacity, policy),
            years: memo(cache_capacity, policy),
            months: memo(cache_capacity, policy),
            seasons: memo(cache_capacity, policy),
            violence_types: memo(cache_capacity, policy),
            regions: memo(cache_capacity, policy),
            factions: memo(cache_capacity, policy),
            overview: memo(cache_capacity, policy),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    fn memoized<T>(
        &self,
        memo: &Memo<T>,
        kind: &'static str,
        events: &EventSet,
        compute: impl FnOnce(&EventStore, &EventSet) -> T,
    ) -> Arc<T> {
        if let Some(hit) = lock(memo).get(events) {
            tracing::trace!(kind, events = events.len(), "Aggregate cache hit");
            return hit;
        }
        let value = Arc::new(compute(&self.store, events));
        tracing::debug!(kind, events = events.len(), "Aggregate computed");
        lock(memo).insert(events.clone(), Arc::clone(&value));
        value
    }

    /// Country rollups in first-seen order.
    pub fn by_country(&self, events: &EventSet) -> Arc<Vec<CountryAggregate>> {
        self.memoized(&self.countries, "country", events, country::aggregate)
    }

    /// Casualties per year, ascending.
    pub fn by_year(&self, events: &EventSet) -> Arc<Vec<YearTotal>> {
        self.memoized(&self.years, "year", events, series::by_year)
    }

    /// Year x month grid covering every month of every year in range.
    pub fn by_month(&self, events: &EventSet) -> Arc<Vec<MonthCell>> {
        self.memoized(&self.months, "month", events, series::by_month)
    }

    /// Month-of-year totals, always 12 entries.
    pub fn by_season(&self, events: &EventSet) -> Arc<Vec<SeasonTotal>> {
        self.memoized(&self.seasons, "season", events, series::by_season)
    }

    pub fn by_violence_type(&self, events: &EventSet) -> Arc<Vec<ViolenceTypeTotal>> {
        self.memoized(
            &self.violence_types,
            "violence_type",
            events,
            series::by_violence_type,
        )
    }

    pub fn by_region(&self, events: &EventSet) -> Arc<Vec<RegionTotal>> {
        self.memoized(&self.regions, "region", events, series::by_region)
    }

    /// Faction rollups, most own-side casualties first.
    pub fn faction_rollup(&self, events: &EventSet) -> Arc<Vec<FactionAggregate>> {
        self.memoized(&self.factions, "faction", events, faction::rollup)
    }

    pub fn faction_graph(&self, events: &EventSet, min_events: usize) -> FactionGraph {
        let rollup = self.faction_rollup(events);
        faction::graph(&self.store, events, &rollup, min_events)
    }

    pub fn overview(&self, events: &EventSet) -> Arc<DatasetOverview> {
        self.memoized(&self.overview, "overview", events, overview::summarize)
    }

    /// The `n` deadliest events; equal `best` keeps input order.
    pub fn top_events(&self, events: &EventSet, n: usize) -> Vec<EventIdx> {
        ranking::top_events(&self.store, events, n)
    }

    /// The `n` countries with most casualties; ties keep first-seen order.
    pub fn top_countries(&self, events: &EventSet, n: usize) -> Vec<CountryAggregate> {
        ranking::top_countries(&self.by_country(events), n)
    }

    pub fn clear_cache(&self) {
        lock(&self.countries).clear();
        lock(&self.years).clear();
        lock(&self.months).clear();
        lock(&self.seasons).clear();
        lock(&self.violence_types).clear();
        lock(&self.regions).clear();
        lock(&self.factions).clear();
        lock(&self.overview).clear();
    }

    /// Combined counters of every aggregate memo.
    pub fn cache_stats(&self) -> CacheStats {
        [
            lock(&self.countries).stats(),
            lock(&self.years).stats(),
            lock(&self.months).stats(),
            lock(&self.seasons).stats(),
            lock(&self.violence_types).stats(),
            lock(&self.regions).stats(),
            lock(&self.factions).stats(),
            lock(&self.overview).stats(),
        ]
        .into_iter()
        .fold(CacheStats::default(), merge_stats)
    }
}
