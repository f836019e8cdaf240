//! The explicit context views talk to: one store, its indices, and the two
//! memoizing engines, constructed together and replaced together.

use std::path::Path;
use std::sync::Arc;

use conflux_types::{
    CacheStats, DashboardConfig, EventFilter, EventRecord, MonthCell, RegionTotal, SeasonTotal,
    ViolenceTypeTotal, YearTotal,
};
use serde::Serialize;

use crate::aggregate::{
    AggregateEngine, CountryAggregate, DatasetOverview, FactionAggregate, FactionGraph,
};
use crate::dataset::{EventIdx, EventSet, EventStore, RawRow};
use crate::index::{IndexSummary, Indices};
use crate::query::QueryEngine;
use crate::source::{SourceError, load_rows};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardCacheStats {
    pub query: CacheStats,
    pub aggregate: CacheStats,
}

pub struct Dashboard {
    store: Arc<EventStore>,
    indices: Arc<Indices>,
    queries: QueryEngine,
    aggregates: AggregateEngine,
    config: DashboardConfig,
}

impl Dashboard {
    /// Normalize rows, build the indices and fresh caches.
    pub fn initialize<I>(rows: I, config: DashboardConfig) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        let store = Arc::new(EventStore::load(rows));
        let indices = Arc::new(Indices::build(&store));
        let queries = QueryEngine::new(
            Arc::clone(&store),
            Arc::clone(&indices),
            config.query_cache_capacity,
            config.cache_policy,
        );
        let aggregates = AggregateEngine::new(
            Arc::clone(&store),
            config.aggregate_cache_capacity,
            config.cache_policy,
        );
        Self {
            store,
            indices,
            queries,
            aggregates,
            config,
        }
    }

    /// Read a CSV or JSON file and initialize from it.
    pub fn open(path: &Path, config: DashboardConfig) -> Result<Self, SourceError> {
        let rows = load_rows(path)?;
        Ok(Self::initialize(rows, config))
    }

    /// Replace the dataset. Indices and both caches are rebuilt from scratch.
    pub fn reload<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = RawRow>,
    {
        *self = Self::initialize(rows, self.config.clone());
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn summary(&self) -> IndexSummary {
        self.indices.summary()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn filter(&self, filter: &EventFilter) -> EventSet {
        self.queries.filter(filter)
    }

    pub fn country_events(&self, country: &str, filter: &EventFilter) -> EventSet {
        self.queries.country_events(country, filter)
    }

    pub fn faction_events(&self, faction: &str, filter: &EventFilter) -> EventSet {
        self.queries.faction_events(faction, filter)
    }

    pub fn region_events(&self, region: &str, filter: &EventFilter) -> EventSet {
        self.queries.region_events(region, filter)
    }

    /// Distinct years for the slider, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        self.indices.years().collect()
    }

    pub fn record(&self, idx: EventIdx) -> Option<EventRecord> {
        self.store.try_get(idx).map(|_| self.store.record(idx))
    }

    pub fn records(&self, events: &EventSet) -> Vec<EventRecord> {
        self.store.records(events)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Aggregates
    // ─────────────────────────────────────────────────────────────────────────

    pub fn aggregate_by_country(&self, events: &EventSet) -> Arc<Vec<CountryAggregate>> {
        self.aggregates.by_country(events)
    }

    pub fn aggregate_by_year(&self, events: &EventSet) -> Arc<Vec<YearTotal>> {
        self.aggregates.by_year(events)
    }

    pub fn aggregate_by_month(&self, events: &EventSet) -> Arc<Vec<MonthCell>> {
        self.aggregates.by_month(events)
    }

    pub fn aggregate_by_season(&self, events: &EventSet) -> Arc<Vec<SeasonTotal>> {
        self.aggregates.by_season(events)
    }

    pub fn aggregate_by_violence_type(&self, events: &EventSet) -> Arc<Vec<ViolenceTypeTotal>> {
        self.aggregates.by_violence_type(events)
    }

    pub fn aggregate_by_region(&self, events: &EventSet) -> Arc<Vec<RegionTotal>> {
        self.aggregates.by_region(events)
    }

    pub fn faction_rollup(&self, events: &EventSet) -> Arc<Vec<FactionAggregate>> {
        self.aggregates.faction_rollup(events)
    }

    pub fn faction_graph(&self, events: &EventSet, min_events: usize) -> FactionGraph {
        self.aggregates.faction_graph(events, min_events)
    }

    pub fn overview(&self, events: &EventSet) -> Arc<DatasetOverview> {
        self.aggregates.overview(events)
    }

    pub fn top_events(&self, events: &EventSet, n: usize) -> Vec<EventIdx> {
        self.aggregates.top_events(events, n)
    }

    pub fn top_countries(&self, events: &EventSet, n: usize) -> Vec<CountryAggregate> {
        self.aggregates.top_countries(events, n)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Caches
    // ─────────────────────────────────────────────────────────────────────────

    /// Empty both caches. Results are unaffected.
    pub fn clear_cache(&self) {
        self.queries.clear_cache();
        self.aggregates.clear_cache();
        tracing::debug!("Dashboard caches cleared");
    }

    pub fn cache_stats(&self) -> DashboardCacheStats {
        DashboardCacheStats {
            query: self.queries.cache_stats(),
            aggregate: self.aggregates.cache_stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RowBuilder, row, synthetic_rows};

    #[test]
    fn test_end_to_end_scenario() {
        let dashboard = Dashboard::initialize(
            vec![row("A", 2000, 10), row("A", 2001, 5), row("B", 2000, 20)],
            DashboardConfig::default(),
        );
        let events = dashboard.filter(&EventFilter::new().with_year(2000));
        assert_eq!(events.len(), 2);

        let countries = dashboard.aggregate_by_country(&events);
        let totals: Vec<(&str, u64)> = countries
            .iter()
            .map(|c| (c.name.as_str(), c.total_casualties))
            .collect();
        assert_eq!(totals, vec![("A", 10), ("B", 20)]);
        assert_eq!(dashboard.available_years(), vec![2000, 2001]);
    }

    #[test]
    fn test_reload_rebuilds_everything() {
        let mut dashboard = Dashboard::initialize(synthetic_rows(200, 1), DashboardConfig::default());
        let filter = EventFilter::new().with_country("Somalia");
        dashboard.filter(&filter);
        assert_eq!(dashboard.cache_stats().query.entries, 1);

        dashboard.reload(vec![row("Somalia", 2001, 3)]);
        assert_eq!(dashboard.cache_stats().query.entries, 0);
        assert_eq!(dashboard.filter(&filter).len(), 1);
        assert_eq!(dashboard.summary().events, 1);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let config = DashboardConfig {
            query_cache_capacity: 0,
            aggregate_cache_capacity: 0,
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::initialize(synthetic_rows(50, 4), config);
        let events = dashboard.filter(&EventFilter::new());
        dashboard.filter(&EventFilter::new());
        dashboard.aggregate_by_year(&events);

        let stats = dashboard.cache_stats();
        assert_eq!(stats.query.entries, 0);
        assert_eq!(stats.query.hits, 0);
        assert_eq!(stats.aggregate.entries, 0);
    }

    #[test]
    fn test_record_lookup() {
        let dashboard = Dashboard::initialize(
            vec![RowBuilder::new().country("Peru").best(2).sides("X", "Y").build()],
            DashboardConfig::default(),
        );
        let record = dashboard.record(EventIdx(0)).unwrap();
        assert_eq!(record.country, "Peru");
        assert_eq!(record.side_b.as_deref(), Some("Y"));
        assert!(dashboard.record(EventIdx(5)).is_none());
    }

    #[test]
    fn test_clear_cache_keeps_results() {
        let dashboard = Dashboard::initialize(synthetic_rows(300, 6), DashboardConfig::default());
        let events = dashboard.filter(&EventFilter::new().with_region("Asia"));
        let before = dashboard.aggregate_by_country(&events);

        dashboard.clear_cache();
        let stats = dashboard.cache_stats();
        assert_eq!(stats.query.entries + stats.aggregate.entries, 0);

        let again = dashboard.filter(&EventFilter::new().with_region("Asia"));
        assert_eq!(again, events);
        assert_eq!(dashboard.aggregate_by_country(&again), before);
    }
}
