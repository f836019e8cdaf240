pub mod aggregate;
pub mod cache;
pub mod context;
pub mod dashboard;
pub mod dataset;
pub mod index;
pub mod query;
pub mod source;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use aggregate::{
    AggregateEngine, CountryAggregate, DatasetOverview, FactionAggregate, FactionGraph,
    FactionLink,
};
pub use cache::BoundedCache;
pub use context::{ConfigError, DashboardConfigExt, IStr, StringTable};
pub use dashboard::{Dashboard, DashboardCacheStats};
pub use dataset::{
    ConflictEvent, Deaths, EventIdx, EventSet, EventStore, FactionParticipation, RawRow, Side,
};
pub use index::{IndexSummary, Indices};
pub use query::{BaseIndex, QueryEngine};
pub use source::{SourceError, SourceFormat, load_rows};

pub use conflux_types::{
    CachePolicy, CacheStats, CasualtyBreakdown, Coordinates, DashboardConfig, EventFilter,
    EventRecord, MonthCell, RegionTotal, SeasonTotal, TypeTally, ViewMode, ViewState,
    ViolenceType, ViolenceTypeTotal, YearTotal,
};
