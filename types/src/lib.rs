//! Shared types for conflux
//!
//! This crate contains the serializable types exchanged between the data core
//! (conflux-core) and the views that render it: the filter specification,
//! aggregate series rows, the view-state contract and the dashboard config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write;

// ─────────────────────────────────────────────────────────────────────────────
// Violence Type
// ─────────────────────────────────────────────────────────────────────────────

/// Category of organized violence an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ViolenceType {
    StateBased,
    NonState,
    OneSided,
    #[default]
    Unknown,
}

impl ViolenceType {
    pub const ALL: [ViolenceType; 4] = [
        ViolenceType::StateBased,
        ViolenceType::NonState,
        ViolenceType::OneSided,
        ViolenceType::Unknown,
    ];

    /// Resolve the numeric `type_of_violence` code. Codes outside 1..=3 are Unknown.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ViolenceType::StateBased,
            2 => ViolenceType::NonState,
            3 => ViolenceType::OneSided,
            _ => ViolenceType::Unknown,
        }
    }

    pub fn code(&self) -> Option<u8> {
        match self {
            ViolenceType::StateBased => Some(1),
            ViolenceType::NonState => Some(2),
            ViolenceType::OneSided => Some(3),
            ViolenceType::Unknown => None,
        }
    }

    /// Display name, also the value matched by the violence-type filter.
    pub fn name(&self) -> &'static str {
        match self {
            ViolenceType::StateBased => "State-based conflict",
            ViolenceType::NonState => "Non-state conflict",
            ViolenceType::OneSided => "One-sided violence",
            ViolenceType::Unknown => "Unknown",
        }
    }

    /// Exact, case-sensitive match against [`ViolenceType::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event Filter
// ─────────────────────────────────────────────────────────────────────────────

/// Filter specification passed by views on every query.
///
/// Unknown keys are ignored when deserializing, and every field is optional.
/// `year` keeps events up to and including that year (time slider semantics).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventFilter {
    pub year: Option<i32>,
    /// Empty set means no region constraint
    pub regions: BTreeSet<String>,
    pub country: Option<String>,
    pub faction: Option<String>,
    pub violence_type: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.regions.insert(region.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn with_violence_type(mut self, violence_type: impl Into<String>) -> Self {
        self.violence_type = Some(violence_type.into());
        self
    }

    pub fn country(&self) -> Option<&str> {
        non_empty(&self.country)
    }

    pub fn faction(&self) -> Option<&str> {
        non_empty(&self.faction)
    }

    pub fn violence_type(&self) -> Option<&str> {
        non_empty(&self.violence_type)
    }

    /// True when the filter constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.regions.is_empty()
            && self.country().is_none()
            && self.faction().is_none()
            && self.violence_type().is_none()
    }

    /// Stable cache key. Fields are written in a fixed order and regions are
    /// already sorted, so two equal filters always produce the same key no
    /// matter how they were built. Empty strings are treated as absent.
    pub fn canonical_key(&self) -> String {
        let mut key = String::with_capacity(96);
        let _ = write!(
            key,
            "year={:?};regions={:?};country={:?};faction={:?};type={:?}",
            self.year,
            self.regions,
            self.country(),
            self.faction(),
            self.violence_type(),
        );
        key
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate Result Types (shared between core and views)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Event count and casualty sum for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeTally {
    pub count: usize,
    pub casualties: u64,
}

impl TypeTally {
    pub fn add(&mut self, casualties: u64) {
        self.count += 1;
        self.casualties += casualties;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub events: usize,
    pub casualties: u64,
}

/// One cell of the year x month heatmap grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCell {
    pub year: i32,
    /// 1..=12
    pub month: u8,
    pub events: usize,
    pub casualties: u64,
}

/// Month-of-year total across all years (seasonality).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTotal {
    pub month: u8,
    pub events: usize,
    pub casualties: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolenceTypeTotal {
    pub violence_type: ViolenceType,
    pub events: usize,
    pub casualties: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotal {
    pub region: String,
    pub events: usize,
    pub casualties: u64,
    /// Distinct countries contributing to the region
    pub countries: usize,
}

/// Fatalities split by who died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CasualtyBreakdown {
    pub side_a: u64,
    pub side_b: u64,
    pub civilians: u64,
    pub unknown: u64,
}

/// Plain, fully-resolved event for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Position in load order
    pub index: u32,
    pub id: String,
    pub year: i32,
    pub month: Option<u8>,
    pub date_start: Option<String>,
    pub country: String,
    pub region: String,
    pub coordinates: Option<Coordinates>,
    pub violence_type_code: Option<u8>,
    pub violence_type_name: String,
    pub side_a: Option<String>,
    pub side_b: Option<String>,
    pub dyad_name: Option<String>,
    pub best: u32,
    pub low: u32,
    pub high: u32,
    pub deaths_a: u32,
    pub deaths_b: u32,
    pub deaths_civilians: u32,
    pub deaths_unknown: u32,
    pub where_description: Option<String>,
    pub source_headline: Option<String>,
    pub source_article: Option<String>,
}

/// Hit/miss counters for a bounded cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// View State
// ─────────────────────────────────────────────────────────────────────────────

/// Which level of the drill-down the views are showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    World,
    Country,
    Faction,
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
struct Focus {
    mode: ViewMode,
    country: Option<String>,
    faction: Option<String>,
    event: Option<u32>,
}

/// Current selection of the surrounding application.
///
/// The core never reads this; views call [`ViewState::filter`] and pass the
/// result into every query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    focus: Focus,
    history: Vec<Focus>,
    pub year: Option<i32>,
    pub regions: BTreeSet<String>,
    pub violence_type: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.focus.mode
    }

    pub fn selected_country(&self) -> Option<&str> {
        self.focus.country.as_deref()
    }

    pub fn selected_faction(&self) -> Option<&str> {
        self.focus.faction.as_deref()
    }

    pub fn selected_event(&self) -> Option<u32> {
        self.focus.event
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn push(&mut self, next: Focus) {
        let previous = std::mem::replace(&mut self.focus, next);
        self.history.push(previous);
    }

    /// Drill into a country. Clears any faction focus.
    pub fn select_country(&mut self, country: impl Into<String>) {
        self.push(Focus {
            mode: ViewMode::Country,
            country: Some(country.into()),
            faction: None,
            event: None,
        });
    }

    /// Drill into a faction. Clears any country focus.
    pub fn select_faction(&mut self, faction: impl Into<String>) {
        self.push(Focus {
            mode: ViewMode::Faction,
            country: None,
            faction: Some(faction.into()),
            event: None,
        });
    }

    /// Focus a single event, keeping the country/faction context it was picked from.
    pub fn select_event(&mut self, index: u32) {
        let next = Focus {
            mode: ViewMode::Event,
            event: Some(index),
            ..self.focus.clone()
        };
        self.push(next);
    }

    /// Pop the navigation history. Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.focus = previous;
                true
            }
            None => false,
        }
    }

    /// Return to the world view and drop the history. Filters are kept.
    pub fn reset(&mut self) {
        self.focus = Focus::default();
        self.history.clear();
    }

    /// Toggle a region in the active region set. Returns true if it is now active.
    pub fn toggle_region(&mut self, region: &str) -> bool {
        if self.regions.remove(region) {
            false
        } else {
            self.regions.insert(region.to_string());
            true
        }
    }

    /// Filter tuple the views must supply to the core for the current selection.
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            year: self.year,
            regions: self.regions.clone(),
            country: self.focus.country.clone(),
            faction: self.focus.faction.clone(),
            violence_type: self.violence_type.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Eviction order for the bounded query/aggregate caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Evict the oldest inserted entry; hits do not refresh position
    #[default]
    InsertionOrder,
    /// Evict the least recently read or written entry
    LeastRecentlyUsed,
}

pub const DEFAULT_QUERY_CACHE_CAPACITY: usize = 128;
pub const DEFAULT_AGGREGATE_CACHE_CAPACITY: usize = 32;
pub const DEFAULT_TOP_N: usize = 10;

fn default_query_cache_capacity() -> usize {
    DEFAULT_QUERY_CACHE_CAPACITY
}

fn default_aggregate_cache_capacity() -> usize {
    DEFAULT_AGGREGATE_CACHE_CAPACITY
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Dataset loaded at startup (CSV or JSON)
    #[serde(default)]
    pub data_path: Option<String>,
    /// 0 disables the query cache
    #[serde(default = "default_query_cache_capacity")]
    pub query_cache_capacity: usize,
    /// 0 disables the aggregate caches
    #[serde(default = "default_aggregate_cache_capacity")]
    pub aggregate_cache_capacity: usize,
    #[serde(default)]
    pub cache_policy: CachePolicy,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            query_cache_capacity: DEFAULT_QUERY_CACHE_CAPACITY,
            aggregate_cache_capacity: DEFAULT_AGGREGATE_CACHE_CAPACITY,
            cache_policy: CachePolicy::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violence_type_codes() {
        assert_eq!(ViolenceType::from_code(1), ViolenceType::StateBased);
        assert_eq!(ViolenceType::from_code(3), ViolenceType::OneSided);
        assert_eq!(ViolenceType::from_code(0), ViolenceType::Unknown);
        assert_eq!(ViolenceType::from_code(9), ViolenceType::Unknown);
        assert_eq!(ViolenceType::Unknown.code(), None);
        assert_eq!(
            ViolenceType::from_name("Non-state conflict"),
            Some(ViolenceType::NonState)
        );
        assert_eq!(ViolenceType::from_name("non-state conflict"), None);
    }

    #[test]
    fn test_canonical_key_ignores_build_order() {
        let a = EventFilter::new()
            .with_year(5)
            .with_country("A")
            .with_region("Asia")
            .with_region("Africa");
        let b = EventFilter::new()
            .with_region("Africa")
            .with_country("A")
            .with_region("Asia")
            .with_year(5);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_canonical_key_from_permuted_json() {
        let a: EventFilter = serde_json::from_str(r#"{"year":5,"country":"A"}"#).unwrap();
        let b: EventFilter = serde_json::from_str(r#"{"country":"A","year":5}"#).unwrap();
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn test_unknown_filter_keys_ignored() {
        let f: EventFilter =
            serde_json::from_str(r#"{"country":"A","colour":"red","zoom":3}"#).unwrap();
        assert_eq!(f, EventFilter::new().with_country("A"));
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let f = EventFilter::new().with_country("").with_faction("");
        assert!(f.is_empty());
        assert_eq!(f.canonical_key(), EventFilter::new().canonical_key());
    }

    #[test]
    fn test_view_state_navigation() {
        let mut view = ViewState::new();
        view.year = Some(2001);
        view.select_country("Somalia");
        view.select_event(42);
        assert_eq!(view.mode(), ViewMode::Event);
        assert_eq!(view.selected_country(), Some("Somalia"));
        assert_eq!(view.filter().country.as_deref(), Some("Somalia"));

        assert!(view.back());
        assert_eq!(view.mode(), ViewMode::Country);
        assert_eq!(view.selected_event(), None);

        view.select_faction("Al-Shabaab");
        let filter = view.filter();
        assert_eq!(filter.country, None);
        assert_eq!(filter.faction.as_deref(), Some("Al-Shabaab"));
        assert_eq!(filter.year, Some(2001));

        assert!(view.back());
        assert!(view.back());
        assert_eq!(view.mode(), ViewMode::World);
        assert!(!view.back());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let cfg: DashboardConfig = serde_json::from_str(r#"{"top_n":5}"#).unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.query_cache_capacity, DEFAULT_QUERY_CACHE_CAPACITY);
        assert_eq!(cfg.cache_policy, CachePolicy::InsertionOrder);
    }
}
