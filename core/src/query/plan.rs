use std::borrow::Cow;

use conflux_types::{EventFilter, ViolenceType};

use crate::context::IStr;
use crate::dataset::{ConflictEvent, EventIdx, EventStore};
use crate::index::Indices;

/// Index bucket a query starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseIndex {
    Faction,
    Country,
    Region,
    ViolenceType,
    /// Cumulative year range; only chosen when no name field is set
    Year,
    All,
}

/// A filter with its names resolved to interned keys.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    base: BaseIndex,
    year: Option<i32>,
    /// Empty means unconstrained
    regions: Vec<IStr>,
    country: Option<IStr>,
    faction: Option<IStr>,
    violence_type: Option<ViolenceType>,
}

impl QueryPlan {
    /// Resolve names against the store. Returns None when some constrained
    /// field names a value no loaded event has, so nothing can match.
    pub fn resolve(filter: &EventFilter, store: &EventStore) -> Option<Self> {
        let country = match filter.country() {
            Some(name) => Some(store.lookup(name)?),
            None => None,
        };
        let faction = match filter.faction() {
            Some(name) => Some(store.lookup(name)?),
            None => None,
        };
        let violence_type = match filter.violence_type() {
            Some(name) => Some(ViolenceType::from_name(name)?),
            None => None,
        };
        let regions: Vec<IStr> = filter
            .regions
            .iter()
            .filter_map(|name| store.lookup(name))
            .collect();
        if !filter.regions.is_empty() && regions.is_empty() {
            return None;
        }

        let base = if faction.is_some() {
            BaseIndex::Faction
        } else if country.is_some() {
            BaseIndex::Country
        } else if !regions.is_empty() {
            BaseIndex::Region
        } else if violence_type.is_some() {
            BaseIndex::ViolenceType
        } else if filter.year.is_some() {
            BaseIndex::Year
        } else {
            BaseIndex::All
        };

        Some(Self {
            base,
            year: filter.year,
            regions,
            country,
            faction,
            violence_type,
        })
    }

    pub fn base(&self) -> BaseIndex {
        self.base
    }

    /// Positions of the base bucket in load order, or None for a full scan.
    pub fn base_bucket<'a>(&self, indices: &'a Indices) -> Option<Cow<'a, [EventIdx]>> {
        match self.base {
            BaseIndex::Faction => self.faction.map(|f| Cow::Borrowed(indices.faction(f))),
            BaseIndex::Country => self.country.map(|c| Cow::Borrowed(indices.country(c))),
            BaseIndex::Region => match self.regions.as_slice() {
                [single] => Some(Cow::Borrowed(indices.region(*single))),
                many => {
                    let mut merged: Vec<EventIdx> = many
                        .iter()
                        .flat_map(|r| indices.region(*r).iter().copied())
                        .collect();
                    merged.sort_unstable();
                    merged.dedup();
                    Some(Cow::Owned(merged))
                }
            },
            BaseIndex::ViolenceType => self
                .violence_type
                .map(|t| Cow::Borrowed(indices.violence_type(t))),
            BaseIndex::Year => self.year.map(|y| Cow::Owned(indices.up_to_year(y))),
            BaseIndex::All => None,
        }
    }

    /// Every field except the one the base bucket already guarantees.
    pub fn matches_residual(&self, event: &ConflictEvent) -> bool {
        (self.base == BaseIndex::Year || self.year.is_none_or(|y| event.year <= y))
            && (self.base == BaseIndex::Region
                || self.regions.is_empty()
                || self.regions.contains(&event.region))
            && (self.base == BaseIndex::Country || self.country.is_none_or(|c| event.country == c))
            && (self.base == BaseIndex::Faction || self.faction.is_none_or(|f| event.involves(f)))
            && (self.base == BaseIndex::ViolenceType
                || self.violence_type.is_none_or(|t| event.violence_type == t))
    }

    /// Full predicate, independent of the base.
    pub fn matches(&self, event: &ConflictEvent) -> bool {
        self.year.is_none_or(|y| event.year <= y)
            && (self.regions.is_empty() || self.regions.contains(&event.region))
            && self.country.is_none_or(|c| event.country == c)
            && self.faction.is_none_or(|f| event.involves(f))
            && self.violence_type.is_none_or(|t| event.violence_type == t)
    }
}
