//! Inverted indices over the event store.
//!
//! Built in one linear pass; every bucket lists positions in ascending load
//! order. Indices are never patched: a reloaded store gets a fresh build.

use std::collections::BTreeMap;

use conflux_types::ViolenceType;
use hashbrown::HashMap;

use crate::context::IStr;
use crate::dataset::{EventIdx, EventStore};


/// Bucket counts, for logging and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexSummary {
    pub events: usize,
    pub years: usize,
    pub regions: usize,
    pub countries: usize,
    pub violence_types: usize,
    pub factions: usize,
}

#[derive(Debug, Default)]
pub struct Indices {
    events: usize,
    by_year: BTreeMap<i32, Vec<EventIdx>>,
    by_region: HashMap<IStr, Vec<EventIdx>>,
    by_country: HashMap<IStr, Vec<EventIdx>>,
    by_violence_type: HashMap<ViolenceType, Vec<EventIdx>>,
    by_faction: HashMap<IStr, Vec<EventIdx>>,
}

impl Indices {
    pub fn build(store: &EventStore) -> Self {
        let mut indices = Indices {
            events: store.len(),
            ..Default::default()
        };

        for (idx, event) in store.iter() {
            indices.by_year.entry(event.year).or_default().push(idx);
            indices.by_region.entry(event.region).or_default().push(idx);
            indices.by_country.entry(event.country).or_default().push(idx);
            indices
                .by_violence_type
                .entry(event.violence_type)
                .or_default()
                .push(idx);

            for participation in store.participations_of(idx) {
                let bucket = indices.by_faction.entry(participation.faction).or_default();
                // same faction on both sides: one entry per event
                if bucket.last() != Some(&idx) {
                    bucket.push(idx);
                }
            }
        }

        let summary = indices.summary();
        tracing::debug!(
            events = summary.events,
            years = summary.years,
            regions = summary.regions,
            countries = summary.countries,
            factions = summary.factions,
            "Indices built"
        );
        indices
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            events: self.events,
            years: self.by_year.len(),
            regions: self.by_region.len(),
            countries: self.by_country.len(),
            violence_types: self.by_violence_type.len(),
            factions: self.by_faction.len(),
        }
    }

    /// Number of events the indices were built over.
    pub fn event_count(&self) -> usize {
        self.events
    }

    pub fn year(&self, year: i32) -> &[EventIdx] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn region(&self, region: IStr) -> &[EventIdx] {
        self.by_region.get(&region).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn country(&self, country: IStr) -> &[EventIdx] {
        self.by_country.get(&country).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn violence_type(&self, violence_type: ViolenceType) -> &[EventIdx] {
        self.by_violence_type
            .get(&violence_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn faction(&self, faction: IStr) -> &[EventIdx] {
        self.by_faction.get(&faction).map(Vec::as_slice).unwrap_or_default()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_year.keys().copied()
    }

    /// Events at or before `year`, in load order.
    pub fn up_to_year(&self, year: i32) -> Vec<EventIdx> {
        let mut positions: Vec<EventIdx> = self
            .by_year
            .range(..=year)
            .flat_map(|(_, bucket)| bucket.iter().copied())
            .collect();
        positions.sort_unstable();
        positions
    }

    pub fn countries(&self) -> impl Iterator<Item = (IStr, usize)> + '_ {
        self.by_country.iter().map(|(k, v)| (*k, v.len()))
    }

    pub fn regions(&self) -> impl Iterator<Item = (IStr, usize)> + '_ {
        self.by_region.iter().map(|(k, v)| (*k, v.len()))
    }

    pub fn factions(&self) -> impl Iterator<Item = (IStr, usize)> + '_ {
        self.by_faction.iter().map(|(k, v)| (*k, v.len()))
    }
}
