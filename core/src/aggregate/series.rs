//! Time and category series for the statistics page.

use std::collections::{BTreeMap, BTreeSet};

use conflux_types::{
    MonthCell, RegionTotal, SeasonTotal, TypeTally, ViolenceType, ViolenceTypeTotal, YearTotal,
};
use hashbrown::{HashMap, HashSet};

use crate::context::IStr;
use crate::dataset::{EventSet, EventStore};

pub(super) fn by_year(store: &EventStore, events: &EventSet) -> Vec<YearTotal> {
    let mut years: BTreeMap<i32, TypeTally> = BTreeMap::new();
    for (_, event) in store.select(events) {
        years.entry(event.year).or_default().add(event.casualties());
    }
    years
        .into_iter()
        .map(|(year, tally)| YearTotal {
            year,
            events: tally.count,
            casualties: tally.casualties,
        })
        .collect()
}

/// Twelve zero-filled cells for every year present in the subset. Events
/// without a month still make their year appear but add to no cell.
pub(super) fn by_month(store: &EventStore, events: &EventSet) -> Vec<MonthCell> {
    let mut cells: HashMap<(i32, u8), TypeTally> = HashMap::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();

    for (_, event) in store.select(events) {
        years.insert(event.year);
        if let Some(month) = event.month {
            cells
                .entry((event.year, month))
                .or_default()
                .add(event.casualties());
        }
    }

    years
        .into_iter()
        .flat_map(|year| (1..=12u8).map(move |month| (year, month)))
        .map(|(year, month)| {
            let tally = cells.get(&(year, month)).copied().unwrap_or_default();
            MonthCell {
                year,
                month,
                events: tally.count,
                casualties: tally.casualties,
            }
        })
        .collect()
}

pub(super) fn by_season(store: &EventStore, events: &EventSet) -> Vec<SeasonTotal> {
    let mut months = [TypeTally::default(); 12];
    for (_, event) in store.select(events) {
        if let Some(month) = event.month {
            months[usize::from(month) - 1].add(event.casualties());
        }
    }
    months
        .into_iter()
        .zip(1u8..)
        .map(|(tally, month)| SeasonTotal {
            month,
            events: tally.count,
            casualties: tally.casualties,
        })
        .collect()
}

/// Types present in the subset, in [`ViolenceType::ALL`] order.
pub(super) fn by_violence_type(store: &EventStore, events: &EventSet) -> Vec<ViolenceTypeTotal> {
    let mut tallies: BTreeMap<ViolenceType, TypeTally> = BTreeMap::new();
    for (_, event) in store.select(events) {
        tallies
            .entry(event.violence_type)
            .or_default()
            .add(event.casualties());
    }
    tallies
        .into_iter()
        .map(|(violence_type, tally)| ViolenceTypeTotal {
            violence_type,
            events: tally.count,
            casualties: tally.casualties,
        })
        .collect()
}

/// Regions in first-seen order.
pub(super) fn by_region(store: &EventStore, events: &EventSet) -> Vec<RegionTotal> {
    let mut slots: HashMap<IStr, usize> = HashMap::new();
    let mut totals: Vec<(IStr, TypeTally, HashSet<IStr>)> = Vec::new();

    for (_, event) in store.select(events) {
        let slot = *slots.entry(event.region).or_insert_with(|| {
            totals.push((event.region, TypeTally::default(), HashSet::new()));
            totals.len() - 1
        });
        let (_, tally, countries) = &mut totals[slot];
        tally.add(event.casualties());
        countries.insert(event.country);
    }

    totals
        .into_iter()
        .map(|(region, tally, countries)| RegionTotal {
            region: store.resolve(region).to_string(),
            events: tally.count,
            casualties: tally.casualties,
            countries: countries.len(),
        })
        .collect()
}
