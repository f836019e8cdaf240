use std::collections::BTreeMap;

use conflux_types::{Coordinates, TypeTally, ViolenceType};
use hashbrown::HashMap;

use super::CountryAggregate;
use crate::context::IStr;
use crate::dataset::{EventIdx, EventSet, EventStore};

/// Running state for one country group.
struct Group {
    country: IStr,
    region: IStr,
    casualties: u64,
    composition: BTreeMap<ViolenceType, TypeTally>,
    deadliest: (EventIdx, u32),
    lat_sum: f64,
    lon_sum: f64,
    events: Vec<EventIdx>,
    events_with_coords: Vec<EventIdx>,
}

impl Group {
    fn new(country: IStr, region: IStr, first: EventIdx) -> Self {
        Self {
            country,
            region,
            casualties: 0,
            composition: BTreeMap::new(),
            deadliest: (first, 0),
            lat_sum: 0.0,
            lon_sum: 0.0,
            events: Vec::new(),
            events_with_coords: Vec::new(),
        }
    }

    fn finish(self, store: &EventStore) -> CountryAggregate {
        let located = self.events_with_coords.len();
        let coordinates = (located > 0).then(|| Coordinates {
            latitude: self.lat_sum / located as f64,
            longitude: self.lon_sum / located as f64,
        });
        CountryAggregate {
            name: store.resolve(self.country).to_string(),
            region: store.resolve(self.region).to_string(),
            total_casualties: self.casualties,
            total_events: self.events.len(),
            coordinates,
            type_composition: self.composition,
            deadliest_event: self.deadliest.0,
            events: self.events,
            events_with_coords: self.events_with_coords,
        }
    }
}

pub(super) fn aggregate(store: &EventStore, events: &EventSet) -> Vec<CountryAggregate> {
    let mut slots: HashMap<IStr, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for (idx, event) in store.select(events) {
        let slot = *slots.entry(event.country).or_insert_with(|| {
            groups.push(Group::new(event.country, event.region, idx));
            groups.len() - 1
        });
        let group = &mut groups[slot];

        group.casualties += event.casualties();
        group
            .composition
            .entry(event.violence_type)
            .or_default()
            .add(event.casualties());
        // strict comparison keeps the earliest on ties
        if event.best > group.deadliest.1 {
            group.deadliest = (idx, event.best);
        }
        if let Some(coords) = event.coordinates {
            group.lat_sum += coords.latitude;
            group.lon_sum += coords.longitude;
            group.events_with_coords.push(idx);
        }
        group.events.push(idx);
    }

    groups.into_iter().map(|g| g.finish(store)).collect()
}
