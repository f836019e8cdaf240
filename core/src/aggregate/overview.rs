use conflux_types::CasualtyBreakdown;
use hashbrown::HashSet;

use super::DatasetOverview;
use crate::context::IStr;
use crate::dataset::{EventIdx, EventSet, EventStore};

pub(super) fn summarize(store: &EventStore, events: &EventSet) -> DatasetOverview {
    let mut total_casualties = 0u64;
    let mut low_total = 0u64;
    let mut high_total = 0u64;
    let mut breakdown = CasualtyBreakdown::default();
    let mut years: Option<(i32, i32)> = None;
    let mut countries: HashSet<IStr> = HashSet::new();
    let mut factions: HashSet<IStr> = HashSet::new();
    let mut deadliest: Option<(EventIdx, u32)> = None;

    for (idx, event) in store.select(events) {
        total_casualties += event.casualties();
        low_total += u64::from(event.low);
        high_total += u64::from(event.high);

        breakdown.side_a += u64::from(event.deaths.side_a);
        breakdown.side_b += u64::from(event.deaths.side_b);
        breakdown.civilians += u64::from(event.deaths.civilians);
        breakdown.unknown += u64::from(event.deaths.unknown);

        years = Some(match years {
            Some((lo, hi)) => (lo.min(event.year), hi.max(event.year)),
            None => (event.year, event.year),
        });
        countries.insert(event.country);
        factions.extend(event.side_a);
        factions.extend(event.side_b);

        if deadliest.is_none_or(|(_, best)| event.best > best) {
            deadliest = Some((idx, event.best));
        }
    }

    let total_events = events.len();
    DatasetOverview {
        total_events,
        total_casualties,
        low_total,
        high_total,
        breakdown,
        first_year: years.map(|(lo, _)| lo),
        last_year: years.map(|(_, hi)| hi),
        countries: countries.len(),
        factions: factions.len(),
        deadliest_event: deadliest.map(|(idx, _)| idx),
        mean_casualties: if total_events == 0 {
            0.0
        } else {
            total_casualties as f64 / total_events as f64
        },
    }
}
