use std::cmp::Reverse;

use super::CountryAggregate;
use crate::dataset::{EventIdx, EventSet, EventStore};

pub(super) fn top_events(store: &EventStore, events: &EventSet, n: usize) -> Vec<EventIdx> {
    let mut ranked: Vec<(EventIdx, u32)> = store
        .select(events)
        .map(|(idx, e)| (idx, e.best))
        .collect();
    // sort_by_key is stable, so equal estimates keep input order
    ranked.sort_by_key(|&(_, best)| Reverse(best));
    ranked.truncate(n);
    ranked.into_iter().map(|(idx, _)| idx).collect()
}

pub(super) fn top_countries(countries: &[CountryAggregate], n: usize) -> Vec<CountryAggregate> {
    let mut ranked: Vec<&CountryAggregate> = countries.iter().collect();
    ranked.sort_by_key(|c| Reverse(c.total_casualties));
    ranked.into_iter().take(n).cloned().collect()
}
