use hashbrown::{HashMap, HashSet};

use super::{FactionAggregate, FactionGraph, FactionLink};
use crate::context::IStr;
use crate::dataset::{EventSet, EventStore, Side};

/// Per-faction activity from the participation records of `events`.
///
/// An event counts once toward `conflict_count` even when the same name is
/// on both sides; `casualties` adds each side's own deaths.
pub(super) fn rollup(store: &EventStore, events: &EventSet) -> Vec<FactionAggregate> {
    let mut slots: HashMap<IStr, usize> = HashMap::new();
    let mut factions: Vec<(IStr, FactionAggregate)> = Vec::new();

    for idx in events.iter() {
        let mut counted: Option<IStr> = None;
        for participation in store.participations_of(idx) {
            let slot = *slots.entry(participation.faction).or_insert_with(|| {
                let name = store.resolve(participation.faction).to_string();
                factions.push((
                    participation.faction,
                    FactionAggregate {
                        name,
                        conflict_count: 0,
                        casualties: 0,
                        as_side_a: 0,
                        as_side_b: 0,
                    },
                ));
                factions.len() - 1
            });
            let aggregate = &mut factions[slot].1;
            aggregate.casualties += u64::from(participation.casualties);
            match participation.side {
                Side::A => aggregate.as_side_a += 1,
                Side::B => aggregate.as_side_b += 1,
            }
            if counted != Some(participation.faction) {
                aggregate.conflict_count += 1;
                counted = Some(participation.faction);
            }
        }
    }

    let mut rollup: Vec<FactionAggregate> = factions.into_iter().map(|(_, f)| f).collect();
    // stable: equal casualties keep first-seen order
    rollup.sort_by(|a, b| b.casualties.cmp(&a.casualties));
    rollup
}

/// Undirected dyad graph. Pairs seen in fewer than `min_events` events are
/// dropped, and so are factions left without a link.
pub(super) fn graph(
    store: &EventStore,
    events: &EventSet,
    rollup: &[FactionAggregate],
    min_events: usize,
) -> FactionGraph {
    let mut slots: HashMap<(IStr, IStr), usize> = HashMap::new();
    let mut links: Vec<(IStr, IStr, usize, u64)> = Vec::new();

    for (_, event) in store.select(events) {
        let (Some(a), Some(b)) = (event.side_a, event.side_b) else {
            continue;
        };
        if a == b {
            continue;
        }
        let key = if store.resolve(a) <= store.resolve(b) {
            (a, b)
        } else {
            (b, a)
        };
        let slot = *slots.entry(key).or_insert_with(|| {
            links.push((a, b, 0, 0));
            links.len() - 1
        });
        let link = &mut links[slot];
        link.2 += 1;
        link.3 += event.casualties();
    }

    let links: Vec<FactionLink> = links
        .into_iter()
        .filter(|&(_, _, count, _)| count >= min_events)
        .map(|(a, b, count, casualties)| FactionLink {
            source: store.resolve(a).to_string(),
            target: store.resolve(b).to_string(),
            events: count,
            casualties,
        })
        .collect();

    let nodes: Vec<FactionAggregate> = {
        let linked: HashSet<&str> = links
            .iter()
            .flat_map(|l| [l.source.as_str(), l.target.as_str()])
            .collect();
        rollup
            .iter()
            .filter(|f| linked.contains(f.name.as_str()))
            .cloned()
            .collect()
    };

    tracing::debug!(
        nodes = nodes.len(),
        links = links.len(),
        min_events,
        "Faction graph built"
    );
    FactionGraph { nodes, links }
}
