use conflux_types::EventRecord;

use super::normalize::normalize_row;
use super::{ConflictEvent, EventIdx, EventSet, FactionParticipation, RawRow, Side};
use crate::context::{IStr, StringTable, StringTableBuilder};

/// Normalized event list plus the string table its names resolve against.
///
/// Immutable after [`EventStore::load`]; a new dataset means a new store.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<ConflictEvent>,
    strings: StringTable,
    participations: Vec<FactionParticipation>,
    /// `participations[offsets[i]..offsets[i + 1]]` belong to event i
    participation_offsets: Vec<u32>,
    dropped_rows: usize,
}

impl EventStore {
    /// Normalize raw rows in input order. Rows with a non-positive fatality
    /// estimate are dropped.
    pub fn load<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut strings = StringTableBuilder::new();
        let mut events = Vec::new();
        let mut dropped_rows = 0;

        for (position, row) in rows.into_iter().enumerate() {
            match normalize_row(&row, position, &mut strings) {
                Some(event) => events.push(event),
                None => dropped_rows += 1,
            }
        }

        let mut participations = Vec::with_capacity(events.len() * 2);
        let mut participation_offsets = Vec::with_capacity(events.len() + 1);
        participation_offsets.push(0);
        for (i, event) in events.iter().enumerate() {
            let idx = EventIdx(i as u32);
            for (side, casualties) in [(Side::A, event.deaths.side_a), (Side::B, event.deaths.side_b)]
            {
                if let Some(faction) = event.side(side) {
                    participations.push(FactionParticipation {
                        event: idx,
                        faction,
                        side,
                        casualties,
                    });
                }
            }
            participation_offsets.push(participations.len() as u32);
        }

        let strings = strings.freeze();
        tracing::info!(
            events = events.len(),
            dropped_rows,
            names = strings.len(),
            "Event store loaded"
        );

        Self {
            events,
            strings,
            participations,
            participation_offsets,
            dropped_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Rows rejected at load because `best <= 0`.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Panics if `idx` did not come from this store.
    pub fn get(&self, idx: EventIdx) -> &ConflictEvent {
        &self.events[idx.as_usize()]
    }

    pub fn try_get(&self, idx: EventIdx) -> Option<&ConflictEvent> {
        self.events.get(idx.as_usize())
    }

    pub fn events(&self) -> &[ConflictEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventIdx, &ConflictEvent)> {
        self.events
            .iter()
            .enumerate()
            .map(|(i, e)| (EventIdx(i as u32), e))
    }

    /// Events of a set, in the set's order.
    pub fn select<'a>(
        &'a self,
        set: &'a EventSet,
    ) -> impl Iterator<Item = (EventIdx, &'a ConflictEvent)> + 'a {
        set.iter().map(move |idx| (idx, self.get(idx)))
    }

    /// Every position, in load order.
    pub fn all(&self) -> EventSet {
        (0..self.events.len() as u32).map(EventIdx).collect()
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn resolve(&self, key: IStr) -> &str {
        self.strings.resolve(key)
    }

    pub fn lookup(&self, name: &str) -> Option<IStr> {
        self.strings.get(name)
    }

    pub fn participations(&self) -> &[FactionParticipation] {
        &self.participations
    }

    pub fn participations_of(&self, idx: EventIdx) -> &[FactionParticipation] {
        let i = idx.as_usize();
        match (
            self.participation_offsets.get(i),
            self.participation_offsets.get(i + 1),
        ) {
            (Some(&start), Some(&end)) => &self.participations[start as usize..end as usize],
            _ => &[],
        }
    }

    /// Resolve an event into a plain record for display.
    pub fn record(&self, idx: EventIdx) -> EventRecord {
        let event = self.get(idx);
        let name = |key: Option<IStr>| key.map(|k| self.resolve(k).to_string());
        EventRecord {
            index: idx.0,
            id: event.id.clone(),
            year: event.year,
            month: event.month,
            date_start: event.date_start.clone(),
            country: self.resolve(event.country).to_string(),
            region: self.resolve(event.region).to_string(),
            coordinates: event.coordinates,
            violence_type_code: event.violence_type.code(),
            violence_type_name: event.violence_type.name().to_string(),
            side_a: name(event.side_a),
            side_b: name(event.side_b),
            dyad_name: name(event.dyad_name),
            best: event.best,
            low: event.low,
            high: event.high,
            deaths_a: event.deaths.side_a,
            deaths_b: event.deaths.side_b,
            deaths_civilians: event.deaths.civilians,
            deaths_unknown: event.deaths.unknown,
            where_description: event.where_description.clone(),
            source_headline: event.source_headline.clone(),
            source_article: event.source_article.clone(),
        }
    }

    pub fn records(&self, set: &EventSet) -> Vec<EventRecord> {
        set.iter().map(|idx| self.record(idx)).collect()
    }
}
