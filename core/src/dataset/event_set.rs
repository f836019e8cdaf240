use std::sync::Arc;

use super::EventIdx;

/// Immutable, shared list of event positions.
///
/// Query results are always in load order. Cloning is a reference count
/// bump, so sets are cheap to hand to views and to use as cache keys; equality
/// and hashing compare the full position list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventSet(Arc<[EventIdx]>);

impl EventSet {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn from_positions(positions: Vec<EventIdx>) -> Self {
        Self(Arc::from(positions))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[EventIdx] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = EventIdx> + '_ {
        self.0.iter().copied()
    }

    pub fn first(&self) -> Option<EventIdx> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<EventIdx> {
        self.0.last().copied()
    }
}

impl Default for EventSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<EventIdx> for EventSet {
    fn from_iter<T: IntoIterator<Item = EventIdx>>(iter: T) -> Self {
        Self::from_positions(iter.into_iter().collect())
    }
}
