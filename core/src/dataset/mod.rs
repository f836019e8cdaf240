//! Event store: normalized, immutable conflict events.
//!
//! Raw key/value rows go in once through [`EventStore::load`]; after that the
//! store is never mutated. Everything else in the crate refers to events by
//! [`EventIdx`] (position in load order).

pub mod columns;
mod event;
mod event_set;
mod normalize;
mod raw_row;
mod store;

#[cfg(test)]
mod tests;

pub use event::{ConflictEvent, Deaths, EventIdx, FactionParticipation, Side};
pub use event_set::EventSet;
pub use normalize::{UNKNOWN, parse_month};
pub use raw_row::RawRow;
pub use store::EventStore;
