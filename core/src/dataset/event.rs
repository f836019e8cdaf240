use conflux_types::{Coordinates, ViolenceType};
use serde::Serialize;

use crate::context::IStr;

/// Position of an event in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventIdx(pub u32);

impl EventIdx {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Fatalities split by who died. Expected to sum to `best`, not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deaths {
    pub side_a: u32,
    pub side_b: u32,
    pub civilians: u32,
    pub unknown: u32,
}

impl Deaths {
    pub fn total(&self) -> u64 {
        self.side_a as u64 + self.side_b as u64 + self.civilians as u64 + self.unknown as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

#[derive(Debug, Clone)]
pub struct ConflictEvent {
    /// Source identifier, or the input row number when the source had none
    pub id: String,
    pub year: i32,
    /// 1..=12, None when date_start is missing or unparseable
    pub month: Option<u8>,
    pub date_start: Option<String>,
    pub country: IStr,
    pub region: IStr,
    /// Only present when both latitude and longitude parsed
    pub coordinates: Option<Coordinates>,
    pub violence_type: ViolenceType,
    pub side_a: Option<IStr>,
    pub side_b: Option<IStr>,
    pub dyad_name: Option<IStr>,
    /// Fatality point estimate, always > 0 for stored events
    pub best: u32,
    pub low: u32,
    pub high: u32,
    pub deaths: Deaths,
    pub where_description: Option<String>,
    pub source_headline: Option<String>,
    pub source_article: Option<String>,
}

impl ConflictEvent {
    #[inline]
    pub fn casualties(&self) -> u64 {
        self.best as u64
    }

    pub fn side(&self, side: Side) -> Option<IStr> {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    /// True if the faction appears as side A or side B.
    pub fn involves(&self, faction: IStr) -> bool {
        self.side_a == Some(faction) || self.side_b == Some(faction)
    }
}

/// One faction's part in one event.
///
/// Derived at load time, up to two per event (side A and side B). The
/// casualties are that side's own deaths, not the event total, so the same
/// event feeds two faction rollups with different figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionParticipation {
    pub event: EventIdx,
    pub faction: IStr,
    pub side: Side,
    pub casualties: u32,
}
