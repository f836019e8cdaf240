use chrono::{Datelike, NaiveDate};
use conflux_types::{Coordinates, ViolenceType};

use super::columns::column;
use super::{ConflictEvent, Deaths, RawRow};
use crate::context::StringTableBuilder;

/// Sentinel for missing country/region names.
pub const UNKNOWN: &str = "Unknown";

/// Integer coercion. Accepts plain integers and decimal strings ("12.0"),
/// truncating toward zero. Anything else is None.
fn parse_int(value: Option<&str>) -> Option<i64> {
    let s = value?;
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Non-negative count; missing, unparseable and negative values become 0.
fn parse_count(value: Option<&str>) -> u32 {
    parse_int(value)
        .map(|n| n.clamp(0, u32::MAX as i64) as u32)
        .unwrap_or_default()
}

fn parse_float(value: Option<&str>) -> Option<f64> {
    value?.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // "2017-07-31" or "2017-07-31 00:00:00.000" / RFC 3339
    if let Some(prefix) = raw.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        return Some(date);
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok()
}

/// Month (1..=12) of a start date, or None if the date does not parse.
pub fn parse_month(raw: &str) -> Option<u8> {
    parse_date(raw.trim()).map(|d| d.month() as u8)
}

/// Coerce one raw row into an event.
///
/// Returns None for rows whose fatality estimate is not positive; every
/// other defect degrades to a default (0, absent, or [`UNKNOWN`]).
pub(super) fn normalize_row(
    row: &RawRow,
    position: usize,
    strings: &mut StringTableBuilder,
) -> Option<ConflictEvent> {
    let best = parse_int(row.get(column::BEST)).unwrap_or_default();
    if best <= 0 {
        return None;
    }
    let best = best.min(u32::MAX as i64) as u32;

    let date_start = row.get(column::DATE_START).map(String::from);
    let date = date_start.as_deref().and_then(parse_date);
    let year = parse_int(row.get(column::YEAR))
        .and_then(|y| i32::try_from(y).ok())
        .or_else(|| date.map(|d| d.year()))
        .unwrap_or_default();

    let coordinates = match (
        parse_float(row.get(column::LATITUDE)),
        parse_float(row.get(column::LONGITUDE)),
    ) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        _ => None,
    };

    let violence_type =
        ViolenceType::from_code(parse_int(row.get(column::TYPE_OF_VIOLENCE)).unwrap_or_default());

    let mut intern_opt = |col: &str| row.get(col).map(|s| strings.intern(s));
    let side_a = intern_opt(column::SIDE_A);
    let side_b = intern_opt(column::SIDE_B);
    let dyad_name = intern_opt(column::DYAD_NAME);
    let country = strings.intern(row.get(column::COUNTRY).unwrap_or(UNKNOWN));
    let region = strings.intern(row.get(column::REGION).unwrap_or(UNKNOWN));

    Some(ConflictEvent {
        id: row
            .get(column::ID)
            .map(String::from)
            .unwrap_or_else(|| position.to_string()),
        year,
        month: date.map(|d| d.month() as u8),
        date_start,
        country,
        region,
        coordinates,
        violence_type,
        side_a,
        side_b,
        dyad_name,
        best,
        low: parse_count(row.get(column::LOW)),
        high: parse_count(row.get(column::HIGH)),
        deaths: Deaths {
            side_a: parse_count(row.get(column::DEATHS_A)),
            side_b: parse_count(row.get(column::DEATHS_B)),
            civilians: parse_count(row.get(column::DEATHS_CIVILIANS)),
            unknown: parse_count(row.get(column::DEATHS_UNKNOWN)),
        },
        where_description: row.get(column::WHERE_DESCRIPTION).map(String::from),
        source_headline: row.get(column::SOURCE_HEADLINE).map(String::from),
        source_article: row.get(column::SOURCE_ARTICLE).map(String::from),
    })
}
