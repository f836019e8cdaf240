use super::columns::column;
use super::*;
use crate::test_support::{RowBuilder, row};
use conflux_types::ViolenceType;

#[test]
fn test_rows_with_non_positive_best_are_dropped() {
    let store = EventStore::load(vec![
        row("A", 2000, 10),
        row("A", 2000, 0),
        row("B", 2001, -3),
        RowBuilder::new().country("C").year(2002).build(),
        row("C", 2002, 4),
    ]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.dropped_rows(), 3);
    assert_eq!(store.resolve(store.get(EventIdx(1)).country), "C");
}

#[test]
fn test_load_order_is_preserved() {
    let store = EventStore::load(vec![row("B", 2001, 1), row("A", 2000, 2), row("C", 1999, 3)]);
    let countries: Vec<_> = store
        .iter()
        .map(|(_, e)| store.resolve(e.country))
        .collect();
    assert_eq!(countries, ["B", "A", "C"]);
}

#[test]
fn test_missing_fields_default() {
    let store = EventStore::load(vec![RowBuilder::new().best(5).build()]);
    let event = store.get(EventIdx(0));
    assert_eq!(event.year, 0);
    assert_eq!(event.month, None);
    assert_eq!(store.resolve(event.country), UNKNOWN);
    assert_eq!(store.resolve(event.region), UNKNOWN);
    assert_eq!(event.coordinates, None);
    assert_eq!(event.violence_type, ViolenceType::Unknown);
    assert_eq!(event.side_a, None);
    assert_eq!(event.deaths, Deaths::default());
    assert_eq!(event.low, 0);
    // synthesized from the input row number
    assert_eq!(event.id, "0");
}

#[test]
fn test_numeric_coercion() {
    let store = EventStore::load(vec![
        RowBuilder::new()
            .set(column::BEST, "12.0")
            .set(column::LOW, "-4")
            .set(column::HIGH, "abc")
            .set(column::DEATHS_A, " 7 ")
            .set(column::TYPE_OF_VIOLENCE, "2")
            .build(),
    ]);
    let event = store.get(EventIdx(0));
    assert_eq!(event.best, 12);
    assert_eq!(event.low, 0);
    assert_eq!(event.high, 0);
    assert_eq!(event.deaths.side_a, 7);
    assert_eq!(event.violence_type, ViolenceType::NonState);
    assert_eq!(event.violence_type.name(), "Non-state conflict");
}

#[test]
fn test_unknown_violence_code_maps_to_unknown() {
    let store = EventStore::load(vec![RowBuilder::new().best(1).violence(7).build()]);
    assert_eq!(store.get(EventIdx(0)).violence_type.name(), "Unknown");
}

#[test]
fn test_month_from_date_start() {
    let store = EventStore::load(vec![
        RowBuilder::new().best(1).date("2017-07-31 00:00:00.000").build(),
        RowBuilder::new().best(1).date("2012/03/05").build(),
        RowBuilder::new().best(1).date("sometime in spring").build(),
    ]);
    assert_eq!(store.get(EventIdx(0)).month, Some(7));
    assert_eq!(store.get(EventIdx(0)).year, 2017);
    assert_eq!(store.get(EventIdx(1)).month, Some(3));
    assert_eq!(store.get(EventIdx(2)).month, None);
    assert_eq!(
        store.get(EventIdx(2)).date_start.as_deref(),
        Some("sometime in spring")
    );
}

#[test]
fn test_explicit_year_wins_over_date() {
    let store = EventStore::load(vec![
        RowBuilder::new().best(1).year(1999).date("2001-01-01").build(),
    ]);
    assert_eq!(store.get(EventIdx(0)).year, 1999);
    assert_eq!(store.get(EventIdx(0)).month, Some(1));
}

#[test]
fn test_coordinates_require_both_values() {
    let store = EventStore::load(vec![
        RowBuilder::new().best(1).set(column::LATITUDE, "2.5").build(),
        RowBuilder::new().best(1).coords(2.5, 45.0).build(),
    ]);
    assert_eq!(store.get(EventIdx(0)).coordinates, None);
    let coords = store.get(EventIdx(1)).coordinates.unwrap();
    assert_eq!(coords.latitude, 2.5);
    assert_eq!(coords.longitude, 45.0);
}

#[test]
fn test_participations_carry_own_side_deaths() {
    let store = EventStore::load(vec![
        RowBuilder::new()
            .best(10)
            .sides("X", "Y")
            .deaths(3, 7, 0, 0)
            .build(),
        RowBuilder::new().best(2).set(column::SIDE_A, "X").build(),
        row("A", 2000, 1),
    ]);
    let x = store.lookup("X").unwrap();
    let y = store.lookup("Y").unwrap();

    let first = store.participations_of(EventIdx(0));
    assert_eq!(first.len(), 2);
    assert_eq!((first[0].faction, first[0].side, first[0].casualties), (x, Side::A, 3));
    assert_eq!((first[1].faction, first[1].side, first[1].casualties), (y, Side::B, 7));

    assert_eq!(store.participations_of(EventIdx(1)).len(), 1);
    assert!(store.participations_of(EventIdx(2)).is_empty());
    assert!(store.participations_of(EventIdx(99)).is_empty());
    assert_eq!(store.participations().len(), 3);
}

#[test]
fn test_death_mismatch_passes_through() {
    let store = EventStore::load(vec![RowBuilder::new().best(10).deaths(1, 1, 1, 1).build()]);
    let event = store.get(EventIdx(0));
    assert_eq!(event.best, 10);
    assert_eq!(event.deaths.total(), 4);
}

#[test]
fn test_record_resolves_names() {
    let store = EventStore::load(vec![
        RowBuilder::new()
            .set(column::ID, "ged-1")
            .country("Somalia")
            .region("Africa")
            .best(4)
            .violence(3)
            .sides("Al-Shabaab", "Civilians")
            .build(),
    ]);
    let record = store.record(EventIdx(0));
    assert_eq!(record.id, "ged-1");
    assert_eq!(record.country, "Somalia");
    assert_eq!(record.region, "Africa");
    assert_eq!(record.violence_type_code, Some(3));
    assert_eq!(record.violence_type_name, "One-sided violence");
    assert_eq!(record.side_a.as_deref(), Some("Al-Shabaab"));
    assert_eq!(record.dyad_name, None);
}

#[test]
fn test_camel_case_columns_accepted() {
    let row: RawRow = [
        ("country", "Iraq"),
        ("best", "3"),
        ("sideA", "Government of Iraq"),
        ("dateStart", "2004-11-08"),
    ]
    .into_iter()
    .collect();
    let store = EventStore::load(vec![row]);
    let event = store.get(EventIdx(0));
    assert_eq!(event.month, Some(11));
    assert_eq!(store.resolve(event.side_a.unwrap()), "Government of Iraq");
}
