use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use super::*;
use crate::dataset::EventStore;
use crate::dataset::columns::column;

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

#[test]
fn test_format_from_extension() {
    assert_eq!(
        SourceFormat::from_path(Path::new("events.CSV")).unwrap(),
        SourceFormat::Csv
    );
    assert_eq!(
        SourceFormat::from_path(Path::new("a/b/events.json")).unwrap(),
        SourceFormat::Json
    );
    assert!(matches!(
        SourceFormat::from_path(Path::new("events.parquet")),
        Err(SourceError::UnsupportedFormat { .. })
    ));
    assert!(SourceFormat::from_path(Path::new("events")).is_err());
}

#[test]
fn test_csv_rows_feed_the_store() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "ged.csv",
        b"\xEF\xBB\xBFid,year,date_start,country,region,type_of_violence,side_a,side_b,best,deaths_a,deaths_b,where_description\r\n\
          1,2001,2001-04-02,Somalia,Africa,1,Government of Somalia,Al-Shabaab,12,5,7,\"Mogadishu, Banaadir\"\r\n\
          2,2002,2002-06-10,Peru,Americas,3,Shining Path,Civilians,0,0,0,Ayacucho\r\n\
          \r\n\
          3,2003,,Sudan,Africa,2,,,4,0,0,\"says \"\"north\"\"\nof town\"\r\n",
    );

    let rows = load_rows(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get(column::ID), Some("1"));
    assert_eq!(rows[0].get(column::WHERE_DESCRIPTION), Some("Mogadishu, Banaadir"));
    assert_eq!(
        rows[2].get(column::WHERE_DESCRIPTION),
        Some("says \"north\"\nof town")
    );

    let store = EventStore::load(rows);
    assert_eq!(store.len(), 2);
    assert_eq!(store.dropped_rows(), 1);
    let first = store.record(crate::dataset::EventIdx(0));
    assert_eq!(first.country, "Somalia");
    assert_eq!(first.month, Some(4));
    assert_eq!(first.side_b.as_deref(), Some("Al-Shabaab"));
}

#[test]
fn test_csv_short_records_and_aliases() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "short.csv",
        b"country,dateStart,sideA,best,extra\nChad,2010-01-05,FACT,3\nMali,2011-02-01,JNIM,2,x,y\n",
    );
    let rows = load_rows(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(column::DATE_START), Some("2010-01-05"));
    assert_eq!(rows[0].get(column::SIDE_A), Some("FACT"));
    assert_eq!(rows[0].get("extra"), None);
    assert_eq!(rows[1].get("extra"), Some("x"));
    assert_eq!(rows[1].len(), 5);
}

#[test]
fn test_csv_errors() {
    let dir = TempDir::new().unwrap();

    let empty = write_file(&dir, "empty.csv", b"");
    assert!(matches!(
        load_rows(&empty),
        Err(SourceError::MissingHeader { .. })
    ));

    let blank = write_file(&dir, "blank.csv", b"\r\n\n");
    assert!(matches!(
        load_rows(&blank),
        Err(SourceError::MissingHeader { .. })
    ));

    let open = write_file(&dir, "open.csv", b"a,b\n1,\"never closed\n");
    assert!(matches!(
        load_rows(&open),
        Err(SourceError::UnterminatedQuote { record: 2, .. })
    ));

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        load_rows(&missing),
        Err(SourceError::OpenFile { .. })
    ));
}

#[test]
fn test_header_only_csv_has_no_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "header.csv", b"id,country,best\n");
    assert!(load_rows(&path).unwrap().is_empty());
}

#[test]
fn test_json_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "ged.json",
        br#"[
            {"id": 7, "year": 1999, "country": "Colombia", "sideA": "FARC", "best": 3.0, "latitude": null},
            {"id": "8", "country": "Peru", "best": "0", "flag": true}
        ]"#,
    );
    let rows = load_rows(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get(column::ID), Some("7"));
    assert_eq!(rows[0].get(column::SIDE_A), Some("FARC"));
    assert_eq!(rows[0].get(column::BEST), Some("3.0"));
    assert_eq!(rows[0].get(column::LATITUDE), None);
    assert_eq!(rows[1].get("flag"), Some("true"));

    let store = EventStore::load(rows);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(crate::dataset::EventIdx(0)).best, 3);
}

#[test]
fn test_json_must_be_array_of_objects() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.json", br#"{"events": []}"#);
    assert!(matches!(load_rows(&path), Err(SourceError::Json { .. })));
}
