#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use std::fs;
use tournee::io;
use tournee::model::{Board, Resource, ResourceId, Visit, VisitId, VisitStatus};
use tournee::storage::{JsonStorage, Storage};

#[test]
fn resources_csv_reads_optional_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resources.csv");
    fs::write(
        &path,
        "id,title,initials,hours,color\n\
         k1,Makhdum,MD,37.5,#7cc4ff\n\
         k2,Iqra Gfalid,IG,,\n",
    )
    .unwrap();

    let resources = io::import_resources_csv(&path).unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0].title, "Makhdum");
    assert_eq!(resources[0].hours, Some(37.5));
    assert_eq!(resources[0].color.as_deref(), Some("#7cc4ff"));
    assert_eq!(resources[1].hours, None);
    assert_eq!(resources[1].color, None);
}

#[test]
fn visits_csv_keeps_the_vacant_slot_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visits.csv");
    fs::write(
        &path,
        "id,name,status,date,start,end,location,carer_id,visit_type\n\
         1,John Smith,Pending,2026-01-19,09:00,10:00,12 Rose St,k1,domestic\n\
         2,Emily Johnson,Vacant,2026-01-20,11:00,12:00,4 Vine Rd,,\n",
    )
    .unwrap();

    let visits = io::import_visits_csv(&path).unwrap();
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[0].carer, Some(ResourceId::new("k1")));
    assert_eq!(visits[0].visit_type.as_deref(), Some("domestic"));
    assert_eq!(visits[1].status, VisitStatus::Vacant);
    assert_eq!(visits[1].carer, None);
}

#[test]
fn unknown_status_in_csv_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("visits.csv");
    fs::write(
        &path,
        "id,name,status,date,start,end,location\n\
         1,John Smith,Paused,2026-01-19,09:00,10:00,12 Rose St\n",
    )
    .unwrap();

    let err = io::import_visits_csv(&path).unwrap_err();
    assert!(err.to_string().contains("unknown visit status"));
}

#[test]
fn board_survives_a_save_and_load_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.json");
    let storage = JsonStorage::open(&path).unwrap();

    let mut carer = Resource::new("Makhdum", "MD");
    carer.id = ResourceId::new("k1");
    let board = Board {
        resources: vec![carer],
        visits: vec![Visit {
            id: VisitId::new(1),
            name: "John Smith".to_string(),
            status: VisitStatus::Pending,
            date: NaiveDate::from_ymd_opt(2026, 1, 19).unwrap(),
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            location: "12 Rose St".to_string(),
            carer: Some(ResourceId::new("k1")),
            visit_type: None,
        }],
    };

    storage.save(&board).unwrap();
    let reloaded = storage.load().unwrap();
    assert_eq!(reloaded.resources, board.resources);
    assert_eq!(reloaded.visits, board.visits);
}

#[test]
fn missing_board_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("absent.json")).unwrap();
    let board = storage.load_or_empty().unwrap();
    assert!(board.resources.is_empty());
    assert!(board.visits.is_empty());
    // load() strict, lui, refuse un fichier absent.
    assert!(storage.load().is_err());
}
