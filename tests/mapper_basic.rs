#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tournee::mapper::{map_all, map_scheduler, MapError, RawScheduler, SchedulerPivot};
use tournee::model::EventSchedule;

fn raw(id: &str, is_recurring: &str) -> RawScheduler {
    RawScheduler {
        id: id.to_string(),
        client_id: "c1".to_string(),
        title: "Alice Johnson".to_string(),
        start_date: "2026-01-19".to_string(),
        end_date: "2026-01-19".to_string(),
        start_time: "09:00:00".to_string(),
        end_time: "17:00:00".to_string(),
        is_recurring: is_recurring.to_string(),
        pivot: SchedulerPivot {
            carer_id: "k1".to_string(),
            scheduler_id: id.to_string(),
        },
    }
}

#[test]
fn recurring_record_defaults_to_all_seven_weekdays() {
    let event = map_scheduler(&raw("77", "1")).unwrap();
    match event.schedule {
        EventSchedule::Recurring {
            days_of_week,
            start_time,
            end_time,
            start_recur,
        } => {
            assert_eq!(days_of_week, vec![0, 1, 2, 3, 4, 5, 6]);
            assert_eq!(start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
            assert_eq!(end_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
            // Pas de date de fin : récurrence ouverte.
            assert_eq!(start_recur, NaiveDate::from_ymd_opt(2026, 1, 19).unwrap());
        }
        other => panic!("expected recurring schedule, got {other:?}"),
    }
}

#[test]
fn single_record_combines_date_and_times_into_instants() {
    let event = map_scheduler(&raw("12", "0")).unwrap();
    match event.schedule {
        EventSchedule::Timed { start, end } => {
            let date = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
            assert_eq!(
                start,
                NaiveDateTime::new(date, NaiveTime::from_hms_opt(9, 0, 0).unwrap())
            );
            assert_eq!(
                end,
                NaiveDateTime::new(date, NaiveTime::from_hms_opt(17, 0, 0).unwrap())
            );
        }
        other => panic!("expected timed schedule, got {other:?}"),
    }
}

#[test]
fn displayed_id_is_stable_across_refetches() {
    let a = map_scheduler(&raw("77", "1")).unwrap();
    let b = map_scheduler(&raw("77", "1")).unwrap();
    assert_eq!(a.id, "77-2026-01-19");
    assert_eq!(a.id, b.id);
}

#[test]
fn ambiguous_recurrence_flag_is_fatal_to_the_record_only() {
    let err = map_scheduler(&raw("9", "2")).unwrap_err();
    assert!(matches!(err, MapError::AmbiguousRecurrence { .. }));

    let events = map_all(&[raw("9", "yes"), raw("10", "0"), raw("11", "1")]);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "10-2026-01-19");
}

#[test]
fn unparseable_dates_are_reported_per_record() {
    let mut bad = raw("5", "0");
    bad.start_date = "19/01/2026".to_string();
    assert!(matches!(
        map_scheduler(&bad).unwrap_err(),
        MapError::InvalidDate { .. }
    ));

    let mut bad_time = raw("6", "0");
    bad_time.end_time = "late".to_string();
    assert!(matches!(
        map_scheduler(&bad_time).unwrap_err(),
        MapError::InvalidTime { .. }
    ));
}

#[test]
fn carer_pivot_becomes_the_event_resource() {
    let event = map_scheduler(&raw("77", "0")).unwrap();
    assert_eq!(event.resource.unwrap().as_str(), "k1");
    assert_eq!(event.title, "Alice Johnson");
}
