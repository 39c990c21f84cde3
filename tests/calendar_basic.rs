#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use tournee::calendar::{
    format_title, AnchorEngine, CalendarController, CalendarView, EventFilters, TimelineEngine,
};
use tournee::model::{Board, Resource, ResourceId, Visit, VisitId, VisitStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn resource(id: &str, title: &str, initials: &str) -> Resource {
    Resource {
        id: ResourceId::new(id),
        title: title.to_string(),
        initials: initials.to_string(),
        hours: Some(8.0),
        color: Some("teal".to_string()),
    }
}

fn visit(id: u64, day: NaiveDate, status: VisitStatus, visit_type: Option<&str>) -> Visit {
    Visit {
        id: VisitId::new(id),
        name: format!("Visit {id}"),
        status,
        date: day,
        start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        location: "2435".to_string(),
        carer: Some(ResourceId::new("k1")),
        visit_type: visit_type.map(str::to_string),
    }
}

fn sample_board() -> Board {
    // Semaine du lundi 19 janvier 2026.
    Board {
        resources: vec![
            resource("c1", "Alice Johnson", "AJ"),
            resource("c2", "Brian Smith", "BS"),
            resource("c3", "Charlotte Lee", "CL"),
        ],
        visits: vec![
            visit(1, date(2026, 1, 19), VisitStatus::Pending, Some("domestic")),
            visit(2, date(2026, 1, 21), VisitStatus::Cancelled, None),
            visit(
                3,
                date(2026, 1, 21),
                VisitStatus::Pending,
                Some("personal_care"),
            ),
            visit(4, date(2026, 2, 2), VisitStatus::Confirmed, None),
        ],
    }
}

fn week_controller() -> CalendarController<AnchorEngine, Board> {
    let today = date(2026, 1, 21);
    let engine = AnchorEngine::new(CalendarView::ResourceTimelineWeek, today);
    CalendarController::new(CalendarView::ResourceTimelineWeek, engine, sample_board()).unwrap()
}

#[test]
fn engine_is_source_of_truth_after_navigation() {
    let mut controller = week_controller();
    // La vue semaine ancre au lundi, pas au jour demandé.
    assert_eq!(controller.current_date(), date(2026, 1, 19));

    controller.go_to_next().unwrap();
    assert_eq!(controller.current_date(), date(2026, 1, 26));
    controller.go_to_previous().unwrap();
    controller.go_to_previous().unwrap();
    assert_eq!(controller.current_date(), date(2026, 1, 12));
    controller.go_to_today().unwrap();
    assert_eq!(controller.current_date(), date(2026, 1, 19));
}

#[test]
fn changing_granularity_can_move_the_anchor() {
    let today = date(2026, 1, 21);
    let engine = AnchorEngine::new(CalendarView::TimeGridDay, today);
    let mut controller =
        CalendarController::new(CalendarView::TimeGridDay, engine, sample_board()).unwrap();
    assert_eq!(controller.current_date(), date(2026, 1, 21));

    controller
        .change_view(CalendarView::ResourceTimelineWeek)
        .unwrap();
    // L'ancrage relu après coup vient du moteur, pas de l'état local.
    assert_eq!(controller.current_date(), date(2026, 1, 19));
}

#[test]
fn title_follows_the_view_granularity() {
    assert_eq!(
        format_title(date(2026, 1, 19), CalendarView::ResourceTimelineWeek),
        "January 2026"
    );
    assert_eq!(
        format_title(date(2026, 1, 19), CalendarView::TimeGridWeek),
        "January 2026"
    );
    assert_eq!(
        format_title(date(2026, 1, 21), CalendarView::TimeGridDay),
        "January 21, 2026"
    );
    assert_eq!(
        format_title(date(2026, 1, 3), CalendarView::ResourceTimelineDay),
        "January 3, 2026"
    );
}

#[test]
fn fetch_range_covers_the_visible_week_or_a_single_day() {
    let controller = week_controller();
    assert_eq!(
        controller.fetch_range(),
        (date(2026, 1, 19), date(2026, 1, 25))
    );

    let engine = AnchorEngine::new(CalendarView::ResourceTimelineDay, date(2026, 1, 21));
    let day = CalendarController::new(CalendarView::ResourceTimelineDay, engine, sample_board())
        .unwrap();
    assert_eq!(day.fetch_range(), (date(2026, 1, 21), date(2026, 1, 21)));
}

#[test]
fn events_reflect_the_latest_committed_range() {
    let mut controller = week_controller();
    // Trois visites tombent dans la semaine du 19 janvier.
    assert_eq!(controller.events().len(), 3);

    controller.go_to_date(date(2026, 2, 2)).unwrap();
    assert_eq!(controller.events().len(), 1);
    assert_eq!(controller.events()[0].id, "visit-4");
}

#[test]
fn resource_search_matches_title_or_initials_case_insensitively() {
    let mut controller = week_controller();
    controller.set_resource_search("br");
    let hits = controller.searched_resources();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Brian Smith");

    controller.set_resource_search("AJ");
    let hits = controller.searched_resources();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].initials, "AJ");

    // La recherche est transitoire : la sélection persistée est intacte.
    assert_eq!(controller.visible_resources().len(), 3);
}

#[test]
fn applied_selection_drives_the_visible_rows() {
    let mut controller = week_controller();
    controller.apply_resource_selection(vec![ResourceId::new("c2")]);
    let rows = controller.visible_resources();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Brian Smith");

    // Naviguer ne réinitialise pas la sélection tant que la liste de
    // ressources ne change pas.
    controller.go_to_next().unwrap();
    assert_eq!(controller.visible_resources().len(), 1);
}

#[test]
fn all_all_filters_always_yield_the_full_event_list() {
    let mut controller = week_controller();
    controller.set_event_filters(EventFilters {
        status: Some(VisitStatus::Cancelled),
        shift_type: None,
    });
    assert_eq!(controller.visible_events().len(), 1);

    controller.set_event_filters(EventFilters::default());
    assert_eq!(controller.visible_events().len(), controller.events().len());
}

#[test]
fn both_active_filters_must_match() {
    let mut controller = week_controller();
    controller.set_event_filters(EventFilters {
        status: Some(VisitStatus::Pending),
        shift_type: Some("personal_care".to_string()),
    });
    let events = controller.visible_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "visit-3");

    controller.set_event_filters(EventFilters {
        status: None,
        shift_type: Some("domestic".to_string()),
    });
    assert_eq!(controller.visible_events().len(), 1);
}

#[test]
fn anchor_engine_steps_by_view_granularity() {
    let mut engine = AnchorEngine::new(CalendarView::DayGridMonth, date(2026, 1, 21));
    assert_eq!(engine.current_date(), date(2026, 1, 1));
    engine.next();
    assert_eq!(engine.current_date(), date(2026, 2, 1));
    engine.prev();
    engine.prev();
    assert_eq!(engine.current_date(), date(2025, 12, 1));

    engine.change_view(CalendarView::TimeGridDay);
    engine.next();
    assert_eq!(engine.current_date(), date(2025, 12, 2));
}
