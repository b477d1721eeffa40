use axum::http::StatusCode;
use careslot_api::handlers::slots::SelectionResponse;
use careslot_core::{
    clock::Weekday,
    models::{availability::SelectedSlotSet, time_slot::TimeSlot},
    slots::{generator::DayCatalog, validator::ToggleOutcome},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, slot};

#[tokio::test]
async fn test_list_week_uses_configured_grid() {
    let server = TestContext::new().into_server();

    let response = server.get("/api/slots").await;
    response.assert_status_ok();

    let week: Vec<DayCatalog> = response.json();
    assert_eq!(week.len(), 7);
    assert_eq!(week[0].day, Weekday::Monday);
    // 08:00 to 20:00 every 30 minutes
    assert_eq!(week[0].slots.len(), 24);
    assert_eq!(week[0].slots[0].id, "Monday-08:00");
    assert!(week.iter().all(|catalog| catalog.slots.len() == 24));
}

#[tokio::test]
async fn test_list_day_with_grid_override() {
    let server = TestContext::new().into_server();

    let response = server
        .get("/api/slots/tuesday")
        .add_query_param("start_hour", 9)
        .add_query_param("end_hour", 11)
        .add_query_param("interval_minutes", 60)
        .await;
    response.assert_status_ok();

    let slots: Vec<TimeSlot> = response.json();
    assert_eq!(
        slots.iter().map(TimeSlot::time_range).collect::<Vec<_>>(),
        vec!["09:00-10:00", "10:00-11:00"]
    );
    assert!(slots.iter().all(|slot| slot.day == Weekday::Tuesday));
}

#[tokio::test]
async fn test_list_day_rejects_invalid_grid() {
    let server = TestContext::new().into_server();

    let response = server
        .get("/api/slots/Monday")
        .add_query_param("interval_minutes", 7)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_day_rejects_unknown_day() {
    let server = TestContext::new().into_server();

    let response = server.get("/api/slots/Funday").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggle_adds_slot_and_derives_days() {
    let server = TestContext::new().into_server();

    let response = server
        .post("/api/slots/toggle")
        .json(&json!({ "candidate": slot(Weekday::Wednesday, "10:00", "10:30") }))
        .await;
    response.assert_status_ok();

    let selection: SelectionResponse = response.json();
    assert_eq!(selection.outcome, ToggleOutcome::Added);
    assert_eq!(selection.available_days, vec![Weekday::Wednesday]);
    assert_eq!(selection.selected_time_slots.len(), 1);
}

#[tokio::test]
async fn test_toggle_accepts_candidate_without_id() {
    let server = TestContext::new().into_server();

    let response = server
        .post("/api/slots/toggle")
        .json(&json!({
            "candidate": { "day": "Thursday", "startTime": "11:00", "endTime": "11:30" }
        }))
        .await;
    response.assert_status_ok();

    let selection: SelectionResponse = response.json();
    assert_eq!(selection.selected_time_slots.slots()[0].id, "Thursday-11:00");
}

#[tokio::test]
async fn test_toggle_removes_selected_slot() {
    let server = TestContext::new().into_server();
    let current = SelectedSlotSet::from(vec![
        slot(Weekday::Monday, "09:00", "09:30"),
        slot(Weekday::Friday, "09:00", "09:30"),
    ]);

    let response = server
        .post("/api/slots/toggle")
        .json(&json!({
            "current": current,
            "candidate": slot(Weekday::Monday, "09:00", "09:30"),
        }))
        .await;
    response.assert_status_ok();

    let selection: SelectionResponse = response.json();
    assert_eq!(selection.outcome, ToggleOutcome::Removed);
    assert_eq!(selection.available_days, vec![Weekday::Friday]);
}

#[tokio::test]
async fn test_toggle_conflict_returns_409_with_message() {
    let server = TestContext::new().into_server();
    let current = SelectedSlotSet::from(vec![slot(Weekday::Monday, "09:00", "10:00")]);

    let response = server
        .post("/api/slots/toggle")
        .json(&json!({
            "current": current,
            "candidate": slot(Weekday::Monday, "09:30", "10:30"),
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Time slot conflicts with existing selection 09:00-10:00 on Monday"
    );
}
