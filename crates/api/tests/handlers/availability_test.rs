use axum::http::StatusCode;
use careslot_core::{clock::Weekday, models::availability::DoctorAvailability};
use chrono::Utc;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, availability, slot};

#[tokio::test]
async fn test_get_availability() {
    let doctor_id = Uuid::new_v4();
    let stored = availability(
        doctor_id,
        vec![
            slot(Weekday::Thursday, "14:00", "14:30"),
            slot(Weekday::Monday, "09:00", "09:30"),
        ],
    );

    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_load_availability()
        .with(predicate::eq(doctor_id))
        .times(1)
        .returning(move |_| Ok(Some(stored.clone())));
    let server = ctx.into_server();

    let response = server.get(&format!("/api/doctors/{}/availability", doctor_id)).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["availableDays"], json!(["Monday", "Thursday"]));
    assert_eq!(body["selectedTimeSlots"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_get_availability_not_found() {
    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_load_availability()
        .times(1)
        .returning(|_| Ok(None));
    let server = ctx.into_server();

    let response = server.get(&format!("/api/doctors/{}/availability", Uuid::new_v4())).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_availability_normalizes_ids() {
    let doctor_id = Uuid::new_v4();
    let mut sent = slot(Weekday::Saturday, "10:00", "10:30");
    sent.id = "client-generated".to_string();

    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_save_selected_slots()
        .withf(move |id, slots| {
            *id == doctor_id && slots.len() == 1 && slots.slots()[0].id == "Saturday-10:00"
        })
        .times(1)
        .returning(|id, slots| Ok(DoctorAvailability::new(id, slots, Utc::now())));
    let server = ctx.into_server();

    let response = server
        .put(&format!("/api/doctors/{}/availability", doctor_id))
        .json(&json!({ "selectedTimeSlots": [sent] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["availableDays"], json!(["Saturday"]));
}

#[tokio::test]
async fn test_update_availability_rejects_overlapping_selection() {
    // The store must not be touched
    let server = TestContext::new().into_server();

    let response = server
        .put(&format!("/api/doctors/{}/availability", Uuid::new_v4()))
        .json(&json!({
            "selectedTimeSlots": [
                slot(Weekday::Monday, "09:00", "10:00"),
                slot(Weekday::Monday, "09:30", "10:00"),
            ]
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_availability_rejects_client_supplied_days() {
    let server = TestContext::new().into_server();

    let response = server
        .put(&format!("/api/doctors/{}/availability", Uuid::new_v4()))
        .json(&json!({
            "selectedTimeSlots": [],
            "availableDays": ["Monday"],
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_availability_store_failure_is_500() {
    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_save_selected_slots()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("connection reset")));
    let server = ctx.into_server();

    let response = server
        .put(&format!("/api/doctors/{}/availability", Uuid::new_v4()))
        .json(&json!({ "selectedTimeSlots": [slot(Weekday::Monday, "09:00", "09:30")] }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
