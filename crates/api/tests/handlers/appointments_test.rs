use axum::http::StatusCode;
use careslot_core::{
    clock::Weekday,
    models::appointment::{Appointment, AppointmentStatus},
};
use chrono::Utc;
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{TestContext, appointment, availability, slot};

// 2024-01-01 is a Monday.
const MONDAY: &str = "2024-01-01";

fn booking_context(doctor_id: Uuid, booked: Vec<Appointment>) -> TestContext {
    let offered = availability(
        doctor_id,
        vec![
            slot(Weekday::Monday, "09:00", "09:30"),
            slot(Weekday::Monday, "09:30", "10:00"),
        ],
    );

    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_load_availability()
        .with(predicate::eq(doctor_id))
        .returning(move |_| Ok(Some(offered.clone())));
    ctx.appointment_repo
        .expect_appointments_for_doctor_on()
        .with(predicate::eq(doctor_id), predicate::eq(MONDAY.to_string()))
        .returning(move |_, _| Ok(booked.clone()));
    ctx
}

#[tokio::test]
async fn test_book_appointment_creates_pending() {
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    let mut ctx = booking_context(doctor_id, Vec::new());
    ctx.appointment_repo
        .expect_create_appointment()
        .withf(move |new| {
            new.doctor_id == doctor_id
                && new.patient_id == patient_id
                && new.status == AppointmentStatus::Pending
                && new.end_time.to_string() == "10:00"
        })
        .times(1)
        .returning(|new| {
            Ok(Some(Appointment {
                id: Uuid::new_v4(),
                doctor_id: new.doctor_id,
                patient_id: new.patient_id,
                date: new.date,
                start_time: new.start_time.to_string(),
                end_time: Some(new.end_time.to_string()),
                status: new.status,
                created_at: Utc::now(),
            }))
        });
    let server = ctx.into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", doctor_id))
        .json(&json!({ "patientId": patient_id, "date": MONDAY, "startTime": "09:30" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let created: Appointment = response.json();
    assert_eq!(created.status, AppointmentStatus::Pending);
    assert_eq!(created.start_time, "09:30");
    assert_eq!(created.end_time.as_deref(), Some("10:00"));
}

#[tokio::test]
async fn test_book_appointment_overlapping_existing() {
    let doctor_id = Uuid::new_v4();
    let booked = vec![appointment(doctor_id, MONDAY, "09:00", Some("09:30"), AppointmentStatus::Confirmed)];
    let server = booking_context(doctor_id, booked).into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", doctor_id))
        .json(&json!({ "patientId": Uuid::new_v4(), "date": MONDAY, "startTime": "09:00" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_book_appointment_rejected_booking_frees_slot() {
    let doctor_id = Uuid::new_v4();
    let booked = vec![appointment(doctor_id, MONDAY, "09:00", Some("09:30"), AppointmentStatus::Rejected)];

    let mut ctx = booking_context(doctor_id, booked);
    let created = appointment(doctor_id, MONDAY, "09:00", Some("09:30"), AppointmentStatus::Pending);
    ctx.appointment_repo
        .expect_create_appointment()
        .times(1)
        .returning(move |_| Ok(Some(created.clone())));
    let server = ctx.into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", doctor_id))
        .json(&json!({ "patientId": Uuid::new_v4(), "date": MONDAY, "startTime": "09:00" }))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_book_appointment_lost_race_is_conflict() {
    let doctor_id = Uuid::new_v4();

    let mut ctx = booking_context(doctor_id, Vec::new());
    ctx.appointment_repo
        .expect_create_appointment()
        .times(1)
        .returning(|_| Ok(None));
    let server = ctx.into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", doctor_id))
        .json(&json!({ "patientId": Uuid::new_v4(), "date": MONDAY, "startTime": "09:00" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_book_appointment_slot_not_offered() {
    let doctor_id = Uuid::new_v4();
    let server = booking_context(doctor_id, Vec::new()).into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", doctor_id))
        .json(&json!({ "patientId": Uuid::new_v4(), "date": MONDAY, "startTime": "11:00" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_book_appointment_malformed_date() {
    let doctor_id = Uuid::new_v4();
    let server = booking_context(doctor_id, Vec::new()).into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", doctor_id))
        .json(&json!({ "patientId": Uuid::new_v4(), "date": "01/01/2024", "startTime": "09:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_appointment_doctor_without_availability() {
    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_load_availability()
        .returning(|_| Ok(None));
    let server = ctx.into_server();

    let response = server
        .post(&format!("/api/doctors/{}/appointments", Uuid::new_v4()))
        .json(&json!({ "patientId": Uuid::new_v4(), "date": MONDAY, "startTime": "09:00" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upcoming_appointments_sorted_and_filtered() {
    let doctor_id = Uuid::new_v4();
    let later = appointment(doctor_id, "2099-05-02", "09:00", None, AppointmentStatus::Confirmed);
    let sooner = appointment(doctor_id, "2099-05-01", "15:00", None, AppointmentStatus::Pending);
    let past = appointment(doctor_id, "2000-01-03", "09:00", None, AppointmentStatus::Confirmed);
    let unreadable = appointment(doctor_id, "someday", "09:00", None, AppointmentStatus::Confirmed);
    let stored = vec![later.clone(), past, sooner.clone(), unreadable];

    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_appointments_for_doctor()
        .with(predicate::eq(doctor_id))
        .times(1)
        .returning(move |_| Ok(stored.clone()));
    let server = ctx.into_server();

    let response = server
        .get(&format!("/api/doctors/{}/appointments/upcoming", doctor_id))
        .await;
    response.assert_status_ok();

    let upcoming: Vec<Appointment> = response.json();
    assert_eq!(upcoming, vec![sooner, later]);
}

#[tokio::test]
async fn test_upcoming_reports_appointment_in_progress_as_ongoing() {
    let now = Utc::now().naive_utc();
    // A day-long appointment is closed only during its final minute
    if now.time() >= chrono::NaiveTime::from_hms_opt(23, 58, 0).unwrap() {
        return;
    }
    let doctor_id = Uuid::new_v4();
    let today = now.date().format("%Y-%m-%d").to_string();
    let in_progress = appointment(doctor_id, &today, "00:00", Some("23:59"), AppointmentStatus::Confirmed);
    let stored = vec![in_progress.clone()];

    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_appointments_for_doctor()
        .returning(move |_| Ok(stored.clone()));
    let server = ctx.into_server();

    let response = server
        .get(&format!("/api/doctors/{}/appointments/upcoming", doctor_id))
        .await;
    response.assert_status_ok();

    let listed: Vec<Appointment> = response.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, in_progress.id);
    assert_eq!(listed[0].status, AppointmentStatus::Ongoing);
}

#[tokio::test]
async fn test_update_status_confirms_pending() {
    let pending = appointment(Uuid::new_v4(), MONDAY, "09:00", None, AppointmentStatus::Pending);
    let id = pending.id;
    let confirmed = Appointment {
        status: AppointmentStatus::Confirmed,
        ..pending.clone()
    };

    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_find_appointment()
        .with(predicate::eq(id))
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.appointment_repo
        .expect_update_status()
        .with(
            predicate::eq(id),
            predicate::eq(AppointmentStatus::Pending),
            predicate::eq(AppointmentStatus::Confirmed),
        )
        .times(1)
        .returning(move |_, _, _| Ok(Some(confirmed.clone())));
    let server = ctx.into_server();

    let response = server
        .put(&format!("/api/appointments/{}/status", id))
        .json(&json!({ "status": "confirmed" }))
        .await;
    response.assert_status_ok();

    let updated: Appointment = response.json();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn test_update_status_loses_race_to_concurrent_decision() {
    let pending = appointment(Uuid::new_v4(), MONDAY, "09:00", None, AppointmentStatus::Pending);
    let id = pending.id;

    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_find_appointment()
        .returning(move |_| Ok(Some(pending.clone())));
    // The row was rejected after it was read
    ctx.appointment_repo
        .expect_update_status()
        .with(
            predicate::eq(id),
            predicate::eq(AppointmentStatus::Pending),
            predicate::eq(AppointmentStatus::Confirmed),
        )
        .times(1)
        .returning(|_, _, _| Ok(None));
    let server = ctx.into_server();

    let response = server
        .put(&format!("/api/appointments/{}/status", id))
        .json(&json!({ "status": "confirmed" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        format!("Invalid status transition: appointment {} is no longer pending", id)
    );
}

#[tokio::test]
async fn test_update_status_rejects_invalid_transition() {
    let rejected = appointment(Uuid::new_v4(), MONDAY, "09:00", None, AppointmentStatus::Rejected);
    let id = rejected.id;

    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_find_appointment()
        .returning(move |_| Ok(Some(rejected.clone())));
    let server = ctx.into_server();

    let response = server
        .put(&format!("/api/appointments/{}/status", id))
        .json(&json!({ "status": "confirmed" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_status_unknown_appointment() {
    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_find_appointment()
        .returning(|_| Ok(None));
    let server = ctx.into_server();

    let response = server
        .put(&format!("/api/appointments/{}/status", Uuid::new_v4()))
        .json(&json!({ "status": "rejected" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
