//! # Appointment Handlers
//!
//! Booking, the upcoming list and the doctor's confirm/reject decision.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use careslot_core::{
    booking::{BookingRequest, admit_booking, upcoming},
    clock::{self, Weekday},
    errors::ClinicError,
    models::appointment::{Appointment, AppointmentStatus},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// Books one of a doctor's offered slots for a patient
///
/// The new appointment starts out `pending`.
///
/// # Errors
///
/// * `ClinicError::NotFound` - the doctor has no availability on record
/// * `ClinicError::MalformedTimestamp` - the date does not parse
/// * `ClinicError::SlotUnavailable` - no offered slot starts at that time
/// * `ClinicError::SlotConflict` - the slot is already booked
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let availability = state
        .availability
        .load_availability(doctor_id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} has no availability", doctor_id)))?;

    let date = clock::parse_date(&payload.date)?;
    let booked = state
        .appointments
        .appointments_for_doctor_on(doctor_id, date.format("%Y-%m-%d").to_string())
        .await?;

    let admitted = admit_booking(
        doctor_id,
        availability.selected_time_slots(),
        &booked,
        &payload,
        &state.policy,
    )?;
    let (start_time, end_time) = (admitted.start_time, admitted.end_time);

    // Lost the race to a concurrent booking of the same slot
    let appointment = state
        .appointments
        .create_appointment(admitted)
        .await?
        .ok_or(ClinicError::SlotConflict {
            day: Weekday::of(date),
            start_time,
            end_time,
        })?;

    info!(
        appointment_id = %appointment.id,
        %doctor_id,
        date = %appointment.date,
        start_time = %appointment.start_time,
        "Booked appointment"
    );

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Appointments that have not ended yet, soonest first
///
/// Statuses are reported as they would be shown, so a confirmed appointment
/// in progress reads `ongoing`.
#[axum::debug_handler]
pub async fn upcoming_appointments(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let now = state.local_now();
    let default_minutes = state.policy.default_duration_minutes;
    let appointments = state.appointments.appointments_for_doctor(doctor_id).await?;

    let upcoming = upcoming(&appointments, now, default_minutes)
        .into_iter()
        .map(|appointment| Appointment {
            status: appointment.effective_status(now, default_minutes),
            ..appointment.clone()
        })
        .collect();

    Ok(Json(upcoming))
}

/// Confirms or rejects a pending appointment
///
/// # Errors
///
/// * `ClinicError::NotFound` - no appointment with that id
/// * `ClinicError::InvalidTransition` - the appointment is not pending, the
///   target is not `confirmed` or `rejected`, or a concurrent update won
#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment = state
        .appointments
        .find_appointment(id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;
    let status = appointment.status.transition_to(&payload.status)?;

    // Another decision landed between the read and the write
    let updated = state
        .appointments
        .update_status(id, appointment.status.clone(), status)
        .await?
        .ok_or_else(|| {
            ClinicError::InvalidTransition(format!(
                "appointment {} is no longer {}",
                id,
                appointment.status.as_str()
            ))
        })?;

    info!(appointment_id = %id, status = %updated.status.as_str(), "Updated appointment status");

    Ok(Json(updated))
}

