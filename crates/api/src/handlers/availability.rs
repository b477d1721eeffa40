//! # Availability Handlers
//!
//! Read and replace a doctor's selected slots. The stored `availableDays`
//! are derived from the slots on every save; requests cannot set them.

use axum::{
    Json,
    extract::{Path, State},
};
use careslot_core::{
    errors::ClinicError,
    models::{
        availability::{DoctorAvailability, SelectedSlotSet},
        time_slot::TimeSlot,
    },
    slots::validator::validate_set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAvailabilityRequest {
    pub selected_time_slots: SelectedSlotSet,
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorAvailability>, AppError> {
    let availability = state
        .availability
        .load_availability(doctor_id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} has no availability", doctor_id)))?;

    Ok(Json(availability))
}

/// Validates and stores a doctor's full selection
///
/// # Errors
///
/// * `ClinicError::SlotConflict` - two slots on one day overlap
/// * `ClinicError::Validation` - a slot is inverted or selected twice
/// * `ClinicError::Database` - the store failed
#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<DoctorAvailability>, AppError> {
    validate_set(&payload.selected_time_slots, state.policy.overlap_rule)?;

    // Ids are derived from (day, start), whatever the client sent
    let slots: SelectedSlotSet = payload
        .selected_time_slots
        .into_vec()
        .into_iter()
        .map(|slot| TimeSlot {
            id: TimeSlot::slot_id(slot.day, slot.start_time),
            ..slot
        })
        .collect();

    let saved = state.availability.save_selected_slots(doctor_id, slots).await?;

    Ok(Json(saved))
}
