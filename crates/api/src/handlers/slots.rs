//! # Slot Handlers
//!
//! Serve the canonical slot catalog and apply a doctor's slot toggles. Both
//! are stateless: the caller sends its current selection and receives the
//! next one, and persists it through the availability endpoint.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use careslot_core::{
    clock::Weekday,
    models::{availability::SelectedSlotSet, time_slot::TimeSlot},
    slots::{
        generator::{DayCatalog, SlotGrid},
        validator::{ToggleOutcome, try_toggle},
    },
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// Optional overrides of the configured grid
#[derive(Debug, Default, Deserialize)]
pub struct GridQuery {
    pub start_hour: Option<u8>,
    pub end_hour: Option<u8>,
    pub interval_minutes: Option<u16>,
}

impl GridQuery {
    fn over(&self, base: SlotGrid) -> SlotGrid {
        SlotGrid::new(
            self.start_hour.unwrap_or(base.start_hour),
            self.end_hour.unwrap_or(base.end_hour),
            self.interval_minutes.unwrap_or(base.interval_minutes),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    #[serde(default)]
    pub current: SelectedSlotSet,
    pub candidate: TimeSlot,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub selected_time_slots: SelectedSlotSet,
    pub available_days: Vec<Weekday>,
    pub outcome: ToggleOutcome,
}

/// Catalog for every weekday under the configured grid
///
/// ```text
/// GET /api/slots
/// ```
pub async fn list_week(State(state): State<Arc<ApiState>>) -> Json<Vec<DayCatalog>> {
    Json(state.policy.grid.generate_week())
}

/// Catalog for one weekday
///
/// ```text
/// GET /api/slots/Monday?start_hour=9&end_hour=17&interval_minutes=15
/// ```
///
/// # Errors
///
/// * `ClinicError::Validation` - unknown weekday
/// * `ClinicError::InvalidConfiguration` - the resulting grid is invalid
#[axum::debug_handler]
pub async fn list_day(
    State(state): State<Arc<ApiState>>,
    Path(day): Path<String>,
    Query(query): Query<GridQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let day: Weekday = day.parse()?;
    let grid = query.over(state.policy.grid);
    grid.validate()?;

    Ok(Json(grid.generate(day)))
}

/// Adds or removes one slot from a selection
///
/// # Errors
///
/// * `ClinicError::SlotConflict` - the candidate overlaps a selected slot
/// * `ClinicError::Validation` - the candidate ends before it starts
#[axum::debug_handler]
pub async fn toggle_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let toggled = try_toggle(&payload.current, &payload.candidate, state.policy.overlap_rule)?;

    Ok(Json(SelectionResponse {
        available_days: toggled.set.available_days(),
        selected_time_slots: toggled.set,
        outcome: toggled.outcome,
    }))
}
