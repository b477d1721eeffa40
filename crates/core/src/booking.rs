//! # Booking Admission
//!
//! Time-based admission control for patient bookings: a request must hit a
//! slot the doctor offers on that weekday and must not overlap any
//! appointment the doctor already holds on that date.
//!
//! The read of existing appointments and the later write are not atomic.
//! The store backs this check with its own uniqueness constraint.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clock::{self, ClockTime, Weekday};
use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::{Appointment, AppointmentStatus};
use crate::models::availability::SelectedSlotSet;
use crate::policy::SchedulingPolicy;
use crate::window::resolve_interval;

/// A patient's request for one of a doctor's slots on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_id: Uuid,
    /// `YYYY-MM-DD`
    pub date: String,
    pub start_time: ClockTime,
}

/// An admitted booking, ready to be written by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub status: AppointmentStatus,
}

/// Start and end of a stored appointment within its own date.
fn booked_interval(appointment: &Appointment, default_duration_minutes: u16) -> ClinicResult<(ClockTime, ClockTime)> {
    let start_time: ClockTime = appointment.start_time.parse()?;
    let end_time = match &appointment.end_time {
        Some(end_time) => end_time.parse()?,
        None => start_time
            .checked_add_minutes(default_duration_minutes)
            .unwrap_or(ClockTime::END_OF_DAY),
    };
    if end_time < start_time {
        return Err(ClinicError::MalformedTimestamp(format!(
            "appointment {} ends at {end_time} before it starts at {start_time}",
            appointment.id
        )));
    }
    Ok((start_time, end_time))
}

/// Admits `request` against the doctor's offered slots and existing bookings.
///
/// `booked` may hold appointments of other doctors or dates; only the
/// doctor's non-rejected appointments on the requested date are compared.
/// Stored appointments whose times do not parse are skipped with a warning.
///
/// # Errors
///
/// * `ClinicError::MalformedTimestamp` - the requested date does not parse
/// * `ClinicError::SlotUnavailable` - the doctor offers no slot starting at
///   that time on that weekday
/// * `ClinicError::SlotConflict` - an existing appointment overlaps the slot
pub fn admit_booking(
    doctor_id: Uuid,
    available: &SelectedSlotSet,
    booked: &[Appointment],
    request: &BookingRequest,
    policy: &SchedulingPolicy,
) -> ClinicResult<NewAppointment> {
    let date = clock::parse_date(&request.date)?;
    let day = Weekday::of(date);

    let slot = available
        .find(day, request.start_time)
        .filter(|slot| slot.is_available)
        .ok_or_else(|| {
            ClinicError::SlotUnavailable(format!(
                "doctor {doctor_id} offers no slot at {} on {day}",
                request.start_time
            ))
        })?;

    let same_day = booked
        .iter()
        .filter(|existing| existing.doctor_id == doctor_id && existing.status.occupies_slot());

    for existing in same_day {
        match clock::parse_date(&existing.date) {
            Ok(existing_date) if existing_date == date => {}
            Ok(_) => continue,
            Err(e) => {
                warn!(appointment_id = %existing.id, "Skipping appointment with unreadable date: {}", e);
                continue;
            }
        }

        let interval = match booked_interval(existing, policy.default_duration_minutes) {
            Ok(interval) => interval,
            Err(e) => {
                warn!(appointment_id = %existing.id, "Skipping appointment with unreadable times: {}", e);
                continue;
            }
        };

        if policy.overlap_rule.overlaps(interval, slot.interval()) {
            debug!(
                %doctor_id,
                %date,
                requested = %slot.time_range(),
                existing = %existing.id,
                "Rejected booking overlapping an existing appointment"
            );
            return Err(ClinicError::SlotConflict {
                day,
                start_time: interval.0,
                end_time: interval.1,
            });
        }
    }

    Ok(NewAppointment {
        doctor_id,
        patient_id: request.patient_id,
        date: date.format("%Y-%m-%d").to_string(),
        start_time: slot.start_time,
        end_time: slot.end_time,
        status: AppointmentStatus::Pending,
    })
}

/// Appointments that have not ended by `now`, soonest first.
///
/// One in progress is kept so the dashboard can show it as ongoing.
/// Appointments whose times cannot be resolved are left out.
pub fn upcoming(appointments: &[Appointment], now: NaiveDateTime, default_duration_minutes: u16) -> Vec<&Appointment> {
    let mut upcoming: Vec<(NaiveDateTime, &Appointment)> = appointments
        .iter()
        .filter_map(|appointment| {
            let (starts_at, ends_at) = resolve_interval(
                &appointment.date,
                &appointment.start_time,
                appointment.end_time.as_deref(),
                default_duration_minutes,
            )
            .ok()?;
            (ends_at >= now).then_some((starts_at, appointment))
        })
        .collect();

    upcoming.sort_by_key(|(starts_at, _)| *starts_at);
    upcoming.into_iter().map(|(_, appointment)| appointment).collect()
}
