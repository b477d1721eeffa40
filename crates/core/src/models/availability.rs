use std::slice;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{ClockTime, Weekday};
use crate::models::time_slot::TimeSlot;
use crate::slots::validator::derive_available_days;

/// Slots a doctor offers, in the order they were picked.
///
/// Construction does not check for overlaps; run new sets through
/// [`crate::slots::validator::validate_set`] or build them with
/// [`crate::slots::validator::try_toggle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedSlotSet {
    slots: Vec<TimeSlot>,
}

impl SelectedSlotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn iter(&self) -> slice::Iter<'_, TimeSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether a slot with this `(day, start_time)` key is selected.
    pub fn contains(&self, day: Weekday, start_time: ClockTime) -> bool {
        self.find(day, start_time).is_some()
    }

    pub fn find(&self, day: Weekday, start_time: ClockTime) -> Option<&TimeSlot> {
        self.slots
            .iter()
            .find(|slot| slot.day == day && slot.start_time == start_time)
    }

    /// Distinct days present, Monday first.
    pub fn available_days(&self) -> Vec<Weekday> {
        derive_available_days(self).into_iter().collect()
    }

    pub fn into_vec(self) -> Vec<TimeSlot> {
        self.slots
    }
}

impl From<Vec<TimeSlot>> for SelectedSlotSet {
    fn from(slots: Vec<TimeSlot>) -> Self {
        Self { slots }
    }
}

impl FromIterator<TimeSlot> for SelectedSlotSet {
    fn from_iter<I: IntoIterator<Item = TimeSlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectedSlotSet {
    type Item = &'a TimeSlot;
    type IntoIter = slice::Iter<'a, TimeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// A doctor's stored availability.
///
/// `available_days` is always derived from the slots; there is no way to
/// set it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAvailability {
    doctor_id: Uuid,
    selected_time_slots: SelectedSlotSet,
    available_days: Vec<Weekday>,
    updated_at: DateTime<Utc>,
}

impl DoctorAvailability {
    pub fn new(doctor_id: Uuid, selected_time_slots: SelectedSlotSet, updated_at: DateTime<Utc>) -> Self {
        let available_days = selected_time_slots.available_days();
        Self {
            doctor_id,
            selected_time_slots,
            available_days,
            updated_at,
        }
    }

    pub fn doctor_id(&self) -> Uuid {
        self.doctor_id
    }

    pub fn selected_time_slots(&self) -> &SelectedSlotSet {
        &self.selected_time_slots
    }

    pub fn available_days(&self) -> &[Weekday] {
        &self.available_days
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
