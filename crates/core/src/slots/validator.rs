//! # Slot Conflict Validator
//!
//! Keeps a doctor's selected slots free of same-day overlaps while the
//! doctor toggles slots on and off. Every operation returns a new set; the
//! caller decides whether to persist it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::clock::Weekday;
use crate::errors::{ClinicError, ClinicResult};
use crate::models::availability::SelectedSlotSet;
use crate::models::time_slot::TimeSlot;
use crate::policy::OverlapRule;

/// What a toggle did to the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Result of a successful toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    pub set: SelectedSlotSet,
    pub outcome: ToggleOutcome,
}

/// First member of `current` that collides with `candidate` under `rule`.
pub fn find_conflict<'a>(
    current: &'a SelectedSlotSet,
    candidate: &TimeSlot,
    rule: OverlapRule,
) -> Option<&'a TimeSlot> {
    current
        .iter()
        .find(|existing| existing.day == candidate.day && rule.overlaps(existing.interval(), candidate.interval()))
}

/// Removes `candidate` if it is already selected, otherwise adds it.
///
/// Membership is matched on `(day, start_time)`. Removal never checks for
/// conflicts. An added slot gets its canonical id and is appended, so the
/// set keeps insertion order.
///
/// # Errors
///
/// * `ClinicError::Validation` - the candidate does not end after it starts
/// * `ClinicError::SlotConflict` - the candidate overlaps a selected slot on
///   the same day; carries that slot's range
pub fn try_toggle(current: &SelectedSlotSet, candidate: &TimeSlot, rule: OverlapRule) -> ClinicResult<Toggled> {
    if current.contains(candidate.day, candidate.start_time) {
        let set = current
            .iter()
            .filter(|slot| !slot.same_key(candidate))
            .cloned()
            .collect();
        return Ok(Toggled {
            set,
            outcome: ToggleOutcome::Removed,
        });
    }

    if candidate.start_time >= candidate.end_time {
        return Err(ClinicError::Validation(format!(
            "Time slot {} must end after it starts",
            candidate.time_range()
        )));
    }

    if let Some(existing) = find_conflict(current, candidate, rule) {
        debug!(
            candidate = %candidate.time_range(),
            existing = %existing.time_range(),
            day = %candidate.day,
            "Rejected overlapping slot"
        );
        return Err(ClinicError::SlotConflict {
            day: existing.day,
            start_time: existing.start_time,
            end_time: existing.end_time,
        });
    }

    let mut slots = current.slots().to_vec();
    slots.push(TimeSlot::template(candidate.day, candidate.start_time, candidate.end_time));
    Ok(Toggled {
        set: SelectedSlotSet::from(slots),
        outcome: ToggleOutcome::Added,
    })
}

/// Checks a whole set at once, e.g. one submitted in a single save.
///
/// # Errors
///
/// * `ClinicError::Validation` - a slot is empty or inverted, or two slots
///   share a `(day, start_time)` key
/// * `ClinicError::SlotConflict` - two slots on the same day overlap
pub fn validate_set(set: &SelectedSlotSet, rule: OverlapRule) -> ClinicResult<()> {
    let mut accepted = SelectedSlotSet::default();
    for slot in set.iter() {
        if accepted.contains(slot.day, slot.start_time) {
            return Err(ClinicError::Validation(format!(
                "Time slot {} on {} is selected twice",
                slot.time_range(),
                slot.day
            )));
        }
        accepted = try_toggle(&accepted, slot, rule)?.set;
    }
    Ok(())
}

/// Distinct weekdays present in `set`, Monday first.
pub fn derive_available_days(set: &SelectedSlotSet) -> BTreeSet<Weekday> {
    set.iter().map(|slot| slot.day).collect()
}
