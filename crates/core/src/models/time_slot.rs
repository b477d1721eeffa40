use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, Weekday};
use crate::errors::{ClinicError, ClinicResult};

fn bookable() -> bool {
    true
}

/// A weekly bookable interval, e.g. every Monday 09:00-09:30.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Derived from day and start; clients may omit it
    #[serde(default)]
    pub id: String,
    pub day: Weekday,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default = "bookable")]
    pub is_available: bool,
}

impl TimeSlot {
    /// Builds a slot with its canonical id.
    ///
    /// # Errors
    ///
    /// * `ClinicError::Validation` - `end_time` is not after `start_time`
    pub fn new(day: Weekday, start_time: ClockTime, end_time: ClockTime) -> ClinicResult<Self> {
        if start_time >= end_time {
            return Err(ClinicError::Validation(format!(
                "Time slot {start_time}-{end_time} must end after it starts"
            )));
        }
        Ok(Self::template(day, start_time, end_time))
    }

    pub(crate) fn template(day: Weekday, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            id: Self::slot_id(day, start_time),
            day,
            start_time,
            end_time,
            is_available: true,
        }
    }

    /// Canonical id, `"{day}-{HH:MM}"`.
    pub fn slot_id(day: Weekday, start_time: ClockTime) -> String {
        format!("{day}-{start_time}")
    }

    /// Same `(day, start_time)` key, regardless of end time or id.
    pub fn same_key(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start_time == other.start_time
    }

    pub fn interval(&self) -> (ClockTime, ClockTime) {
        (self.start_time, self.end_time)
    }

    /// `"HH:MM-HH:MM"`
    pub fn time_range(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end_time
            .minutes_since_midnight()
            .saturating_sub(self.start_time.minutes_since_midnight())
    }
}
