//! # Slot Generator
//!
//! Enumerates the bookable template for one weekday on a fixed grid. The
//! output is a pure function of the grid and the day: identical inputs give
//! identical ids in identical order.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{ClockTime, Weekday};
use crate::errors::{ClinicError, ClinicResult};
use crate::models::time_slot::TimeSlot;

/// Operating window and step used to lay out a day's slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGrid {
    pub start_hour: u8,
    pub end_hour: u8,
    pub interval_minutes: u16,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 20,
            interval_minutes: 30,
        }
    }
}

/// One weekday and its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCatalog {
    pub day: Weekday,
    pub slots: Vec<TimeSlot>,
}

impl SlotGrid {
    pub fn new(start_hour: u8, end_hour: u8, interval_minutes: u16) -> Self {
        Self {
            start_hour,
            end_hour,
            interval_minutes,
        }
    }

    /// Checks the grid lays out non-overlapping slots on clean boundaries.
    ///
    /// # Errors
    ///
    /// * `ClinicError::InvalidConfiguration` - the window is empty or inverted,
    ///   ends after 24, or the interval does not divide an hour
    pub fn validate(&self) -> ClinicResult<()> {
        if self.start_hour >= self.end_hour {
            return Err(ClinicError::InvalidConfiguration(format!(
                "start hour {} must be before end hour {}",
                self.start_hour, self.end_hour
            )));
        }
        if self.end_hour > 24 {
            return Err(ClinicError::InvalidConfiguration(format!(
                "end hour {} is past the end of the day",
                self.end_hour
            )));
        }
        if self.interval_minutes == 0 || self.interval_minutes > 60 || 60 % self.interval_minutes != 0 {
            return Err(ClinicError::InvalidConfiguration(format!(
                "interval of {} minutes does not divide an hour",
                self.interval_minutes
            )));
        }
        Ok(())
    }

    /// Number of slots a valid grid yields per day.
    pub fn slots_per_day(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        usize::from(self.end_hour - self.start_hour) * 60 / usize::from(self.interval_minutes)
    }

    /// Lays out `[start_hour:00, end_hour:00)` for `day`.
    ///
    /// An invalid grid yields no slots. A slot that would end at midnight
    /// ends at `23:59` instead of rolling into the next day.
    pub fn generate(&self, day: Weekday) -> Vec<TimeSlot> {
        if let Err(e) = self.validate() {
            warn!(%day, grid = ?self, "Refusing to generate slots: {}", e);
            return Vec::new();
        }

        let mut slots = Vec::with_capacity(self.slots_per_day());
        for hour in self.start_hour..self.end_hour {
            for minute in (0..60).step_by(usize::from(self.interval_minutes)) {
                let Some(start_time) = ClockTime::from_minutes(u16::from(hour) * 60 + minute) else {
                    continue;
                };
                let end_time = start_time
                    .checked_add_minutes(self.interval_minutes)
                    .unwrap_or(ClockTime::END_OF_DAY);

                slots.push(TimeSlot::template(day, start_time, end_time));
            }
        }
        slots
    }

    /// Catalog for every day of the week, Monday first.
    pub fn generate_week(&self) -> Vec<DayCatalog> {
        Weekday::ALL
            .into_iter()
            .map(|day| DayCatalog {
                day,
                slots: self.generate(day),
            })
            .collect()
    }
}

/// Slots for `day` between `start_hour` and `end_hour` every `interval_minutes`.
pub fn generate_slots(day: Weekday, start_hour: u8, end_hour: u8, interval_minutes: u16) -> Vec<TimeSlot> {
    SlotGrid::new(start_hour, end_hour, interval_minutes).generate(day)
}
