//! Tunable scheduling rules, gathered in one place so every caller
//! generates and validates slots the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ClinicError;
use crate::slots::generator::SlotGrid;

/// Length of an appointment that was booked without an explicit end time.
pub const DEFAULT_APPOINTMENT_MINUTES: u16 = 30;

/// How two `[start, end)` intervals on the same day are judged to collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapRule {
    /// `a.start < b.end && b.start < a.end`. Back-to-back intervals never collide.
    #[default]
    HalfOpen,
    /// Rule the first booking forms shipped with:
    /// `existing.start <= candidate.start < existing.end`, or
    /// `existing.start < candidate.end <= existing.end`.
    /// A candidate that strictly contains an existing interval passes.
    Legacy,
}

impl OverlapRule {
    /// Whether `candidate` collides with `existing`. Both are `(start, end)`.
    pub fn overlaps<T: Ord>(self, existing: (T, T), candidate: (T, T)) -> bool {
        let (existing_start, existing_end) = existing;
        let (candidate_start, candidate_end) = candidate;
        match self {
            OverlapRule::HalfOpen => existing_start < candidate_end && candidate_start < existing_end,
            OverlapRule::Legacy => {
                (existing_start <= candidate_start && existing_end > candidate_start)
                    || (existing_start < candidate_end && existing_end >= candidate_end)
            }
        }
    }
}

impl fmt::Display for OverlapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapRule::HalfOpen => f.write_str("half-open"),
            OverlapRule::Legacy => f.write_str("legacy"),
        }
    }
}

impl FromStr for OverlapRule {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half-open" | "half_open" | "halfopen" | "standard" => Ok(OverlapRule::HalfOpen),
            "legacy" => Ok(OverlapRule::Legacy),
            other => Err(ClinicError::InvalidConfiguration(format!(
                "unknown overlap rule {other:?}, expected \"half-open\" or \"legacy\""
            ))),
        }
    }
}

/// Everything a caller needs to generate, validate and book slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    pub grid: SlotGrid,
    pub overlap_rule: OverlapRule,
    pub default_duration_minutes: u16,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            grid: SlotGrid::default(),
            overlap_rule: OverlapRule::default(),
            default_duration_minutes: DEFAULT_APPOINTMENT_MINUTES,
        }
    }
}
