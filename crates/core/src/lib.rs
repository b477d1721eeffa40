//! # CareSlot Core
//!
//! Pure scheduling rules for doctor availability and appointment access.
//! Nothing in this crate performs I/O: every function takes its inputs as
//! arguments and returns new values, so callers may evaluate them as often
//! as they like from as many tasks as they like.
//!
//! ## Layout
//!
//! - **clock**: minute-granular wall-clock times, weekdays and dates
//! - **slots**: the canonical slot catalog and the overlap-free selection
//! - **window**: whether chat and video are open for an appointment
//! - **booking**: admission of a patient booking against a doctor's slots
//! - **policy**: grid, overlap rule and default duration in one value
//! - **models**: records exchanged with the store and the API
//! - **errors**: the shared error type

pub mod booking;
pub mod clock;
pub mod errors;
pub mod models;
pub mod policy;
pub mod slots;
pub mod window;
