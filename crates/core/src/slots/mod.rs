/// Canonical slot catalog for a weekday
pub mod generator;
/// Overlap checks for a doctor's selected slots
pub mod validator;
