pub mod appointments;
pub mod availability;
pub mod slots;
pub mod window;
