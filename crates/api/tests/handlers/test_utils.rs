use std::sync::Arc;

use axum_test::TestServer;
use careslot_api::{ApiState, build_router};
use careslot_core::{
    clock::{ClockTime, Weekday},
    models::{
        appointment::{Appointment, AppointmentStatus},
        availability::{DoctorAvailability, SelectedSlotSet},
        time_slot::TimeSlot,
    },
    policy::SchedulingPolicy,
};
use careslot_db::mock::repositories::{MockAppointmentRepo, MockAvailabilityRepo};
use chrono::Utc;
use uuid::Uuid;

pub struct TestContext {
    pub availability_repo: MockAvailabilityRepo,
    pub appointment_repo: MockAppointmentRepo,
    pub policy: SchedulingPolicy,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            availability_repo: MockAvailabilityRepo::new(),
            appointment_repo: MockAppointmentRepo::new(),
            policy: SchedulingPolicy::default(),
        }
    }

    // Moves the configured mocks into a router served in-process
    pub fn into_server(self) -> TestServer {
        let state = Arc::new(ApiState::new(
            Arc::new(self.availability_repo),
            Arc::new(self.appointment_repo),
            self.policy,
            chrono_tz::Tz::UTC,
        ));
        TestServer::new(build_router(state)).expect("test server")
    }
}

pub fn time(s: &str) -> ClockTime {
    s.parse().expect("valid clock time")
}

pub fn slot(day: Weekday, start: &str, end: &str) -> TimeSlot {
    TimeSlot::new(day, time(start), time(end)).expect("valid slot")
}

pub fn availability(doctor_id: Uuid, slots: Vec<TimeSlot>) -> DoctorAvailability {
    DoctorAvailability::new(doctor_id, SelectedSlotSet::from(slots), Utc::now())
}

pub fn appointment(doctor_id: Uuid, date: &str, start: &str, end: Option<&str>, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        doctor_id,
        patient_id: Uuid::new_v4(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.map(str::to_string),
        status,
        created_at: Utc::now(),
    }
}
