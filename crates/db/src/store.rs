//! Store seams the API talks through, with the Postgres implementation.

use async_trait::async_trait;
use careslot_core::{
    booking::NewAppointment,
    models::{
        appointment::{Appointment, AppointmentStatus},
        availability::{DoctorAvailability, SelectedSlotSet},
    },
};
use eyre::Result;
use uuid::Uuid;

use crate::{DbPool, repositories};

/// Durable home of each doctor's selected slots.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn load_availability(&self, doctor_id: Uuid) -> Result<Option<DoctorAvailability>>;

    /// Replaces the doctor's slots; available days are derived from them.
    async fn save_selected_slots(&self, doctor_id: Uuid, slots: SelectedSlotSet) -> Result<DoctorAvailability>;
}

/// Durable home of appointment records.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// `None` when the slot was taken between admission and the write.
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Option<Appointment>>;

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>>;

    async fn appointments_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>>;

    async fn appointments_for_doctor_on(&self, doctor_id: Uuid, date: String) -> Result<Vec<Appointment>>;

    /// Compare-and-set on the status; `None` when it is no longer `expected`.
    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>>;
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AvailabilityStore for PgStore {
    async fn load_availability(&self, doctor_id: Uuid) -> Result<Option<DoctorAvailability>> {
        repositories::availability::get_doctor_availability(&self.pool, doctor_id).await
    }

    async fn save_selected_slots(&self, doctor_id: Uuid, slots: SelectedSlotSet) -> Result<DoctorAvailability> {
        repositories::availability::save_selected_slots(&self.pool, doctor_id, &slots).await
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn create_appointment(&self, appointment: NewAppointment) -> Result<Option<Appointment>> {
        repositories::appointment::create_appointment(&self.pool, &appointment).await
    }

    async fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>> {
        repositories::appointment::get_appointment_by_id(&self.pool, id).await
    }

    async fn appointments_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        repositories::appointment::get_appointments_by_doctor_id(&self.pool, doctor_id).await
    }

    async fn appointments_for_doctor_on(&self, doctor_id: Uuid, date: String) -> Result<Vec<Appointment>> {
        repositories::appointment::get_appointments_by_doctor_and_date(&self.pool, doctor_id, &date).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>> {
        repositories::appointment::update_appointment_status(&self.pool, id, &expected, &status).await
    }
}
