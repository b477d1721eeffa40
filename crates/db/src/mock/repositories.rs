use async_trait::async_trait;
use careslot_core::{
    booking::NewAppointment,
    models::{
        appointment::{Appointment, AppointmentStatus},
        availability::{DoctorAvailability, SelectedSlotSet},
    },
};
use mockall::mock;
use uuid::Uuid;

use crate::store::{AppointmentStore, AvailabilityStore};

// Mock stores for testing
mock! {
    pub AvailabilityRepo {}

    #[async_trait]
    impl AvailabilityStore for AvailabilityRepo {
        async fn load_availability(&self, doctor_id: Uuid) -> eyre::Result<Option<DoctorAvailability>>;

        async fn save_selected_slots(
            &self,
            doctor_id: Uuid,
            slots: SelectedSlotSet,
        ) -> eyre::Result<DoctorAvailability>;
    }
}

mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn create_appointment(&self, appointment: NewAppointment) -> eyre::Result<Option<Appointment>>;

        async fn find_appointment(&self, id: Uuid) -> eyre::Result<Option<Appointment>>;

        async fn appointments_for_doctor(&self, doctor_id: Uuid) -> eyre::Result<Vec<Appointment>>;

        async fn appointments_for_doctor_on(
            &self,
            doctor_id: Uuid,
            date: String,
        ) -> eyre::Result<Vec<Appointment>>;

        async fn update_status(
            &self,
            id: Uuid,
            expected: AppointmentStatus,
            status: AppointmentStatus,
        ) -> eyre::Result<Option<Appointment>>;
    }
}
