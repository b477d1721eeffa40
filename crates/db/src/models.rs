use careslot_core::{
    errors::ClinicError,
    models::{appointment::Appointment, time_slot::TimeSlot},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub available_days: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctorTimeSlot {
    pub doctor_id: Uuid,
    pub position: i32,
    pub slot_id: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbDoctorTimeSlot> for TimeSlot {
    type Error = ClinicError;

    fn try_from(row: DbDoctorTimeSlot) -> Result<Self, Self::Error> {
        Ok(TimeSlot {
            id: row.slot_id,
            day: row.day.parse()?,
            start_time: row.start_time.parse()?,
            end_time: row.end_time.parse()?,
            is_available: row.is_available,
        })
    }
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.into(),
            created_at: row.created_at,
        }
    }
}
