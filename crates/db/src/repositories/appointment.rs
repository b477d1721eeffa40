use careslot_core::{
    booking::NewAppointment,
    models::appointment::{Appointment, AppointmentStatus},
};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::DbAppointment;

/// Inserts an admitted booking.
///
/// Returns `None` when the store already holds a live appointment for the
/// same doctor, date and start time.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<Option<Appointment>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let result = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, doctor_id, patient_id, date, start_time, end_time, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, doctor_id, patient_id, date, start_time, end_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(appointment.doctor_id)
    .bind(appointment.patient_id)
    .bind(&appointment.date)
    .bind(appointment.start_time.to_string())
    .bind(appointment.end_time.to_string())
    .bind(appointment.status.as_str())
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => {
            info!(appointment_id = %row.id, doctor_id = %row.doctor_id, date = %row.date, "Created appointment");
            Ok(Some(row.into()))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(
                doctor_id = %appointment.doctor_id,
                date = %appointment.date,
                start_time = %appointment.start_time,
                "Slot was taken by a concurrent booking"
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_appointment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Appointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_id, patient_id, date, start_time, end_time, status, created_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment.map(Into::into))
}

pub async fn get_appointments_by_doctor_id(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
) -> Result<Vec<Appointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_id, patient_id, date, start_time, end_time, status, created_at
        FROM appointments
        WHERE doctor_id = $1
        ORDER BY date ASC, start_time ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments.into_iter().map(Into::into).collect())
}

pub async fn get_appointments_by_doctor_and_date(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    date: &str,
) -> Result<Vec<Appointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, doctor_id, patient_id, date, start_time, end_time, status, created_at
        FROM appointments
        WHERE doctor_id = $1 AND date = $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(doctor_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(appointments.into_iter().map(Into::into).collect())
}

/// Moves an appointment from `expected` to `status`.
///
/// Returns `None` when the row is missing or no longer has the `expected`
/// status, so a concurrent decision is never overwritten.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: &AppointmentStatus,
    status: &AppointmentStatus,
) -> Result<Option<Appointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2
        WHERE id = $1 AND status = $3
        RETURNING id, doctor_id, patient_id, date, start_time, end_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(expected.as_str())
    .fetch_optional(pool)
    .await?;

    match &appointment {
        Some(appointment) => {
            info!(appointment_id = %appointment.id, status = %appointment.status, "Updated appointment status");
        }
        None => {
            warn!(appointment_id = %id, expected = %expected.as_str(), "Appointment status changed before update");
        }
    }

    Ok(appointment.map(Into::into))
}
