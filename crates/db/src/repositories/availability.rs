use careslot_core::models::{
    availability::{DoctorAvailability, SelectedSlotSet},
    time_slot::TimeSlot,
};
use chrono::Utc;
use eyre::{Result, WrapErr};
use sqlx::{Pool, Postgres};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{DbDoctor, DbDoctorTimeSlot};

pub async fn get_doctor_availability(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
) -> Result<Option<DoctorAvailability>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(
        r#"
        SELECT id, available_days, updated_at
        FROM doctors
        WHERE id = $1
        "#,
    )
    .bind(doctor_id)
    .fetch_optional(pool)
    .await?;

    let Some(doctor) = doctor else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, DbDoctorTimeSlot>(
        r#"
        SELECT doctor_id, position, slot_id, day, start_time, end_time, is_available
        FROM doctor_time_slots
        WHERE doctor_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    let slots = rows
        .into_iter()
        .map(TimeSlot::try_from)
        .collect::<Result<SelectedSlotSet, _>>()
        .wrap_err_with(|| format!("Stored time slots of doctor {doctor_id} are unreadable"))?;

    let availability = DoctorAvailability::new(doctor.id, slots, doctor.updated_at);
    let derived: Vec<String> = availability
        .available_days()
        .iter()
        .map(ToString::to_string)
        .collect();
    if derived != doctor.available_days {
        warn!(
            %doctor_id,
            stored = ?doctor.available_days,
            ?derived,
            "Stored available days drifted from the selected slots"
        );
    }

    Ok(Some(availability))
}

/// Replaces a doctor's selected slots and rewrites the derived days.
///
/// Callers validate the set first; this only persists it.
pub async fn save_selected_slots(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    slots: &SelectedSlotSet,
) -> Result<DoctorAvailability> {
    let now = Utc::now();
    let availability = DoctorAvailability::new(doctor_id, slots.clone(), now);
    let available_days: Vec<String> = availability
        .available_days()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO doctors (id, available_days, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE
        SET available_days = EXCLUDED.available_days,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(doctor_id)
    .bind(&available_days)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM doctor_time_slots
        WHERE doctor_id = $1
        "#,
    )
    .bind(doctor_id)
    .execute(&mut *tx)
    .await?;

    for (position, slot) in slots.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO doctor_time_slots
                (doctor_id, position, slot_id, day, start_time, end_time, is_available)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(doctor_id)
        .bind(i32::try_from(position)?)
        .bind(&slot.id)
        .bind(slot.day.as_str())
        .bind(slot.start_time.to_string())
        .bind(slot.end_time.to_string())
        .bind(slot.is_available)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(%doctor_id, slots = slots.len(), days = ?available_days, "Saved doctor availability");
    Ok(availability)
}
