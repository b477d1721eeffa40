use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create doctors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctors (
            id UUID PRIMARY KEY,
            available_days TEXT[] NOT NULL DEFAULT '{}',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create doctor_time_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctor_time_slots (
            doctor_id UUID NOT NULL REFERENCES doctors(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            slot_id VARCHAR(32) NOT NULL,
            day VARCHAR(16) NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            PRIMARY KEY (doctor_id, day, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY,
            doctor_id UUID NOT NULL,
            patient_id UUID NOT NULL,
            date VARCHAR(10) NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_doctor_time_slots_doctor_id ON doctor_time_slots(doctor_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_id ON appointments(doctor_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id)",
        // Last line of defence against two bookings racing for one slot.
        // Only identical start times collide here; overlaps with different
        // starts (after a grid change) are caught by admission alone.
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_doctor_slot \
         ON appointments(doctor_id, date, start_time) WHERE status <> 'rejected'",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
