use crate::models::{DbAppointment, DbAppointmentDetails};
use chrono::{DateTime, Utc};
use clinicly_core::models::appointment::NewAppointment;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, clinic_id, doctor_id, patient_id, date, appointment_price_in_cents,
               created_at, updated_at
        FROM appointments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

pub async fn get_appointments_by_clinic_id(
    pool: &Pool<Postgres>,
    clinic_id: Uuid,
) -> Result<Vec<DbAppointmentDetails>> {
    let appointments = sqlx::query_as::<_, DbAppointmentDetails>(
        r#"
        SELECT a.id, a.clinic_id, a.doctor_id, a.patient_id, a.date,
               a.appointment_price_in_cents, a.created_at, a.updated_at,
               d.name AS doctor_name,
               d.speciality AS doctor_speciality,
               d.appointment_price_in_cents AS doctor_price_in_cents,
               p.name AS patient_name,
               p.email AS patient_email,
               p.phone_number AS patient_phone_number
        FROM appointments a
        JOIN doctors d ON d.id = a.doctor_id
        JOIN patients p ON p.id = a.patient_id
        WHERE a.clinic_id = $1
        ORDER BY a.date DESC
        "#,
    )
    .bind(clinic_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Appointments of a doctor with `from <= date < to`.
pub async fn get_appointments_by_doctor_between(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, clinic_id, doctor_id, patient_id, date, appointment_price_in_cents,
               created_at, updated_at
        FROM appointments
        WHERE doctor_id = $1 AND date >= $2 AND date < $3
        ORDER BY date ASC
        "#,
    )
    .bind(doctor_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    appointment: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor_id={}, date={}",
        id, appointment.doctor_id, appointment.date
    );

    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (
            id, clinic_id, doctor_id, patient_id, date,
            appointment_price_in_cents, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, clinic_id, doctor_id, patient_id, date, appointment_price_in_cents,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(appointment.clinic_id)
    .bind(appointment.doctor_id)
    .bind(appointment.patient_id)
    .bind(appointment.date)
    .bind(appointment.appointment_price_in_cents)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn update_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    appointment: &NewAppointment,
) -> Result<Option<DbAppointment>> {
    tracing::debug!(
        "Updating appointment: id={}, doctor_id={}, date={}",
        id, appointment.doctor_id, appointment.date
    );

    let updated = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET clinic_id = $2, doctor_id = $3, patient_id = $4, date = $5,
            appointment_price_in_cents = $6, updated_at = $7
        WHERE id = $1
        RETURNING id, clinic_id, doctor_id, patient_id, date, appointment_price_in_cents,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(appointment.clinic_id)
    .bind(appointment.doctor_id)
    .bind(appointment.patient_id)
    .bind(appointment.date)
    .bind(appointment.appointment_price_in_cents)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_appointment(pool: &Pool<Postgres>, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// True when the error chain carries a Postgres unique violation.
pub fn is_unique_violation(report: &eyre::Report) -> bool {
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|error| error.as_database_error())
        .map(|error| error.is_unique_violation())
        .unwrap_or(false)
}
