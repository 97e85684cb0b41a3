use crate::models::DbDoctor;
use chrono::Utc;
use clinicly_core::models::doctor::NewDoctor;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const DOCTOR_COLUMNS: &str = "id, clinic_id, name, speciality, avatar_image_url, \
    available_from_weekday, available_to_weekday, available_from_time, available_to_time, \
    appointment_price_in_cents, created_at, updated_at";

pub async fn get_doctor_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbDoctor>> {
    let doctor = sqlx::query_as::<_, DbDoctor>(&format!(
        "SELECT {} FROM doctors WHERE id = $1",
        DOCTOR_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(doctor)
}

pub async fn get_doctors_by_clinic_id(
    pool: &Pool<Postgres>,
    clinic_id: Uuid,
) -> Result<Vec<DbDoctor>> {
    let doctors = sqlx::query_as::<_, DbDoctor>(&format!(
        "SELECT {} FROM doctors WHERE clinic_id = $1 ORDER BY name ASC",
        DOCTOR_COLUMNS
    ))
    .bind(clinic_id)
    .fetch_all(pool)
    .await?;

    Ok(doctors)
}

pub async fn create_doctor(pool: &Pool<Postgres>, doctor: &NewDoctor) -> Result<DbDoctor> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating doctor: id={}, clinic_id={}", id, doctor.clinic_id);

    let created = sqlx::query_as::<_, DbDoctor>(&format!(
        r#"
        INSERT INTO doctors (
            id, clinic_id, name, speciality, avatar_image_url,
            available_from_weekday, available_to_weekday,
            available_from_time, available_to_time,
            appointment_price_in_cents, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {}
        "#,
        DOCTOR_COLUMNS
    ))
    .bind(id)
    .bind(doctor.clinic_id)
    .bind(&doctor.name)
    .bind(&doctor.speciality)
    .bind(&doctor.avatar_image_url)
    .bind(doctor.available_from_weekday)
    .bind(doctor.available_to_weekday)
    .bind(doctor.available_from_time)
    .bind(doctor.available_to_time)
    .bind(doctor.appointment_price_in_cents)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn update_doctor(
    pool: &Pool<Postgres>,
    id: Uuid,
    doctor: &NewDoctor,
) -> Result<Option<DbDoctor>> {
    let updated = sqlx::query_as::<_, DbDoctor>(&format!(
        r#"
        UPDATE doctors
        SET name = $2, speciality = $3, avatar_image_url = $4,
            available_from_weekday = $5, available_to_weekday = $6,
            available_from_time = $7, available_to_time = $8,
            appointment_price_in_cents = $9, updated_at = $10
        WHERE id = $1
        RETURNING {}
        "#,
        DOCTOR_COLUMNS
    ))
    .bind(id)
    .bind(&doctor.name)
    .bind(&doctor.speciality)
    .bind(&doctor.avatar_image_url)
    .bind(doctor.available_from_weekday)
    .bind(doctor.available_to_weekday)
    .bind(doctor.available_from_time)
    .bind(doctor.available_to_time)
    .bind(doctor.appointment_price_in_cents)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_doctor(pool: &Pool<Postgres>, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
