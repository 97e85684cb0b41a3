use crate::models::DbPatient;
use chrono::Utc;
use clinicly_core::models::patient::NewPatient;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_patient_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbPatient>> {
    let patient = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, clinic_id, name, email, phone_number, sex, created_at, updated_at
        FROM patients
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(patient)
}

pub async fn get_patients_by_clinic_id(
    pool: &Pool<Postgres>,
    clinic_id: Uuid,
) -> Result<Vec<DbPatient>> {
    let patients = sqlx::query_as::<_, DbPatient>(
        r#"
        SELECT id, clinic_id, name, email, phone_number, sex, created_at, updated_at
        FROM patients
        WHERE clinic_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(clinic_id)
    .fetch_all(pool)
    .await?;

    Ok(patients)
}

pub async fn create_patient(pool: &Pool<Postgres>, patient: &NewPatient) -> Result<DbPatient> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating patient: id={}, clinic_id={}", id, patient.clinic_id);

    let created = sqlx::query_as::<_, DbPatient>(
        r#"
        INSERT INTO patients (id, clinic_id, name, email, phone_number, sex, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING id, clinic_id, name, email, phone_number, sex, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(patient.clinic_id)
    .bind(&patient.name)
    .bind(&patient.email)
    .bind(&patient.phone_number)
    .bind(patient.sex.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn update_patient(
    pool: &Pool<Postgres>,
    id: Uuid,
    patient: &NewPatient,
) -> Result<Option<DbPatient>> {
    let updated = sqlx::query_as::<_, DbPatient>(
        r#"
        UPDATE patients
        SET name = $2, email = $3, phone_number = $4, sex = $5, updated_at = $6
        WHERE id = $1
        RETURNING id, clinic_id, name, email, phone_number, sex, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&patient.name)
    .bind(&patient.email)
    .bind(&patient.phone_number)
    .bind(patient.sex.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_patient(pool: &Pool<Postgres>, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
