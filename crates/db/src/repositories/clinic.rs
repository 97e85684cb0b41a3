use crate::models::DbClinic;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Creates the clinic and the membership row in one transaction.
pub async fn create_clinic(pool: &Pool<Postgres>, user_id: &str, name: &str) -> Result<DbClinic> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating clinic: id={}, name={}, owner={}", id, name, user_id);

    let mut tx = pool.begin().await?;

    let clinic = sqlx::query_as::<_, DbClinic>(
        r#"
        INSERT INTO clinics (id, name, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        RETURNING id, name, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO users_to_clinics (user_id, clinic_id, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(clinic)
}
