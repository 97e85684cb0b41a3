use crate::models::DbSessionUser;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};

/// Looks up the user behind an unexpired session token, together with the
/// clinic they joined first.
pub async fn get_session_user(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbSessionUser>> {
    let user = sqlx::query_as::<_, DbSessionUser>(
        r#"
        SELECT u.id, u.name, u.email, u.plan,
               c.id AS clinic_id, c.name AS clinic_name
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        LEFT JOIN LATERAL (
            SELECT cl.id, cl.name
            FROM users_to_clinics uc
            JOIN clinics cl ON cl.id = uc.clinic_id
            WHERE uc.user_id = u.id
            ORDER BY uc.created_at ASC
            LIMIT 1
        ) c ON TRUE
        WHERE s.token = $1 AND s.expires_at > $2
        "#,
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Returns the number of users updated (0 or 1).
pub async fn update_user_plan(
    pool: &Pool<Postgres>,
    user_id: &str,
    plan: Option<&str>,
    stripe_customer_id: Option<&str>,
    stripe_subscription_id: Option<&str>,
) -> Result<u64> {
    tracing::debug!("Updating plan for user {}: plan={:?}", user_id, plan);

    let result = sqlx::query(
        r#"
        UPDATE users
        SET plan = $2, stripe_customer_id = $3, stripe_subscription_id = $4, updated_at = $5
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(plan)
    .bind(stripe_customer_id)
    .bind(stripe_subscription_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
