use axum::Json;
use clinicly_core::models::user::SessionUser;

use crate::middleware::auth::AuthUser;

/// Returns the signed-in user and their acting clinic.
pub async fn me(AuthUser(user): AuthUser) -> Json<SessionUser> {
    Json(user)
}
