use axum::{Json, extract::State, http::StatusCode};
use clinicly_core::models::clinic::{Clinic, CreateClinicRequest};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{
        auth::AuthUser,
        error_handling::{AppError, AppJson},
    },
    services::directory,
};

#[axum::debug_handler]
pub async fn create_clinic(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CreateClinicRequest>,
) -> Result<(StatusCode, Json<Clinic>), AppError> {
    let clinic = directory::create_clinic(state.store.as_ref(), &user, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(clinic)))
}
