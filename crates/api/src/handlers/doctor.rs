use axum::{Json, extract::State, http::StatusCode};
use clinicly_core::models::doctor::{Doctor, UpsertDoctorRequest};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::ClinicMember,
        error_handling::{AppError, AppJson, AppPath},
    },
    services::directory,
};

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctors = directory::list_doctors(state.store.as_ref(), member.clinic.id).await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn upsert_doctor(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppJson(payload): AppJson<UpsertDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let doctor = directory::upsert_doctor(state.store.as_ref(), member.clinic.id, payload).await?;
    Ok(Json(doctor))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    directory::delete_doctor(state.store.as_ref(), member.clinic.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
