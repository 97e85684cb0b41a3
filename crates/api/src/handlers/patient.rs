use axum::{Json, extract::State, http::StatusCode};
use clinicly_core::models::patient::{Patient, UpsertPatientRequest};
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
pub async fn list_patients(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
) -> Result<Json<Vec<Patient>>, AppError> {
    let patients = directory::list_patients(state.store.as_ref(), member.clinic.id).await?;
    Ok(Json(patients))
}

#[axum::debug_handler]
pub async fn upsert_patient(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppJson(payload): AppJson<UpsertPatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let patient = directory::upsert_patient(state.store.as_ref(), member.clinic.id, payload).await?;
    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    directory::delete_patient(state.store.as_ref(), member.clinic.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
