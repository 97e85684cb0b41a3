use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use clinicly_core::models::appointment::{
    AppointmentDetails, UpsertAppointmentRequest, UpsertAppointmentResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::ClinicMember,
        error_handling::{AppError, AppJson, AppPath},
    },
    services::booking,
};

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
) -> Result<Json<Vec<AppointmentDetails>>, AppError> {
    let appointments = booking::list_appointments(state.store.as_ref(), member.clinic.id).await?;
    Ok(Json(appointments))
}

/// Books a new appointment, or moves an existing one when the body has an `id`.
///
/// A time that is taken or outside the doctor's hours answers 409.
#[axum::debug_handler]
pub async fn upsert_appointment(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppJson(payload): AppJson<UpsertAppointmentRequest>,
) -> Result<Json<UpsertAppointmentResponse>, AppError> {
    let response = booking::upsert_appointment(
        state.store.as_ref(),
        member.clinic.id,
        payload,
        state.config.slot_interval,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    booking::delete_appointment(state.store.as_ref(), member.clinic.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
