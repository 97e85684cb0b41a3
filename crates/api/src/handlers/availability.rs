//! # Availability Handlers
//!
//! Read-only views of a doctor's calendar used by the booking form: whether a
//! date falls on one of the doctor's working days, and the slot list for that
//! date with taken slots marked unavailable.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use clinicly_core::availability::TimeSlot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::ClinicMember,
        error_handling::{AppError, AppPath, AppQuery},
    },
    services::booking,
};

/// Query parameters for the availability endpoints
///
/// * `date` - Day to inspect, `YYYY-MM-DD`
/// * `excludeAppointmentId` - Appointment being edited; its own slot stays free
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub exclude_appointment_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateAvailability {
    pub available: bool,
}

/// ```text
/// GET /api/doctors/:id/available-times?date=2025-06-02
/// ```
#[axum::debug_handler]
pub async fn available_times(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppPath(doctor_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = booking::available_times_for(
        state.store.as_ref(),
        member.clinic.id,
        doctor_id,
        query.date,
        query.exclude_appointment_id,
        state.config.slot_interval,
    )
    .await?;

    Ok(Json(slots))
}

/// ```text
/// GET /api/doctors/:id/availability?date=2025-06-02
/// ```
#[axum::debug_handler]
pub async fn date_availability(
    State(state): State<Arc<ApiState>>,
    member: ClinicMember,
    AppPath(doctor_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<DateAvailability>, AppError> {
    let available =
        booking::is_doctor_available_on(state.store.as_ref(), member.clinic.id, doctor_id, query.date)
            .await?;

    Ok(Json(DateAvailability { available }))
}
