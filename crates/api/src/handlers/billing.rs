use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use chrono::Utc;
use clinicly_core::errors::ClinicError;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError, services::stripe};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Receives Stripe events. The raw body is needed to check the signature.
#[axum::debug_handler]
pub async fn stripe_webhook(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let secret = state.config.stripe_webhook_secret.as_deref().ok_or_else(|| {
        ClinicError::Internal("Stripe webhook secret not configured".into())
    })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ClinicError::Validation("Stripe signature not found".to_string()))?;

    if let Err(err) = stripe::verify_signature(
        signature,
        &body,
        secret,
        state.config.stripe_webhook_tolerance,
        Utc::now().timestamp(),
    ) {
        warn!("Rejected webhook: {}", err);
        return Err(err.into());
    }

    let action = stripe::parse_event(&body).inspect_err(|err| warn!("Rejected webhook: {}", err))?;
    stripe::apply(state.store.as_ref(), action).await?;

    Ok(Json(json!({ "received": true })))
}
