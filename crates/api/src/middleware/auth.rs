//! # Authentication Module
//!
//! Resolves the `Authorization: Bearer <token>` header to the signed-in user
//! and, for clinic-scoped routes, to the clinic they act for.
//!
//! Two extractors are provided:
//!
//! - [`AuthUser`]: any user with a live session
//! - [`ClinicMember`]: a user linked to a clinic, holding a plan when
//!   subscriptions are required

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use clinicly_core::{
    errors::{ClinicError, ClinicResult},
    models::{clinic::ClinicRef, user::SessionUser},
};

use crate::{ApiState, middleware::error_handling::AppError};

/// The user behind the request's session token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

/// A session user together with the clinic every operation is scoped to.
#[derive(Debug, Clone)]
pub struct ClinicMember {
    pub user: SessionUser,
    pub clinic: ClinicRef,
}

/// Pulls the token out of a `Bearer` authorization header.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Checks that the user may act for a clinic.
///
/// A missing clinic is reported before a missing plan.
pub fn acting_clinic(user: &SessionUser, require_subscription: bool) -> ClinicResult<ClinicRef> {
    let clinic = user.require_clinic()?.clone();

    if require_subscription && !user.has_plan() {
        return Err(ClinicError::Forbidden(
            "An active subscription is required".to_string(),
        ));
    }

    Ok(clinic)
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ClinicError::Unauthorized("Missing session token".to_string()))?;

        let user = state
            .store
            .find_session_user(token)
            .await?
            .ok_or_else(|| ClinicError::Unauthorized("Invalid or expired session".to_string()))?;

        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for ClinicMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        let clinic = acting_clinic(&user, state.config.require_subscription)?;

        Ok(ClinicMember { user, clinic })
    }
}
