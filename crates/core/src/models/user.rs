use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};
use crate::models::clinic::ClinicRef;

/// Plan granted when the billing provider reports a paid invoice.
pub const ESSENTIAL_PLAN: &str = "essential";

/// A user resolved from a live session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: Option<String>,
    pub clinic: Option<ClinicRef>,
}

impl SessionUser {
    /// Returns the acting clinic, or `Unauthorized` when the user has none.
    pub fn require_clinic(&self) -> ClinicResult<&ClinicRef> {
        self.clinic.as_ref().ok_or_else(|| {
            ClinicError::Unauthorized("User must be linked to a clinic".to_string())
        })
    }

    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanActivation {
    pub plan: String,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: Option<String>,
}
