use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::AvailabilityWindow;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub name: String,
    pub speciality: String,
    pub avatar_image_url: Option<String>,
    /// 0 = Sunday .. 6 = Saturday
    pub available_from_weekday: i16,
    pub available_to_weekday: i16,
    pub available_from_time: NaiveTime,
    pub available_to_time: NaiveTime,
    pub appointment_price_in_cents: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn availability(&self) -> AvailabilityWindow {
        AvailabilityWindow {
            from_weekday: self.available_from_weekday,
            to_weekday: self.available_to_weekday,
            from_time: self.available_from_time,
            to_time: self.available_to_time,
        }
    }

    pub fn summary(&self) -> DoctorSummary {
        DoctorSummary {
            id: self.id,
            name: self.name.clone(),
            speciality: self.speciality.clone(),
            appointment_price_in_cents: self.appointment_price_in_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub speciality: String,
    pub appointment_price_in_cents: i32,
}

/// Create-or-update payload; `id` selects the update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDoctorRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub speciality: String,
    pub avatar_image_url: Option<String>,
    pub available_from_weekday: i16,
    pub available_to_weekday: i16,
    pub available_from_time: String,
    pub available_to_time: String,
    /// Major currency units, converted to cents before storage.
    pub appointment_price: f64,
}

/// Validated doctor fields as handed to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDoctor {
    pub clinic_id: Uuid,
    pub name: String,
    pub speciality: String,
    pub avatar_image_url: Option<String>,
    pub available_from_weekday: i16,
    pub available_to_weekday: i16,
    pub available_from_time: NaiveTime,
    pub available_to_time: NaiveTime,
    pub appointment_price_in_cents: i32,
}
