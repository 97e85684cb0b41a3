use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClinic {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctor {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub name: String,
    pub speciality: String,
    pub avatar_image_url: Option<String>,
    pub available_from_weekday: i16,
    pub available_to_weekday: i16,
    pub available_from_time: NaiveTime,
    pub available_to_time: NaiveTime,
    pub appointment_price_in_cents: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPatient {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub sex: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    pub appointment_price_in_cents: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment row joined with its doctor and patient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointmentDetails {
    pub id: Uuid,
    pub clinic_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    pub appointment_price_in_cents: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub doctor_name: String,
    pub doctor_speciality: String,
    pub doctor_price_in_cents: i32,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone_number: String,
}

/// Session lookup row; the clinic columns are null for users without one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: Option<String>,
    pub clinic_id: Option<Uuid>,
    pub clinic_name: Option<String>,
}
