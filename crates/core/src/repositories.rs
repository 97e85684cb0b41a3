//! Storage seams used by the booking and directory workflows.
//!
//! Lookups return `Ok(None)` for missing rows; ownership checks are left to
//! the callers, which compare `clinic_id` against the acting clinic.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::ClinicResult;
use crate::models::{
    appointment::{Appointment, AppointmentDetails, NewAppointment},
    clinic::Clinic,
    doctor::{Doctor, NewDoctor},
    patient::{NewPatient, Patient},
    user::{PlanActivation, SessionUser},
};

#[async_trait]
pub trait ClinicRepository: Send + Sync {
    /// Creates a clinic and links `user_id` to it.
    async fn create_clinic(&self, user_id: &str, name: &str) -> ClinicResult<Clinic>;
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn get_doctor(&self, id: Uuid) -> ClinicResult<Option<Doctor>>;

    async fn list_doctors(&self, clinic_id: Uuid) -> ClinicResult<Vec<Doctor>>;

    async fn insert_doctor(&self, doctor: NewDoctor) -> ClinicResult<Doctor>;

    async fn update_doctor(&self, id: Uuid, doctor: NewDoctor) -> ClinicResult<Doctor>;

    /// Removes the doctor and, by cascade, their appointments.
    async fn delete_doctor(&self, id: Uuid) -> ClinicResult<()>;
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>>;

    async fn list_patients(&self, clinic_id: Uuid) -> ClinicResult<Vec<Patient>>;

    async fn insert_patient(&self, patient: NewPatient) -> ClinicResult<Patient>;

    async fn update_patient(&self, id: Uuid, patient: NewPatient) -> ClinicResult<Patient>;

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<()>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>>;

    /// Appointments of a clinic, newest first, with doctor and patient attached.
    async fn list_appointments(&self, clinic_id: Uuid) -> ClinicResult<Vec<AppointmentDetails>>;

    async fn list_doctor_appointments_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ClinicResult<Vec<Appointment>>;

    /// Fails with `SlotUnavailable` when the doctor already has an
    /// appointment at the same timestamp.
    async fn insert_appointment(&self, appointment: NewAppointment) -> ClinicResult<Appointment>;

    /// Same uniqueness rule as [`AppointmentRepository::insert_appointment`],
    /// ignoring the row being updated.
    async fn update_appointment(
        &self,
        id: Uuid,
        appointment: NewAppointment,
    ) -> ClinicResult<Appointment>;

    async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Resolves an unexpired session token to its user and acting clinic.
    async fn find_session_user(&self, token: &str) -> ClinicResult<Option<SessionUser>>;

    /// Fails with `NotFound` when no user has this id.
    async fn activate_plan(&self, user_id: &str, activation: PlanActivation) -> ClinicResult<()>;

    /// Fails with `NotFound` when no user has this id.
    async fn clear_plan(&self, user_id: &str) -> ClinicResult<()>;
}

/// Everything the API needs from storage.
pub trait Store:
    ClinicRepository + DoctorRepository + PatientRepository + AppointmentRepository + UserRepository
{
}

impl<T> Store for T where
    T: ClinicRepository
        + DoctorRepository
        + PatientRepository
        + AppointmentRepository
        + UserRepository
{
}
