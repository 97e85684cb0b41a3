//! PostgreSQL implementation of the core repository traits.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use clinicly_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{Appointment, AppointmentDetails, NewAppointment},
        clinic::{Clinic, ClinicRef},
        doctor::{Doctor, DoctorSummary, NewDoctor},
        patient::{NewPatient, Patient, PatientSummary},
        user::{PlanActivation, SessionUser},
    },
    repositories::{
        AppointmentRepository, ClinicRepository, DoctorRepository, PatientRepository,
        UserRepository,
    },
};
use uuid::Uuid;

use crate::{
    models::{
        DbAppointment, DbAppointmentDetails, DbClinic, DbDoctor, DbPatient, DbSessionUser,
    },
    repositories::{appointment, clinic, doctor, patient, user},
    DbPool,
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl From<DbClinic> for Clinic {
    fn from(row: DbClinic) -> Self {
        Clinic {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

impl From<DbDoctor> for Doctor {
    fn from(row: DbDoctor) -> Self {
        Doctor {
            id: row.id,
            clinic_id: row.clinic_id,
            name: row.name,
            speciality: row.speciality,
            avatar_image_url: row.avatar_image_url,
            available_from_weekday: row.available_from_weekday,
            available_to_weekday: row.available_to_weekday,
            available_from_time: row.available_from_time,
            available_to_time: row.available_to_time,
            appointment_price_in_cents: row.appointment_price_in_cents,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbPatient> for Patient {
    type Error = ClinicError;

    fn try_from(row: DbPatient) -> Result<Self, Self::Error> {
        Ok(Patient {
            id: row.id,
            clinic_id: row.clinic_id,
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            sex: row.sex.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            clinic_id: row.clinic_id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            date: row.date,
            appointment_price_in_cents: row.appointment_price_in_cents,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbAppointmentDetails> for AppointmentDetails {
    fn from(row: DbAppointmentDetails) -> Self {
        AppointmentDetails {
            doctor: DoctorSummary {
                id: row.doctor_id,
                name: row.doctor_name,
                speciality: row.doctor_speciality,
                appointment_price_in_cents: row.doctor_price_in_cents,
            },
            patient: PatientSummary {
                id: row.patient_id,
                name: row.patient_name,
                email: row.patient_email,
                phone_number: row.patient_phone_number,
            },
            appointment: Appointment {
                id: row.id,
                clinic_id: row.clinic_id,
                doctor_id: row.doctor_id,
                patient_id: row.patient_id,
                date: row.date,
                appointment_price_in_cents: row.appointment_price_in_cents,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

impl From<DbSessionUser> for SessionUser {
    fn from(row: DbSessionUser) -> Self {
        let clinic = match (row.clinic_id, row.clinic_name) {
            (Some(id), Some(name)) => Some(ClinicRef { id, name }),
            _ => None,
        };

        SessionUser {
            id: row.id,
            name: row.name,
            email: row.email,
            plan: row.plan,
            clinic,
        }
    }
}

/// Maps a write failure, turning the `(doctor_id, date)` unique violation
/// into `SlotUnavailable`.
fn appointment_write_error(report: eyre::Report) -> ClinicError {
    if appointment::is_unique_violation(&report) {
        ClinicError::SlotUnavailable(
            "The doctor already has an appointment at this time".to_string(),
        )
    } else {
        ClinicError::Database(report)
    }
}

#[async_trait]
impl ClinicRepository for PgStore {
    async fn create_clinic(&self, user_id: &str, name: &str) -> ClinicResult<Clinic> {
        let row = clinic::create_clinic(&self.pool, user_id, name).await?;
        Ok(row.into())
    }
}

#[async_trait]
impl DoctorRepository for PgStore {
    async fn get_doctor(&self, id: Uuid) -> ClinicResult<Option<Doctor>> {
        let row = doctor::get_doctor_by_id(&self.pool, id).await?;
        Ok(row.map(Doctor::from))
    }

    async fn list_doctors(&self, clinic_id: Uuid) -> ClinicResult<Vec<Doctor>> {
        let rows = doctor::get_doctors_by_clinic_id(&self.pool, clinic_id).await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    async fn insert_doctor(&self, new_doctor: NewDoctor) -> ClinicResult<Doctor> {
        let row = doctor::create_doctor(&self.pool, &new_doctor).await?;
        Ok(row.into())
    }

    async fn update_doctor(&self, id: Uuid, new_doctor: NewDoctor) -> ClinicResult<Doctor> {
        doctor::update_doctor(&self.pool, id, &new_doctor)
            .await?
            .map(Doctor::from)
            .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))
    }

    async fn delete_doctor(&self, id: Uuid) -> ClinicResult<()> {
        if doctor::delete_doctor(&self.pool, id).await? == 0 {
            return Err(ClinicError::NotFound(format!("Doctor with ID {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl PatientRepository for PgStore {
    async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        patient::get_patient_by_id(&self.pool, id)
            .await?
            .map(Patient::try_from)
            .transpose()
    }

    async fn list_patients(&self, clinic_id: Uuid) -> ClinicResult<Vec<Patient>> {
        patient::get_patients_by_clinic_id(&self.pool, clinic_id)
            .await?
            .into_iter()
            .map(Patient::try_from)
            .collect()
    }

    async fn insert_patient(&self, new_patient: NewPatient) -> ClinicResult<Patient> {
        let row = patient::create_patient(&self.pool, &new_patient).await?;
        row.try_into()
    }

    async fn update_patient(&self, id: Uuid, new_patient: NewPatient) -> ClinicResult<Patient> {
        patient::update_patient(&self.pool, id, &new_patient)
            .await?
            .ok_or_else(|| ClinicError::NotFound(format!("Patient with ID {} not found", id)))?
            .try_into()
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<()> {
        if patient::delete_patient(&self.pool, id).await? == 0 {
            return Err(ClinicError::NotFound(format!("Patient with ID {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for PgStore {
    async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        let row = appointment::get_appointment_by_id(&self.pool, id).await?;
        Ok(row.map(Appointment::from))
    }

    async fn list_appointments(&self, clinic_id: Uuid) -> ClinicResult<Vec<AppointmentDetails>> {
        let rows = appointment::get_appointments_by_clinic_id(&self.pool, clinic_id).await?;
        Ok(rows.into_iter().map(AppointmentDetails::from).collect())
    }

    async fn list_doctor_appointments_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ClinicResult<Vec<Appointment>> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let rows =
            appointment::get_appointments_by_doctor_between(&self.pool, doctor_id, start, end)
                .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn insert_appointment(&self, new_appointment: NewAppointment) -> ClinicResult<Appointment> {
        let row = appointment::create_appointment(&self.pool, &new_appointment)
            .await
            .map_err(appointment_write_error)?;
        Ok(row.into())
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        new_appointment: NewAppointment,
    ) -> ClinicResult<Appointment> {
        appointment::update_appointment(&self.pool, id, &new_appointment)
            .await
            .map_err(appointment_write_error)?
            .map(Appointment::from)
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()> {
        if appointment::delete_appointment(&self.pool, id).await? == 0 {
            return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_session_user(&self, token: &str) -> ClinicResult<Option<SessionUser>> {
        let row = user::get_session_user(&self.pool, token).await?;
        Ok(row.map(SessionUser::from))
    }

    async fn activate_plan(&self, user_id: &str, activation: PlanActivation) -> ClinicResult<()> {
        let updated = user::update_user_plan(
            &self.pool,
            user_id,
            Some(activation.plan.as_str()),
            Some(activation.stripe_customer_id.as_str()),
            activation.stripe_subscription_id.as_deref(),
        )
        .await?;

        if updated == 0 {
            return Err(ClinicError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    async fn clear_plan(&self, user_id: &str) -> ClinicResult<()> {
        let updated = user::update_user_plan(&self.pool, user_id, None, None, None).await?;

        if updated == 0 {
            return Err(ClinicError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
