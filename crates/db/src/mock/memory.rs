//! In-memory store with the same uniqueness and cascade rules as the
//! Postgres schema. Used by workflow and HTTP tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use clinicly_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{Appointment, AppointmentDetails, NewAppointment},
        clinic::{Clinic, ClinicRef},
        doctor::{Doctor, NewDoctor},
        patient::{NewPatient, Patient},
        user::{PlanActivation, SessionUser},
    },
    repositories::{
        AppointmentRepository, ClinicRepository, DoctorRepository, PatientRepository,
        UserRepository,
    },
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<String, MemoryUser>,
    sessions: HashMap<String, String>,
    // (user_id, clinic_id) in join order
    memberships: Vec<(String, Uuid)>,
    clinics: HashMap<Uuid, Clinic>,
    doctors: HashMap<Uuid, Doctor>,
    patients: HashMap<Uuid, Patient>,
    appointments: HashMap<Uuid, Appointment>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, id: &str, name: &str, email: &str) {
        let mut state = self.state.lock().await;
        state.users.insert(
            id.to_string(),
            MemoryUser {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                plan: None,
                stripe_customer_id: None,
                stripe_subscription_id: None,
            },
        );
    }

    pub async fn add_session(&self, token: &str, user_id: &str) {
        let mut state = self.state.lock().await;
        state.sessions.insert(token.to_string(), user_id.to_string());
    }

    pub async fn user(&self, id: &str) -> Option<MemoryUser> {
        self.state.lock().await.users.get(id).cloned()
    }

    pub async fn appointment_count(&self) -> usize {
        self.state.lock().await.appointments.len()
    }
}

fn slot_taken(state: &MemoryState, candidate: &NewAppointment, ignore: Option<Uuid>) -> bool {
    state.appointments.values().any(|existing| {
        Some(existing.id) != ignore
            && existing.doctor_id == candidate.doctor_id
            && existing.date == candidate.date
    })
}

fn slot_taken_error() -> ClinicError {
    ClinicError::SlotUnavailable("The doctor already has an appointment at this time".to_string())
}

#[async_trait]
impl ClinicRepository for MemoryStore {
    async fn create_clinic(&self, user_id: &str, name: &str) -> ClinicResult<Clinic> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(user_id) {
            return Err(ClinicError::Database(eyre::eyre!(
                "users_to_clinics references unknown user {}",
                user_id
            )));
        }

        let clinic = Clinic {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.clinics.insert(clinic.id, clinic.clone());
        state.memberships.push((user_id.to_string(), clinic.id));

        Ok(clinic)
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn get_doctor(&self, id: Uuid) -> ClinicResult<Option<Doctor>> {
        Ok(self.state.lock().await.doctors.get(&id).cloned())
    }

    async fn list_doctors(&self, clinic_id: Uuid) -> ClinicResult<Vec<Doctor>> {
        let state = self.state.lock().await;
        let mut doctors: Vec<Doctor> = state
            .doctors
            .values()
            .filter(|doctor| doctor.clinic_id == clinic_id)
            .cloned()
            .collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    async fn insert_doctor(&self, doctor: NewDoctor) -> ClinicResult<Doctor> {
        let now = Utc::now();
        let created = Doctor {
            id: Uuid::new_v4(),
            clinic_id: doctor.clinic_id,
            name: doctor.name,
            speciality: doctor.speciality,
            avatar_image_url: doctor.avatar_image_url,
            available_from_weekday: doctor.available_from_weekday,
            available_to_weekday: doctor.available_to_weekday,
            available_from_time: doctor.available_from_time,
            available_to_time: doctor.available_to_time,
            appointment_price_in_cents: doctor.appointment_price_in_cents,
            created_at: now,
            updated_at: now,
        };

        self.state.lock().await.doctors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_doctor(&self, id: Uuid, doctor: NewDoctor) -> ClinicResult<Doctor> {
        let mut state = self.state.lock().await;
        let existing = state
            .doctors
            .get_mut(&id)
            .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))?;

        existing.name = doctor.name;
        existing.speciality = doctor.speciality;
        existing.avatar_image_url = doctor.avatar_image_url;
        existing.available_from_weekday = doctor.available_from_weekday;
        existing.available_to_weekday = doctor.available_to_weekday;
        existing.available_from_time = doctor.available_from_time;
        existing.available_to_time = doctor.available_to_time;
        existing.appointment_price_in_cents = doctor.appointment_price_in_cents;
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn delete_doctor(&self, id: Uuid) -> ClinicResult<()> {
        let mut state = self.state.lock().await;
        if state.doctors.remove(&id).is_none() {
            return Err(ClinicError::NotFound(format!("Doctor with ID {} not found", id)));
        }
        state.appointments.retain(|_, appointment| appointment.doctor_id != id);
        Ok(())
    }
}

#[async_trait]
impl PatientRepository for MemoryStore {
    async fn get_patient(&self, id: Uuid) -> ClinicResult<Option<Patient>> {
        Ok(self.state.lock().await.patients.get(&id).cloned())
    }

    async fn list_patients(&self, clinic_id: Uuid) -> ClinicResult<Vec<Patient>> {
        let state = self.state.lock().await;
        let mut patients: Vec<Patient> = state
            .patients
            .values()
            .filter(|patient| patient.clinic_id == clinic_id)
            .cloned()
            .collect();
        patients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(patients)
    }

    async fn insert_patient(&self, patient: NewPatient) -> ClinicResult<Patient> {
        let now = Utc::now();
        let created = Patient {
            id: Uuid::new_v4(),
            clinic_id: patient.clinic_id,
            name: patient.name,
            email: patient.email,
            phone_number: patient.phone_number,
            sex: patient.sex,
            created_at: now,
            updated_at: now,
        };

        self.state.lock().await.patients.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_patient(&self, id: Uuid, patient: NewPatient) -> ClinicResult<Patient> {
        let mut state = self.state.lock().await;
        let existing = state
            .patients
            .get_mut(&id)
            .ok_or_else(|| ClinicError::NotFound(format!("Patient with ID {} not found", id)))?;

        existing.name = patient.name;
        existing.email = patient.email;
        existing.phone_number = patient.phone_number;
        existing.sex = patient.sex;
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn delete_patient(&self, id: Uuid) -> ClinicResult<()> {
        let mut state = self.state.lock().await;
        if state.patients.remove(&id).is_none() {
            return Err(ClinicError::NotFound(format!("Patient with ID {} not found", id)));
        }
        state.appointments.retain(|_, appointment| appointment.patient_id != id);
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn get_appointment(&self, id: Uuid) -> ClinicResult<Option<Appointment>> {
        Ok(self.state.lock().await.appointments.get(&id).cloned())
    }

    async fn list_appointments(&self, clinic_id: Uuid) -> ClinicResult<Vec<AppointmentDetails>> {
        let state = self.state.lock().await;
        let mut appointments: Vec<AppointmentDetails> = state
            .appointments
            .values()
            .filter(|appointment| appointment.clinic_id == clinic_id)
            .filter_map(|appointment| {
                let doctor = state.doctors.get(&appointment.doctor_id)?;
                let patient = state.patients.get(&appointment.patient_id)?;
                Some(AppointmentDetails {
                    appointment: appointment.clone(),
                    doctor: doctor.summary(),
                    patient: patient.summary(),
                })
            })
            .collect();
        appointments.sort_by(|a, b| b.appointment.date.cmp(&a.appointment.date));
        Ok(appointments)
    }

    async fn list_doctor_appointments_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ClinicResult<Vec<Appointment>> {
        let state = self.state.lock().await;
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|appointment| {
                appointment.doctor_id == doctor_id && appointment.date.date_naive() == date
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| appointment.date);
        Ok(appointments)
    }

    async fn insert_appointment(&self, appointment: NewAppointment) -> ClinicResult<Appointment> {
        let mut state = self.state.lock().await;
        if slot_taken(&state, &appointment, None) {
            return Err(slot_taken_error());
        }

        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            clinic_id: appointment.clinic_id,
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            date: appointment.date,
            appointment_price_in_cents: appointment.appointment_price_in_cents,
            created_at: now,
            updated_at: now,
        };
        state.appointments.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        appointment: NewAppointment,
    ) -> ClinicResult<Appointment> {
        let mut state = self.state.lock().await;
        if !state.appointments.contains_key(&id) {
            return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        if slot_taken(&state, &appointment, Some(id)) {
            return Err(slot_taken_error());
        }

        let existing = state
            .appointments
            .get_mut(&id)
            .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;
        existing.clinic_id = appointment.clinic_id;
        existing.doctor_id = appointment.doctor_id;
        existing.patient_id = appointment.patient_id;
        existing.date = appointment.date;
        existing.appointment_price_in_cents = appointment.appointment_price_in_cents;
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> ClinicResult<()> {
        let mut state = self.state.lock().await;
        if state.appointments.remove(&id).is_none() {
            return Err(ClinicError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_session_user(&self, token: &str) -> ClinicResult<Option<SessionUser>> {
        let state = self.state.lock().await;
        let Some(user) = state
            .sessions
            .get(token)
            .and_then(|user_id| state.users.get(user_id))
        else {
            return Ok(None);
        };

        let clinic = state
            .memberships
            .iter()
            .find(|(member, _)| member == &user.id)
            .and_then(|(_, clinic_id)| state.clinics.get(clinic_id))
            .map(|clinic| ClinicRef {
                id: clinic.id,
                name: clinic.name.clone(),
            });

        Ok(Some(SessionUser {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            plan: user.plan.clone(),
            clinic,
        }))
    }

    async fn activate_plan(&self, user_id: &str, activation: PlanActivation) -> ClinicResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| ClinicError::NotFound(format!("User {} not found", user_id)))?;

        user.plan = Some(activation.plan);
        user.stripe_customer_id = Some(activation.stripe_customer_id);
        user.stripe_subscription_id = activation.stripe_subscription_id;
        Ok(())
    }

    async fn clear_plan(&self, user_id: &str) -> ClinicResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| ClinicError::NotFound(format!("User {} not found", user_id)))?;

        user.plan = None;
        user.stripe_customer_id = None;
        user.stripe_subscription_id = None;
        Ok(())
    }
}
