//! # Directory Service
//!
//! Clinic onboarding plus the doctor and patient registers of a clinic.
//! Every lookup is scoped to the acting clinic; records owned by another
//! clinic are reported as missing.

use clinicly_core::{
    availability::{AvailabilityWindow, parse_time_of_day},
    errors::{ClinicError, ClinicResult},
    models::{
        clinic::Clinic,
        doctor::{Doctor, NewDoctor, UpsertDoctorRequest},
        patient::{NewPatient, Patient, UpsertPatientRequest},
        user::SessionUser,
    },
    pricing::price_to_cents,
    repositories::Store,
};
use tracing::info;
use uuid::Uuid;

use crate::services::booking::{clinic_doctor, clinic_patient};

fn required(value: &str, field: &str) -> ClinicResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClinicError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Creates a clinic and links the signed-in user to it.
pub async fn create_clinic(store: &dyn Store, user: &SessionUser, name: &str) -> ClinicResult<Clinic> {
    let name = required(name, "Clinic name")?;
    let clinic = store.create_clinic(&user.id, &name).await?;

    info!("Created clinic {} for user {}", clinic.id, user.id);
    Ok(clinic)
}

fn new_doctor(clinic_id: Uuid, request: UpsertDoctorRequest) -> ClinicResult<NewDoctor> {
    let name = required(&request.name, "Name")?;
    let speciality = required(&request.speciality, "Speciality")?;

    let window = AvailabilityWindow {
        from_weekday: request.available_from_weekday,
        to_weekday: request.available_to_weekday,
        from_time: parse_time_of_day(&request.available_from_time)?,
        to_time: parse_time_of_day(&request.available_to_time)?,
    };
    window.validate()?;

    let appointment_price_in_cents = price_to_cents(request.appointment_price)?;
    let avatar_image_url = request
        .avatar_image_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    Ok(NewDoctor {
        clinic_id,
        name,
        speciality,
        avatar_image_url,
        available_from_weekday: window.from_weekday,
        available_to_weekday: window.to_weekday,
        available_from_time: window.from_time,
        available_to_time: window.to_time,
        appointment_price_in_cents,
    })
}

pub async fn upsert_doctor(
    store: &dyn Store,
    clinic_id: Uuid,
    request: UpsertDoctorRequest,
) -> ClinicResult<Doctor> {
    let id = request.id;
    let doctor = new_doctor(clinic_id, request)?;

    match id {
        Some(id) => {
            clinic_doctor(store, clinic_id, id).await?;
            let updated = store.update_doctor(id, doctor).await?;
            info!("Updated doctor {} for clinic {}", id, clinic_id);
            Ok(updated)
        }
        None => {
            let created = store.insert_doctor(doctor).await?;
            info!("Created doctor {} for clinic {}", created.id, clinic_id);
            Ok(created)
        }
    }
}

pub async fn delete_doctor(store: &dyn Store, clinic_id: Uuid, id: Uuid) -> ClinicResult<()> {
    clinic_doctor(store, clinic_id, id).await?;
    store.delete_doctor(id).await?;

    info!("Deleted doctor {} for clinic {}", id, clinic_id);
    Ok(())
}

pub async fn list_doctors(store: &dyn Store, clinic_id: Uuid) -> ClinicResult<Vec<Doctor>> {
    store.list_doctors(clinic_id).await
}

fn new_patient(clinic_id: Uuid, request: UpsertPatientRequest) -> ClinicResult<NewPatient> {
    let name = required(&request.name, "Name")?;
    let email = required(&request.email, "Email")?;
    if !email.contains('@') {
        return Err(ClinicError::Validation(format!("Invalid email address: {}", email)));
    }
    let phone_number = required(&request.phone_number, "Phone number")?;

    Ok(NewPatient {
        clinic_id,
        name,
        email,
        phone_number,
        sex: request.sex,
    })
}

pub async fn upsert_patient(
    store: &dyn Store,
    clinic_id: Uuid,
    request: UpsertPatientRequest,
) -> ClinicResult<Patient> {
    let id = request.id;
    let patient = new_patient(clinic_id, request)?;

    match id {
        Some(id) => {
            clinic_patient(store, clinic_id, id).await?;
            let updated = store.update_patient(id, patient).await?;
            info!("Updated patient {} for clinic {}", id, clinic_id);
            Ok(updated)
        }
        None => {
            let created = store.insert_patient(patient).await?;
            info!("Created patient {} for clinic {}", created.id, clinic_id);
            Ok(created)
        }
    }
}

pub async fn delete_patient(store: &dyn Store, clinic_id: Uuid, id: Uuid) -> ClinicResult<()> {
    clinic_patient(store, clinic_id, id).await?;
    store.delete_patient(id).await?;

    info!("Deleted patient {} for clinic {}", id, clinic_id);
    Ok(())
}

pub async fn list_patients(store: &dyn Store, clinic_id: Uuid) -> ClinicResult<Vec<Patient>> {
    store.list_patients(clinic_id).await
}
