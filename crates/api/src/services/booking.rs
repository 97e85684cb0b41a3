//! # Booking Service
//!
//! Creates, moves and cancels appointments for the acting clinic.
//!
//! The slot a patient is booked into is always re-derived from storage: the
//! doctor's availability window and the appointments already on that day
//! decide whether the requested time is free. Two requests racing for the
//! same slot are settled by the store's `(doctor_id, date)` uniqueness rule,
//! which surfaces as `SlotUnavailable`.

use chrono::{NaiveDate, NaiveTime, Timelike};
use clinicly_core::{
    availability::{
        SlotInterval, TimeSlot, available_times, combine_date_and_time, format_slot_value,
        is_date_available, parse_time_of_day,
    },
    errors::{ClinicError, ClinicResult},
    models::{
        appointment::{
            Appointment, AppointmentDetails, NewAppointment, UpsertAppointmentRequest,
            UpsertAppointmentResponse,
        },
        doctor::Doctor,
        patient::Patient,
    },
    pricing::price_to_cents,
    repositories::Store,
};
use tracing::{info, warn};
use uuid::Uuid;

pub const APPOINTMENT_CREATED: &str = "Appointment created successfully!";
pub const APPOINTMENT_UPDATED: &str = "Appointment updated successfully!";

/// Loads a doctor, treating another clinic's doctor as missing.
pub async fn clinic_doctor(store: &dyn Store, clinic_id: Uuid, id: Uuid) -> ClinicResult<Doctor> {
    store
        .get_doctor(id)
        .await?
        .filter(|doctor| doctor.clinic_id == clinic_id)
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor with ID {} not found", id)))
}

/// Loads a patient, treating another clinic's patient as missing.
pub async fn clinic_patient(store: &dyn Store, clinic_id: Uuid, id: Uuid) -> ClinicResult<Patient> {
    store
        .get_patient(id)
        .await?
        .filter(|patient| patient.clinic_id == clinic_id)
        .ok_or_else(|| ClinicError::NotFound(format!("Patient with ID {} not found", id)))
}

async fn clinic_appointment(
    store: &dyn Store,
    clinic_id: Uuid,
    id: Uuid,
) -> ClinicResult<Appointment> {
    store
        .get_appointment(id)
        .await?
        .filter(|appointment| appointment.clinic_id == clinic_id)
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))
}

/// Times already taken on `date`, leaving out the appointment being edited.
async fn booked_times(
    store: &dyn Store,
    doctor_id: Uuid,
    date: NaiveDate,
    exclude: Option<Uuid>,
) -> ClinicResult<Vec<NaiveTime>> {
    let appointments = store.list_doctor_appointments_on(doctor_id, date).await?;

    Ok(appointments
        .into_iter()
        .filter(|appointment| Some(appointment.id) != exclude)
        .map(|appointment| appointment.date.time())
        .collect())
}

/// Slot list for the booking form.
///
/// `exclude` names the appointment being edited so its own slot stays
/// selectable.
pub async fn available_times_for(
    store: &dyn Store,
    clinic_id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
    exclude: Option<Uuid>,
    interval: SlotInterval,
) -> ClinicResult<Vec<TimeSlot>> {
    let doctor = clinic_doctor(store, clinic_id, doctor_id).await?;
    let booked = booked_times(store, doctor_id, date, exclude).await?;

    Ok(available_times(&doctor.availability(), date, &booked, interval))
}

pub async fn is_doctor_available_on(
    store: &dyn Store,
    clinic_id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
) -> ClinicResult<bool> {
    let doctor = clinic_doctor(store, clinic_id, doctor_id).await?;
    Ok(is_date_available(&doctor.availability(), date))
}

/// Creates the appointment, or moves an existing one when `request.id` is set.
///
/// `today` is the earliest bookable date.
pub async fn upsert_appointment(
    store: &dyn Store,
    clinic_id: Uuid,
    request: UpsertAppointmentRequest,
    interval: SlotInterval,
    today: NaiveDate,
) -> ClinicResult<UpsertAppointmentResponse> {
    let appointment_price_in_cents = price_to_cents(request.appointment_price)?;
    let time = parse_time_of_day(&request.time)?;
    let time = time.with_second(0).unwrap_or(time);

    if request.date < today {
        return Err(ClinicError::Validation(
            "Appointments cannot be booked in the past".to_string(),
        ));
    }

    if let Some(id) = request.id {
        clinic_appointment(store, clinic_id, id).await?;
    }

    let doctor = clinic_doctor(store, clinic_id, request.doctor_id).await?;
    clinic_patient(store, clinic_id, request.patient_id).await?;

    let window = doctor.availability();
    if !is_date_available(&window, request.date) {
        warn!(
            "Rejected booking: doctor {} does not work on {}",
            doctor.id, request.date
        );
        return Err(ClinicError::SlotUnavailable(format!(
            "{} is not available on {}",
            doctor.name, request.date
        )));
    }

    let booked = booked_times(store, doctor.id, request.date, request.id).await?;
    let slots = available_times(&window, request.date, &booked, interval);
    let value = format_slot_value(time);

    match slots.iter().find(|slot| slot.value == value) {
        Some(slot) if slot.available => {}
        Some(_) => {
            warn!(
                "Rejected booking: doctor {} is already booked at {} {}",
                doctor.id, request.date, value
            );
            return Err(ClinicError::SlotUnavailable(format!(
                "{} is already booked at {}",
                doctor.name, slot_label(&value)
            )));
        }
        None => {
            return Err(ClinicError::SlotUnavailable(format!(
                "{} is not a bookable time for {}",
                slot_label(&value),
                doctor.name
            )));
        }
    }

    let new_appointment = NewAppointment {
        clinic_id,
        doctor_id: doctor.id,
        patient_id: request.patient_id,
        date: combine_date_and_time(request.date, time),
        appointment_price_in_cents,
    };

    match request.id {
        Some(id) => {
            let appointment = store.update_appointment(id, new_appointment).await?;
            info!("Updated appointment {} for clinic {}", appointment.id, clinic_id);
            Ok(UpsertAppointmentResponse {
                appointment,
                message: APPOINTMENT_UPDATED.to_string(),
            })
        }
        None => {
            let appointment = store.insert_appointment(new_appointment).await?;
            info!("Created appointment {} for clinic {}", appointment.id, clinic_id);
            Ok(UpsertAppointmentResponse {
                appointment,
                message: APPOINTMENT_CREATED.to_string(),
            })
        }
    }
}

fn slot_label(value: &str) -> &str {
    value.get(..5).unwrap_or(value)
}

pub async fn delete_appointment(store: &dyn Store, clinic_id: Uuid, id: Uuid) -> ClinicResult<()> {
    clinic_appointment(store, clinic_id, id).await?;
    store.delete_appointment(id).await?;

    info!("Deleted appointment {} for clinic {}", id, clinic_id);
    Ok(())
}

pub async fn list_appointments(
    store: &dyn Store,
    clinic_id: Uuid,
) -> ClinicResult<Vec<AppointmentDetails>> {
    store.list_appointments(clinic_id).await
}
