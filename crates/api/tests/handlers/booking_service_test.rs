use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use clinicly_api::services::booking;
use clinicly_core::{
    availability::SlotInterval,
    errors::ClinicError,
    models::{
        appointment::{Appointment, NewAppointment, UpsertAppointmentRequest},
        doctor::Doctor,
        patient::{Patient, Sex},
    },
};
use clinicly_db::mock::{MemoryStore, MockStore};
use mockall::predicate;
use pretty_assertions::assert_eq;
use tokio_test::assert_ok;
use uuid::Uuid;

use crate::test_utils::TestContext;

// 2025-06-02 is a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn doctor(clinic_id: Uuid) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        clinic_id,
        name: "Dr. Paulo Mendes".to_string(),
        speciality: "Orthopedics".to_string(),
        avatar_image_url: None,
        available_from_weekday: 1,
        available_to_weekday: 5,
        available_from_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        available_to_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        appointment_price_in_cents: 10000,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn patient(clinic_id: Uuid) -> Patient {
    Patient {
        id: Uuid::new_v4(),
        clinic_id,
        name: "Lucia Prado".to_string(),
        email: "lucia@example.com".to_string(),
        phone_number: "11988887777".to_string(),
        sex: Sex::Female,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn appointment(new: &NewAppointment, id: Uuid) -> Appointment {
    Appointment {
        id,
        clinic_id: new.clinic_id,
        doctor_id: new.doctor_id,
        patient_id: new.patient_id,
        date: new.date,
        appointment_price_in_cents: new.appointment_price_in_cents,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn request(doctor: &Doctor, patient: &Patient, time: &str) -> UpsertAppointmentRequest {
    UpsertAppointmentRequest {
        id: None,
        patient_id: patient.id,
        doctor_id: doctor.id,
        date: monday(),
        time: time.to_string(),
        appointment_price: 100.0,
    }
}

fn at_nine() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
}

fn expect_directory(store: &mut MockStore, doctor: &Doctor, patient: &Patient) {
    let found_doctor = doctor.clone();
    store
        .expect_get_doctor()
        .with(predicate::eq(doctor.id))
        .returning(move |_| Ok(Some(found_doctor.clone())));

    let found_patient = patient.clone();
    store
        .expect_get_patient()
        .with(predicate::eq(patient.id))
        .returning(move |_| Ok(Some(found_patient.clone())));
}

#[tokio::test]
async fn test_storage_conflict_surfaces_as_slot_unavailable() {
    let clinic_id = Uuid::new_v4();
    let doctor = doctor(clinic_id);
    let patient = patient(clinic_id);

    let mut store = MockStore::new();
    expect_directory(&mut store, &doctor, &patient);
    store
        .expect_list_doctor_appointments_on()
        .with(predicate::eq(doctor.id), predicate::eq(monday()))
        .returning(|_, _| Ok(Vec::new()));
    store
        .expect_insert_appointment()
        .times(1)
        .returning(|_| Err(ClinicError::SlotUnavailable("taken concurrently".to_string())));

    let result = booking::upsert_appointment(
        &store,
        clinic_id,
        request(&doctor, &patient, "09:00"),
        SlotInterval::default(),
        today(),
    )
    .await;

    assert!(matches!(result, Err(ClinicError::SlotUnavailable(_))));
}

#[tokio::test]
async fn test_insert_captures_time_and_price() {
    let clinic_id = Uuid::new_v4();
    let doctor = doctor(clinic_id);
    let patient = patient(clinic_id);
    let expected = NewAppointment {
        clinic_id,
        doctor_id: doctor.id,
        patient_id: patient.id,
        date: at_nine(),
        appointment_price_in_cents: 10000,
    };

    let mut store = MockStore::new();
    expect_directory(&mut store, &doctor, &patient);
    store
        .expect_list_doctor_appointments_on()
        .returning(|_, _| Ok(Vec::new()));
    store
        .expect_insert_appointment()
        .with(predicate::eq(expected))
        .times(1)
        .returning(|new| Ok(appointment(&new, Uuid::new_v4())));

    let response = assert_ok!(
        booking::upsert_appointment(
            &store,
            clinic_id,
            request(&doctor, &patient, "09:00:45"),
            SlotInterval::default(),
            today(),
        )
        .await
    );

    assert_eq!(response.appointment.date, at_nine());
    assert_eq!(response.message, booking::APPOINTMENT_CREATED);
}

#[tokio::test]
async fn test_update_ignores_its_own_booking() {
    let clinic_id = Uuid::new_v4();
    let doctor = doctor(clinic_id);
    let patient = patient(clinic_id);
    let existing_id = Uuid::new_v4();
    let existing = appointment(
        &NewAppointment {
            clinic_id,
            doctor_id: doctor.id,
            patient_id: patient.id,
            date: at_nine(),
            appointment_price_in_cents: 10000,
        },
        existing_id,
    );

    let mut store = MockStore::new();
    expect_directory(&mut store, &doctor, &patient);
    let stored = existing.clone();
    store
        .expect_get_appointment()
        .with(predicate::eq(existing_id))
        .returning(move |_| Ok(Some(stored.clone())));
    let booked = existing.clone();
    store
        .expect_list_doctor_appointments_on()
        .returning(move |_, _| Ok(vec![booked.clone()]));
    store
        .expect_update_appointment()
        .withf(move |id, new| *id == existing_id && new.date == at_nine())
        .times(1)
        .returning(|id, new| Ok(appointment(&new, id)));
    store.expect_insert_appointment().never();

    let mut edit = request(&doctor, &patient, "09:00");
    edit.id = Some(existing_id);

    let response = booking::upsert_appointment(
        &store,
        clinic_id,
        edit,
        SlotInterval::default(),
        today(),
    )
    .await
    .unwrap();

    assert_eq!(response.appointment.id, existing_id);
    assert_eq!(response.message, booking::APPOINTMENT_UPDATED);
}

#[tokio::test]
async fn test_foreign_appointment_is_not_found_before_any_write() {
    let clinic_id = Uuid::new_v4();
    let doctor = doctor(clinic_id);
    let patient = patient(clinic_id);
    let foreign_id = Uuid::new_v4();
    let foreign = appointment(
        &NewAppointment {
            clinic_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            date: at_nine(),
            appointment_price_in_cents: 5000,
        },
        foreign_id,
    );

    let mut store = MockStore::new();
    store
        .expect_get_appointment()
        .returning(move |_| Ok(Some(foreign.clone())));
    store.expect_update_appointment().never();
    store.expect_insert_appointment().never();

    let mut edit = request(&doctor, &patient, "09:00");
    edit.id = Some(foreign_id);

    let result = booking::upsert_appointment(
        &store,
        clinic_id,
        edit,
        SlotInterval::default(),
        today(),
    )
    .await;

    assert!(matches!(result, Err(ClinicError::NotFound(_))));
}

#[tokio::test]
async fn test_validation_happens_before_storage() {
    let clinic_id = Uuid::new_v4();
    let doctor = doctor(clinic_id);
    let patient = patient(clinic_id);

    // No expectations: any storage call panics.
    let store = MockStore::new();

    let mut cheap = request(&doctor, &patient, "09:00");
    cheap.appointment_price = 0.99;
    let result =
        booking::upsert_appointment(&store, clinic_id, cheap, SlotInterval::default(), today())
            .await;
    assert!(matches!(result, Err(ClinicError::Validation(_))));

    let mut past = request(&doctor, &patient, "09:00");
    past.date = NaiveDate::from_ymd_opt(2025, 5, 30).unwrap();
    let result =
        booking::upsert_appointment(&store, clinic_id, past, SlotInterval::default(), today())
            .await;
    assert!(matches!(result, Err(ClinicError::Validation(_))));
}

#[tokio::test]
async fn test_concurrent_bookings_of_one_slot_yield_one_winner() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let first = ctx.patient(member.clinic.id).await;
    let second = ctx.patient(member.clinic.id).await;
    let store: &MemoryStore = &ctx.store;

    let (a, b) = tokio::join!(
        booking::upsert_appointment(
            store,
            member.clinic.id,
            request(&doctor, &first, "09:00"),
            SlotInterval::default(),
            today(),
        ),
        booking::upsert_appointment(
            store,
            member.clinic.id,
            request(&doctor, &second, "09:00"),
            SlotInterval::default(),
            today(),
        ),
    );

    let outcomes = [a, b];
    let won = outcomes.iter().filter(|result| result.is_ok()).count();
    let lost = outcomes
        .iter()
        .filter(|result| matches!(result, Err(ClinicError::SlotUnavailable(_))))
        .count();

    assert_eq!((won, lost), (1, 1));
    assert_eq!(store.appointment_count().await, 1);
}
