use axum::http::StatusCode;
use chrono::Weekday;
use clinicly_core::models::{
    appointment::AppointmentDetails, clinic::Clinic, doctor::Doctor, patient::Patient,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, bearer, upcoming};

fn doctor_body(name: &str) -> Value {
    json!({
        "name": name,
        "speciality": "Dermatology",
        "avatarImageUrl": null,
        "availableFromWeekday": 1,
        "availableToWeekday": 5,
        "availableFromTime": "08:00",
        "availableToTime": "12:00",
        "appointmentPrice": 249.9,
    })
}

fn patient_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phoneNumber": "+55 11 91234-5678",
        "sex": "male",
    })
}

#[tokio::test]
async fn test_onboarding_links_the_user_to_a_new_clinic() {
    let ctx = TestContext::new();
    let token = ctx.sign_in("new-owner").await;
    let (name, value) = bearer(&token);

    let me: Value = ctx
        .server
        .get("/api/me")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(me["clinic"], Value::Null);

    let response = ctx
        .server
        .post("/api/clinics")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "Clinica Bem Estar" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let clinic: Clinic = response.json();

    let me: Value = ctx
        .server
        .get("/api/me")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(me["clinic"]["id"], clinic.id.to_string());
    assert_eq!(me["clinic"]["name"], "Clinica Bem Estar");
}

#[tokio::test]
async fn test_onboarding_requires_a_session_and_a_name() {
    let ctx = TestContext::new();

    ctx.server
        .post("/api/clinics")
        .json(&json!({ "name": "Clinica" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = ctx.sign_in("owner").await;
    let (name, value) = bearer(&token);
    ctx.server
        .post("/api/clinics")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "name": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post("/api/clinics")
        .add_header(name, value)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_doctors_are_created_updated_and_listed_by_name() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let (name, value) = bearer(&member.token);

    for doctor in ["Dr. Zilda Ramos", "Dr. Bruno Alves"] {
        ctx.server
            .post("/api/doctors")
            .add_header(name.clone(), value.clone())
            .json(&doctor_body(doctor))
            .await
            .assert_status_ok();
    }

    let doctors: Vec<Doctor> = ctx
        .server
        .get("/api/doctors")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    let names: Vec<&str> = doctors.iter().map(|doctor| doctor.name.as_str()).collect();
    assert_eq!(names, vec!["Dr. Bruno Alves", "Dr. Zilda Ramos"]);
    assert_eq!(doctors[0].appointment_price_in_cents, 24990);

    let mut update = doctor_body("Dr. Bruno Alves");
    update["id"] = json!(doctors[0].id);
    update["availableToTime"] = json!("18:00");
    update["appointmentPrice"] = json!(300);

    let updated: Doctor = ctx
        .server
        .post("/api/doctors")
        .add_header(name, value)
        .json(&update)
        .await
        .json();
    assert_eq!(updated.id, doctors[0].id);
    assert_eq!(updated.available_to_time.to_string(), "18:00:00");
    assert_eq!(updated.appointment_price_in_cents, 30000);
}

#[tokio::test]
async fn test_invalid_doctors_are_rejected() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let (name, value) = bearer(&member.token);

    let mut cheap = doctor_body("Dr. Cheap");
    cheap["appointmentPrice"] = json!(0.5);

    let mut inverted = doctor_body("Dr. Inverted");
    inverted["availableFromTime"] = json!("13:00");

    let mut bad_weekday = doctor_body("Dr. Eight Days");
    bad_weekday["availableToWeekday"] = json!(7);

    for body in [cheap, inverted, bad_weekday] {
        ctx.server
            .post("/api/doctors")
            .add_header(name.clone(), value.clone())
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_another_clinics_doctor_cannot_be_edited_or_deleted() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let other = ctx.member().await;
    let foreign = ctx.weekday_doctor(other.clinic.id).await;
    let (name, value) = bearer(&member.token);

    let mut update = doctor_body("Dr. Hijack");
    update["id"] = json!(foreign.id);

    ctx.server
        .post("/api/doctors")
        .add_header(name.clone(), value.clone())
        .json(&update)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.server
        .delete(&format!("/api/doctors/{}", foreign.id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_a_doctor_removes_their_appointments() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let patient = ctx.patient(member.clinic.id).await;
    let (name, value) = bearer(&member.token);

    ctx.server
        .post("/api/appointments")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "doctorId": doctor.id,
            "patientId": patient.id,
            "date": upcoming(Weekday::Mon),
            "time": "13:00",
            "appointmentPrice": 100.0,
        }))
        .await
        .assert_status_ok();

    ctx.server
        .delete(&format!("/api/doctors/{}", doctor.id))
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let appointments: Vec<AppointmentDetails> = ctx
        .server
        .get("/api/appointments")
        .add_header(name, value)
        .await
        .json();
    assert!(appointments.is_empty());
}

#[tokio::test]
async fn test_patients_are_scoped_to_the_clinic() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let other = ctx.member().await;
    let (name, value) = bearer(&member.token);

    let created: Patient = ctx
        .server
        .post("/api/patients")
        .add_header(name.clone(), value.clone())
        .json(&patient_body("Carlos Souza", "carlos@example.com"))
        .await
        .json();
    assert_eq!(created.clinic_id, member.clinic.id);

    let mut update = patient_body("Carlos A. Souza", "carlos@example.com");
    update["id"] = json!(created.id);
    let updated: Patient = ctx
        .server
        .post("/api/patients")
        .add_header(name.clone(), value.clone())
        .json(&update)
        .await
        .json();
    assert_eq!(updated.name, "Carlos A. Souza");

    let (other_name, other_value) = bearer(&other.token);
    let foreign_view: Vec<Patient> = ctx
        .server
        .get("/api/patients")
        .add_header(other_name.clone(), other_value.clone())
        .await
        .json();
    assert!(foreign_view.is_empty());

    ctx.server
        .delete(&format!("/api/patients/{}", created.id))
        .add_header(other_name, other_value)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.server
        .delete(&format!("/api/patients/{}", created.id))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_invalid_patients_are_rejected() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let (name, value) = bearer(&member.token);

    for body in [
        patient_body("", "someone@example.com"),
        patient_body("Maria", "not-an-email"),
    ] {
        ctx.server
            .post("/api/patients")
            .add_header(name.clone(), value.clone())
            .json(&body)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let mut unknown_sex = patient_body("Maria", "maria@example.com");
    unknown_sex["sex"] = json!("other");
    let response = ctx
        .server
        .post("/api/patients")
        .add_header(name, value)
        .json(&unknown_sex)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}
