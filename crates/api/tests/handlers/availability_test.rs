use axum::http::StatusCode;
use chrono::Weekday;
use clinicly_api::{config::ApiConfig, handlers::availability::DateAvailability};
use clinicly_core::{
    availability::{SlotInterval, TimeSlot},
    models::appointment::UpsertAppointmentResponse,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, bearer, test_config, upcoming};

#[tokio::test]
async fn test_slots_cover_the_working_day_and_mark_bookings() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let patient = ctx.patient(member.clinic.id).await;
    let monday = upcoming(Weekday::Mon);
    let (name, value) = bearer(&member.token);

    ctx.server
        .post("/api/appointments")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "doctorId": doctor.id,
            "patientId": patient.id,
            "date": monday,
            "time": "11:00",
            "appointmentPrice": 100.0,
        }))
        .await
        .assert_status_ok();

    let slots: Vec<TimeSlot> = ctx
        .server
        .get(&format!("/api/doctors/{}/available-times", doctor.id))
        .add_query_param("date", monday)
        .add_header(name, value)
        .await
        .json();

    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0].value, "09:00:00");
    assert_eq!(slots[0].label, "09:00");
    assert_eq!(slots[15].label, "16:30");

    let taken: Vec<&str> = slots
        .iter()
        .filter(|slot| !slot.available)
        .map(|slot| slot.label.as_str())
        .collect();
    assert_eq!(taken, vec!["11:00"]);
}

#[tokio::test]
async fn test_edited_appointment_keeps_its_own_slot_free() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let patient = ctx.patient(member.clinic.id).await;
    let thursday = upcoming(Weekday::Thu);
    let (name, value) = bearer(&member.token);

    let created: UpsertAppointmentResponse = ctx
        .server
        .post("/api/appointments")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "doctorId": doctor.id,
            "patientId": patient.id,
            "date": thursday,
            "time": "15:30",
            "appointmentPrice": 100.0,
        }))
        .await
        .json();

    let slots: Vec<TimeSlot> = ctx
        .server
        .get(&format!("/api/doctors/{}/available-times", doctor.id))
        .add_query_param("date", thursday)
        .add_query_param("excludeAppointmentId", created.appointment.id)
        .add_header(name, value)
        .await
        .json();

    assert!(slots.iter().all(|slot| slot.available));
}

#[tokio::test]
async fn test_day_off_has_no_slots() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let (name, value) = bearer(&member.token);
    let saturday = upcoming(Weekday::Sat);

    let slots: Vec<TimeSlot> = ctx
        .server
        .get(&format!("/api/doctors/{}/available-times", doctor.id))
        .add_query_param("date", saturday)
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert!(slots.is_empty());

    let availability: DateAvailability = ctx
        .server
        .get(&format!("/api/doctors/{}/availability", doctor.id))
        .add_query_param("date", saturday)
        .add_header(name, value)
        .await
        .json();
    assert!(!availability.available);
}

#[tokio::test]
async fn test_weekend_shift_wraps_around_the_week() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx
        .doctor(member.clinic.id, "Dr. Weekend", (5, 1), ("10:00", "14:00"), 20000)
        .await;
    let (name, value) = bearer(&member.token);

    for (weekday, expected) in [
        (Weekday::Fri, true),
        (Weekday::Sun, true),
        (Weekday::Mon, true),
        (Weekday::Wed, false),
    ] {
        let availability: DateAvailability = ctx
            .server
            .get(&format!("/api/doctors/{}/availability", doctor.id))
            .add_query_param("date", upcoming(weekday))
            .add_header(name.clone(), value.clone())
            .await
            .json();
        assert_eq!(availability.available, expected, "{:?}", weekday);
    }
}

#[tokio::test]
async fn test_slot_interval_comes_from_config() {
    let ctx = TestContext::with_config(ApiConfig {
        slot_interval: SlotInterval::new(60).unwrap(),
        ..test_config()
    });
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let (name, value) = bearer(&member.token);

    let slots: Vec<TimeSlot> = ctx
        .server
        .get(&format!("/api/doctors/{}/available-times", doctor.id))
        .add_query_param("date", upcoming(Weekday::Tue))
        .add_header(name, value)
        .await
        .json();

    let labels: Vec<&str> = slots.iter().map(|slot| slot.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00"]
    );
}

#[tokio::test]
async fn test_foreign_doctor_is_not_found() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let other = ctx.member().await;
    let doctor = ctx.weekday_doctor(other.clinic.id).await;
    let (name, value) = bearer(&member.token);

    ctx.server
        .get(&format!("/api/doctors/{}/available-times", doctor.id))
        .add_query_param("date", upcoming(Weekday::Mon))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let ctx = TestContext::new();
    let member = ctx.member().await;
    let doctor = ctx.weekday_doctor(member.clinic.id).await;
    let (name, value) = bearer(&member.token);

    let response = ctx
        .server
        .get(&format!("/api/doctors/{}/availability", doctor.id))
        .add_query_param("date", "next monday")
        .add_header(name.clone(), value.clone())
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());

    let response = ctx
        .server
        .get("/api/doctors/not-a-uuid/available-times")
        .add_query_param("date", upcoming(Weekday::Mon))
        .add_header(name, value)
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}
