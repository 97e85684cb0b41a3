/// Doctor availability lookups
pub mod availability;
/// Appointment endpoints
pub mod appointment;
/// Stripe webhook
pub mod billing;
/// Clinic onboarding and session endpoints
pub mod clinic;
/// Doctor register endpoints
pub mod doctor;
/// Liveness endpoints
pub mod health;
/// Patient register endpoints
pub mod patient;
