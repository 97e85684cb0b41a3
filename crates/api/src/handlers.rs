/// Appointment listing, booking and cancellation
pub mod appointment;
/// Doctor availability lookups for the booking form
pub mod availability;
/// Stripe webhook endpoint
pub mod billing;
/// Clinic onboarding
pub mod clinic;
/// Doctor register
pub mod doctor;
/// Patient register
pub mod patient;
/// Signed-in user details
pub mod session;
