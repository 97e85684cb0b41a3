/// Appointment booking against the availability engine
pub mod booking;
/// Clinic onboarding and doctor/patient management
pub mod directory;
/// Stripe webhook verification and plan updates
pub mod stripe;
