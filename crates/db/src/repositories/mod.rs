pub mod appointment;
pub mod clinic;
pub mod doctor;
pub mod patient;
pub mod user;
