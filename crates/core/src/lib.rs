//! Domain types and scheduling rules for Clinicly.
//!
//! Nothing in this crate touches HTTP or a database. Storage is reached
//! through the traits in [`repositories`], which the `clinicly-db` crate
//! implements.

pub mod availability;
pub mod errors;
pub mod models;
pub mod pricing;
pub mod repositories;
