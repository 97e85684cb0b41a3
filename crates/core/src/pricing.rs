//! Conversion between prices entered in major currency units and the
//! integer cents that are stored.

use crate::errors::{ClinicError, ClinicResult};

/// Smallest appointment price accepted, in major units.
pub const MIN_APPOINTMENT_PRICE: f64 = 1.0;

/// Converts a major-unit price to cents with `round(price * 100)`.
///
/// Exact for any price with at most two decimal places.
pub fn price_to_cents(price: f64) -> ClinicResult<i32> {
    if !price.is_finite() {
        return Err(ClinicError::Validation(
            "Appointment price must be a number".to_string(),
        ));
    }

    if price < MIN_APPOINTMENT_PRICE {
        return Err(ClinicError::Validation(format!(
            "Appointment price must be at least {:.2}",
            MIN_APPOINTMENT_PRICE
        )));
    }

    let cents = (price * 100.0).round();
    if cents > f64::from(i32::MAX) {
        return Err(ClinicError::Validation(
            "Appointment price is too large".to_string(),
        ));
    }

    Ok(cents as i32)
}

pub fn cents_to_price(cents: i32) -> f64 {
    f64::from(cents) / 100.0
}
