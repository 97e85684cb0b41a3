//! # Availability Engine
//!
//! Decides whether a doctor can be booked on a given calendar date and
//! lays out the bookable time slots for that date.
//!
//! A doctor's availability is a weekly window: an inclusive range of
//! weekdays (0 = Sunday .. 6 = Saturday) and a daily range of times. The
//! weekday range may wrap around the end of the week, so Thursday (4) to
//! Monday (1) covers Thursday, Friday, Saturday, Sunday and Monday.
//!
//! Slots are generated from the start of the daily range at a fixed
//! [`SlotInterval`] and are marked unavailable when an existing appointment
//! already occupies the same time value.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};

pub const MIN_SLOT_INTERVAL_MINUTES: u32 = 5;
pub const MAX_SLOT_INTERVAL_MINUTES: u32 = 240;
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;

/// A doctor's recurring weekly availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub from_weekday: i16,
    pub to_weekday: i16,
    pub from_time: NaiveTime,
    pub to_time: NaiveTime,
}

impl AvailabilityWindow {
    /// Checks the invariants a window must satisfy before it is stored.
    pub fn validate(&self) -> ClinicResult<()> {
        for weekday in [self.from_weekday, self.to_weekday] {
            if !(0..=6).contains(&weekday) {
                return Err(ClinicError::Validation(format!(
                    "Weekday must be between 0 (Sunday) and 6 (Saturday), got {}",
                    weekday
                )));
            }
        }

        if self.from_time >= self.to_time {
            return Err(ClinicError::Validation(
                "Available from time must be earlier than available to time".to_string(),
            ));
        }

        Ok(())
    }
}

/// Granularity of generated slots, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInterval(u32);

impl SlotInterval {
    pub fn new(minutes: u32) -> ClinicResult<Self> {
        if !(MIN_SLOT_INTERVAL_MINUTES..=MAX_SLOT_INTERVAL_MINUTES).contains(&minutes) {
            return Err(ClinicError::Validation(format!(
                "Slot interval must be between {} and {} minutes, got {}",
                MIN_SLOT_INTERVAL_MINUTES, MAX_SLOT_INTERVAL_MINUTES, minutes
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for SlotInterval {
    fn default() -> Self {
        Self(DEFAULT_SLOT_INTERVAL_MINUTES)
    }
}

/// One entry of the slot list shown to the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// `HH:MM:SS`
    pub value: String,
    /// `HH:MM`
    pub label: String,
    pub available: bool,
}

/// Weekday of `date` with Sunday as 0.
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

/// Whether the doctor works on `date`'s weekday, including ranges that wrap past Saturday.
pub fn is_date_available(window: &AvailabilityWindow, date: NaiveDate) -> bool {
    let weekday = weekday_index(date);

    if window.from_weekday <= window.to_weekday {
        weekday >= window.from_weekday && weekday <= window.to_weekday
    } else {
        // Range crosses the end of the week, e.g. Thursday (4) to Monday (1)
        weekday >= window.from_weekday || weekday <= window.to_weekday
    }
}

/// Start times of every slot in the window's daily range.
///
/// The last slot starts strictly before `to_time`. Generation stops rather
/// than wrapping past midnight.
pub fn slot_times(window: &AvailabilityWindow, interval: SlotInterval) -> Vec<NaiveTime> {
    let step = interval.as_duration();
    let mut times = Vec::new();
    let mut current = window.from_time;

    while current < window.to_time {
        times.push(current);

        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }

    times
}

/// Lays out the slots for `date`, marking those already taken by `booked`.
///
/// Returns no slots when the doctor does not work on that weekday. Callers
/// editing an existing appointment must leave that appointment's own time out
/// of `booked`.
pub fn available_times(
    window: &AvailabilityWindow,
    date: NaiveDate,
    booked: &[NaiveTime],
    interval: SlotInterval,
) -> Vec<TimeSlot> {
    if !is_date_available(window, date) {
        return Vec::new();
    }

    let booked: Vec<NaiveTime> = booked.iter().map(|time| truncate_to_seconds(*time)).collect();

    slot_times(window, interval)
        .into_iter()
        .map(|time| TimeSlot {
            value: format_slot_value(time),
            label: format_slot_label(time),
            available: !booked.contains(&time),
        })
        .collect()
}

/// Parses a wire time of day, `HH:MM:SS` or `HH:MM`.
pub fn parse_time_of_day(value: &str) -> ClinicResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            ClinicError::Validation(format!(
                "Invalid time '{}', expected HH:MM or HH:MM:SS",
                value
            ))
        })
}

/// Joins a calendar date and a slot time into the stored timestamp.
///
/// Seconds are dropped so the stored value always lands on a slot boundary.
pub fn combine_date_and_time(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let time = time
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time);
    date.and_time(time).and_utc()
}

pub fn format_slot_value(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub fn format_slot_label(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn truncate_to_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}
