//! Booking error types

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BookingError {
    /// The requested time does not match any of the daily seatings.
    #[error("requested time does not match any seating slot")]
    InvalidSlot,

    /// The requested slot has already started.
    #[error("cannot book a slot in the past")]
    PastDate,

    #[error("party size {given} is out of range (1..={max})")]
    PartySizeOutOfRange { given: u32, max: u32 },

    /// One upcoming reservation per customer, chain-wide.
    #[error("customer {0} already holds an upcoming reservation")]
    DuplicateFutureReservation(i64),

    /// Not enough tables left at this slot; `remaining` counts whole tables.
    #[error("not enough tables free at this slot, {remaining} left")]
    InsufficientCapacity { remaining: u32 },

    /// Tables fit but every unit display is already handed out.
    #[error("no table unit free for this slot")]
    NoUnitAvailable,

    /// The reservation's slot has already passed.
    #[error("past reservations cannot be changed")]
    PastReservation,

    #[error("reservation {0} not found")]
    ReservationNotFound(i64),

    #[error("no reservation holds unit {unit_id} at {slot}")]
    NoReservationAtSlot { unit_id: i64, slot: NaiveDateTime },

    #[error("branch {0} not found")]
    BranchNotFound(i64),

    /// The reservation exists but no code has been issued yet.
    #[error("no code issued for this reservation")]
    OtpNotFound,

    #[error("code does not match")]
    OtpMismatch,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Store(String),
}

pub type BookingResult<T> = Result<T, BookingError>;

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        BookingError::Store(err.to_string())
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BookingError::Validation(errors.to_string())
    }
}
