//! Reservation lifecycle
//!
//! # Booking flow
//!
//! ```text
//!                      ┌───────────┐  confirm_arrival   ┌───────────┐
//!   reserve_online ──► │ Requested │ ─────────────────► │ Confirmed │
//!                      └───────────┘   (OTP issued)     └───────────┘
//!                                                             ▲
//!   reserve_walk_in ──────────────────────────────────────────┘
//!                      (OTP bound at creation)
//!
//!   either stage ── slot time passes ──► reads as Closed (derived)
//! ```
//!
//! Capacity is never cached: every check recomputes table occupancy from
//! the live reservation rows of the exact (branch, slot) pair. Creation
//! and modification serialize on a per-(branch, slot) lock before their
//! check-and-commit sequence, so two bookings cannot both squeeze into the
//! last table.

pub mod allocator;
pub mod availability;
pub mod error;
pub mod lifecycle;
pub mod otp;
pub mod slots;

pub use error::{BookingError, BookingResult};
pub use lifecycle::ReservationLifecycle;

#[cfg(test)]
mod tests;
