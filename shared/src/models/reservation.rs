//! Reservation Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Reservation lifecycle stage.
///
/// Only `Requested` and `Confirmed` are ever persisted; `Closed` is derived
/// from the wall clock via [`Reservation::stage_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStage {
    /// Booked online, guest not yet arrived; no OTP bound.
    #[default]
    Requested,
    /// Arrival confirmed, or created as a walk-in; an OTP is bound.
    Confirmed,
    /// Slot already elapsed; read-only history.
    Closed,
}

/// Reservation entity (prenotazione)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub branch_id: i64,
    /// Registered customer, when booked online. Walk-ins have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    pub party_size: u32,
    /// Must equal one of the four daily slots, minute precision.
    pub slot_at: NaiveDateTime,
    /// One-time code the party uses to open an ordering session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    /// Table unit held for the whole slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<i64>,
    pub stage: ReservationStage,
}

impl Reservation {
    /// Stage as observed at `now`: an elapsed slot reads as `Closed`
    /// regardless of what is stored.
    pub fn stage_at(&self, now: NaiveDateTime) -> ReservationStage {
        if self.slot_at < now {
            ReservationStage::Closed
        } else {
            self.stage
        }
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.slot_at < now
    }
}

/// Aggregate service status of a reservation, as shown on the waitstaff and
/// kitchen dashboards. Derived on every read; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// OTP not issued yet: the party has not arrived.
    #[serde(rename = "attesa-arrivo")]
    AwaitingArrival,
    /// Arrived but nothing ordered so far.
    #[serde(rename = "senza-ordini")]
    NoOrders,
    #[serde(rename = "non-in-lavorazione")]
    NotStarted,
    #[serde(rename = "in-lavorazione")]
    InProgress,
    #[serde(rename = "in-consegna")]
    InDelivery,
    #[serde(rename = "consegnato")]
    Delivered,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::AwaitingArrival => "attesa-arrivo",
            ServiceStatus::NoOrders => "senza-ordini",
            ServiceStatus::NotStarted => "non-in-lavorazione",
            ServiceStatus::InProgress => "in-lavorazione",
            ServiceStatus::InDelivery => "in-consegna",
            ServiceStatus::Delivered => "consegnato",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create payload for an online reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub branch_id: i64,
    pub customer_id: i64,
    pub party_size: u32,
    pub slot_at: NaiveDateTime,
}

/// Create payload for a staff walk-in reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkInCreate {
    pub branch_id: i64,
    pub party_size: u32,
    pub slot_at: NaiveDateTime,
}

/// OTP verification payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OtpCheck {
    pub slot_at: NaiveDateTime,
    pub unit_id: i64,
    /// Candidate code exactly as typed by the guest. Case-sensitive.
    #[validate(length(equal = 6), custom(function = validate_otp_shape))]
    pub otp: String,
}

/// Codes are 6 ASCII alphanumerics; anything else is rejected before lookup.
pub fn validate_otp_shape(otp: &str) -> Result<(), ValidationError> {
    if otp.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp_shape"))
    }
}
