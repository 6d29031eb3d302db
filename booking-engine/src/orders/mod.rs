//! Order intake, preparation tracking and billing
//!
//! Orders hang off a reservation, one per diner, opened after the OTP
//! handshake. Line items move through the kitchen one status at a time;
//! dashboards and bills are always derived from the raw rows, never stored.

pub mod billing;
pub mod error;
pub mod money;
pub mod projection;
pub mod workflow;

pub use billing::BillingEngine;
pub use error::{OrderFlowError, OrderFlowResult};
pub use workflow::OrderWorkflow;
