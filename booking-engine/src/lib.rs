//! Booking Engine - reservation-and-order lifecycle core
//!
//! # Architecture overview
//!
//! The engine owns the non-trivial part of the reservation platform and
//! nothing else; HTTP, auth and persistence are external collaborators.
//!
//! - **Booking** (`booking`): the four fixed daily slots, table allocation,
//!   per-slot capacity accounting, the reservation lifecycle (online and
//!   walk-in) and OTP issue/verification
//! - **Orders** (`orders`): per-diner order intake, the per-item preparation
//!   state machine, waitstaff/kitchen projections, billing and payments
//! - **Store** (`store`): narrow async traits over the persistence layer,
//!   plus an in-memory reference implementation
//!
//! # Module structure
//!
//! ```text
//! booking-engine/src/
//! ├── core/          # configuration
//! ├── booking/       # slots, allocator, availability, OTP, lifecycle
//! ├── orders/        # intake, state machine, projections, billing
//! ├── store/         # storage traits + in-memory reference store
//! └── utils/         # logger, wall-clock helpers
//! ```

pub mod booking;
pub mod core;
pub mod orders;
pub mod store;
pub mod utils;

// Re-export public types
pub use booking::{BookingError, BookingResult, ReservationLifecycle};
pub use core::Config;
pub use orders::{BillingEngine, OrderFlowError, OrderFlowResult, OrderWorkflow};
pub use store::{DataStore, MemoryStore, StoreError, StoreResult};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::time::Clock;
