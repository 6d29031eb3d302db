//! Data models
//!
//! Shared between the booking engine and whatever API layer sits on top.
//! All IDs are `i64` (snowflake, see [`crate::util::snowflake_id`]). Slot
//! timestamps are `chrono::NaiveDateTime` in restaurant-local wall-clock
//! time, minute resolution.

pub mod branch;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod product;
pub mod reservation;
pub mod table_unit;

// Re-exports
pub use branch::*;
pub use order::*;
pub use order_item::*;
pub use payment::*;
pub use product::*;
pub use reservation::*;
pub use table_unit::*;
