//! Shared types for the reservation platform
//!
//! Entity models, status enums and payload DTOs used by the booking engine
//! and by the API layers built on top of it.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
