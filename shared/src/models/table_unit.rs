//! Table Unit Model

use serde::{Deserialize, Serialize};

/// Physical multi-seat table unit (torretta)
///
/// Reservations are pinned to a unit; at most one reservation may hold a
/// given unit for a given time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableUnit {
    pub id: i64,
    pub branch_id: i64,
}
