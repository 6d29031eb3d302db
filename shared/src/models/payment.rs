//! Payment Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Payment entity (pagamento), created once per order when billed.
///
/// Amounts arrive as already-computed external facts; no provider
/// integration here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub amount: f64,
    pub paid_at: NaiveDateTime,
}

/// Record payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub order_id: i64,
    pub amount: f64,
    pub paid_at: NaiveDateTime,
}
