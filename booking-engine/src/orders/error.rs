//! Order flow error types

use shared::models::ItemStatus;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrderFlowError {
    /// The requested move is not an edge of the item state machine.
    #[error("invalid item transition {from} -> {to}")]
    InvalidTransition { from: ItemStatus, to: ItemStatus },

    #[error("order {0} not found")]
    OrderNotFound(i64),

    #[error("line item {0} not found")]
    ItemNotFound(i64),

    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("reservation {0} not found")]
    ReservationNotFound(i64),

    /// The order already carries a payment; it cannot be billed twice.
    #[error("order {0} is already paid")]
    AlreadyPaid(i64),

    #[error("order {0} has no items to bill")]
    EmptyOrder(i64),

    /// Billing requires every line item to be on the table.
    #[error("order {0} is not fully delivered")]
    UndeliveredItems(i64),

    #[error("payment amount must be positive")]
    NonPositiveAmount,

    #[error("amount {amount:.2} does not cover the bill of {due:.2}")]
    InsufficientAmount { amount: f64, due: f64 },

    #[error("payment timestamp is in the future")]
    FuturePayment,

    /// Payments are registered at the till on the day of service or the
    /// morning after, never later.
    #[error("payment date must be today or yesterday")]
    StalePaymentDate,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Store(String),
}

pub type OrderFlowResult<T> = Result<T, OrderFlowError>;

impl From<StoreError> for OrderFlowError {
    fn from(err: StoreError) -> Self {
        OrderFlowError::Store(err.to_string())
    }
}

impl From<validator::ValidationErrors> for OrderFlowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OrderFlowError::Validation(errors.to_string())
    }
}
