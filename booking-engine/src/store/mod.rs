//! Storage layer
//!
//! The engine treats persistence as an external collaborator behind narrow
//! per-entity traits; any backend that can do row lookups and conditional
//! inserts qualifies. [`MemoryStore`] is the reference implementation used
//! by the test suites and by embedders that do not need durability.
//!
//! Writes are whole-row: `update_*` replaces the stored row with the value
//! passed in. Uniqueness of a (table unit, slot) pair is the one constraint
//! the store itself must uphold; see [`StoreError::Conflict`].

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::models::{
    Branch, ItemStatus, Order, OrderCreate, OrderItem, OrderItemCreate, Payment, Product,
    Reservation, ReservationCreate, TableUnit, WalkInCreate,
};
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated, e.g. inserting a reservation for a
    /// (unit, slot) pair that another row already holds.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait BranchStore: Send + Sync {
    async fn branch(&self, id: i64) -> StoreResult<Option<Branch>>;
    async fn branches(&self) -> StoreResult<Vec<Branch>>;
}

#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Units of a branch not held by any reservation at exactly `slot`.
    async fn free_units_for_slot(
        &self,
        branch_id: i64,
        slot: NaiveDateTime,
    ) -> StoreResult<Vec<TableUnit>>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Persist a new online reservation: no OTP yet, unit pre-assigned.
    /// Fails with [`StoreError::Conflict`] if the (unit, slot) pair is taken.
    async fn create_reservation(
        &self,
        create: ReservationCreate,
        unit_id: i64,
    ) -> StoreResult<Reservation>;

    /// Persist a walk-in: OTP bound and arrival confirmed from the start.
    /// Same (unit, slot) conflict rule as [`Self::create_reservation`].
    async fn create_confirmed_reservation(
        &self,
        create: WalkInCreate,
        unit_id: i64,
        otp: String,
    ) -> StoreResult<Reservation>;

    /// Whole-row update keyed by `reservation.id`.
    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<()>;

    async fn delete_reservation(&self, id: i64) -> StoreResult<()>;

    async fn reservation(&self, id: i64) -> StoreResult<Option<Reservation>>;

    async fn reservations_by_customer(&self, customer_id: i64) -> StoreResult<Vec<Reservation>>;

    /// All reservations of a branch whose slot equals `slot` exactly.
    async fn reservations_by_branch_and_slot(
        &self,
        branch_id: i64,
        slot: NaiveDateTime,
    ) -> StoreResult<Vec<Reservation>>;

    /// The reservation holding `unit_id` at exactly `slot`, if any.
    async fn reservation_by_slot_and_unit(
        &self,
        slot: NaiveDateTime,
        unit_id: i64,
    ) -> StoreResult<Option<Reservation>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, create: OrderCreate) -> StoreResult<Order>;
    async fn order(&self, id: i64) -> StoreResult<Option<Order>>;
    async fn orders_by_reservation(&self, reservation_id: i64) -> StoreResult<Vec<Order>>;
    /// Bind a recorded payment to the order.
    async fn set_order_payment(&self, order_id: i64, payment_id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait OrderItemStore: Send + Sync {
    /// Batch insert; every line item starts in the default status.
    async fn create_items(
        &self,
        order_id: i64,
        items: Vec<OrderItemCreate>,
    ) -> StoreResult<Vec<OrderItem>>;

    async fn item(&self, id: i64) -> StoreResult<Option<OrderItem>>;
    async fn items_by_order(&self, order_id: i64) -> StoreResult<Vec<OrderItem>>;
    async fn update_item_status(&self, id: i64, status: ItemStatus) -> StoreResult<()>;
    async fn set_item_shared(&self, id: i64, shared: bool) -> StoreResult<()>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn product(&self, id: i64) -> StoreResult<Option<Product>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn create_payment(&self, amount: f64, paid_at: NaiveDateTime) -> StoreResult<Payment>;
    /// Every payment whose `paid_at` falls in the given calendar year.
    async fn payments_by_year(&self, year: i32) -> StoreResult<Vec<Payment>>;
}

/// Umbrella over every per-entity trait; the engines are generic over it.
pub trait DataStore:
    BranchStore
    + UnitStore
    + ReservationStore
    + OrderStore
    + OrderItemStore
    + ProductStore
    + PaymentStore
{
}

impl<T> DataStore for T where
    T: BranchStore
        + UnitStore
        + ReservationStore
        + OrderStore
        + OrderItemStore
        + ProductStore
        + PaymentStore
{
}
