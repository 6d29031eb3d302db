//! Order intake and preparation tracking
//!
//! One order per diner under a reservation; each line item is a single
//! dish that the kitchen and waitstaff move along the preparation path.

use std::sync::Arc;

use futures::future::try_join_all;
use shared::models::{
    ItemStatus, Order, OrderCreate, OrderItem, OrderItemCreate, OrderItemView, Reservation,
    ServiceStatus,
};
use tracing::{info, warn};
use validator::Validate;

use crate::orders::error::{OrderFlowError, OrderFlowResult};
use crate::orders::projection;
use crate::store::DataStore;

pub struct OrderWorkflow<S> {
    store: Arc<S>,
}

impl<S: DataStore> OrderWorkflow<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn require_order(&self, id: i64) -> OrderFlowResult<Order> {
        self.store
            .order(id)
            .await?
            .ok_or(OrderFlowError::OrderNotFound(id))
    }

    async fn require_reservation(&self, id: i64) -> OrderFlowResult<Reservation> {
        self.store
            .reservation(id)
            .await?
            .ok_or(OrderFlowError::ReservationNotFound(id))
    }

    /// Open a diner's order under a reservation. The display name follows
    /// the `name.surname.birthyear` convention and is validated up front.
    pub async fn open_order(&self, input: OrderCreate) -> OrderFlowResult<Order> {
        input.validate()?;
        self.require_reservation(input.reservation_id).await?;
        let order = self.store.create_order(input).await?;
        info!(
            order_id = order.id,
            reservation_id = order.reservation_id,
            placed_by = %order.placed_by,
            "order opened"
        );
        Ok(order)
    }

    /// Add a batch of line items to an order. Every product must exist;
    /// nothing is created when one is unknown. New items start untouched.
    pub async fn add_items(
        &self,
        order_id: i64,
        items: Vec<OrderItemCreate>,
    ) -> OrderFlowResult<Vec<OrderItem>> {
        self.require_order(order_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let lookups = items.iter().map(|i| self.store.product(i.product_id));
        let products = try_join_all(lookups).await?;
        for (create, product) in items.iter().zip(&products) {
            if product.is_none() {
                return Err(OrderFlowError::ProductNotFound(create.product_id));
            }
        }
        let created = self.store.create_items(order_id, items).await?;
        info!(order_id, count = created.len(), "items added");
        Ok(created)
    }

    /// Move one line item along the preparation path. Only the edges of
    /// the state machine are accepted; everything else is refused without
    /// touching the row.
    pub async fn advance_item(
        &self,
        item_id: i64,
        target: ItemStatus,
    ) -> OrderFlowResult<OrderItem> {
        let item = self
            .store
            .item(item_id)
            .await?
            .ok_or(OrderFlowError::ItemNotFound(item_id))?;
        if !item.status.can_transition_to(target) {
            warn!(item_id, from = %item.status, to = %target, "transition refused");
            return Err(OrderFlowError::InvalidTransition {
                from: item.status,
                to: target,
            });
        }
        self.store.update_item_status(item_id, target).await?;
        info!(item_id, from = %item.status, to = %target, "item moved");
        Ok(OrderItem {
            status: target,
            ..item
        })
    }

    /// Flip whether a line item is shared by the whole table.
    pub async fn set_shared(&self, item_id: i64, shared: bool) -> OrderFlowResult<OrderItem> {
        let item = self
            .store
            .item(item_id)
            .await?
            .ok_or(OrderFlowError::ItemNotFound(item_id))?;
        self.store.set_item_shared(item_id, shared).await?;
        Ok(OrderItem { shared, ..item })
    }

    /// Line items of one order, joined with their products.
    pub async fn items_by_order(&self, order_id: i64) -> OrderFlowResult<Vec<OrderItemView>> {
        self.require_order(order_id).await?;
        let items = self.store.items_by_order(order_id).await?;
        self.join_products(items).await
    }

    /// Every line item under a reservation, across all of its orders.
    pub async fn items_by_reservation(
        &self,
        reservation_id: i64,
    ) -> OrderFlowResult<Vec<OrderItemView>> {
        self.require_reservation(reservation_id).await?;
        let orders = self.store.orders_by_reservation(reservation_id).await?;
        let mut items = Vec::new();
        for order in &orders {
            items.extend(self.store.items_by_order(order.id).await?);
        }
        self.join_products(items).await
    }

    /// Waitstaff dashboard status for one reservation.
    pub async fn table_status(&self, reservation_id: i64) -> OrderFlowResult<ServiceStatus> {
        let (has_otp, order_count, statuses) = self.service_inputs(reservation_id).await?;
        Ok(projection::waitstaff_status(has_otp, order_count, &statuses))
    }

    /// Kitchen dashboard status for one reservation.
    pub async fn kitchen_status(&self, reservation_id: i64) -> OrderFlowResult<ServiceStatus> {
        let (has_otp, order_count, statuses) = self.service_inputs(reservation_id).await?;
        Ok(projection::kitchen_status(has_otp, order_count, &statuses))
    }

    async fn service_inputs(
        &self,
        reservation_id: i64,
    ) -> OrderFlowResult<(bool, usize, Vec<ItemStatus>)> {
        let reservation = self.require_reservation(reservation_id).await?;
        let orders = self.store.orders_by_reservation(reservation_id).await?;
        let mut statuses = Vec::new();
        for order in &orders {
            statuses.extend(
                self.store
                    .items_by_order(order.id)
                    .await?
                    .into_iter()
                    .map(|i| i.status),
            );
        }
        Ok((reservation.otp.is_some(), orders.len(), statuses))
    }

    async fn join_products(&self, items: Vec<OrderItem>) -> OrderFlowResult<Vec<OrderItemView>> {
        let lookups = items.iter().map(|i| self.store.product(i.product_id));
        let products = try_join_all(lookups).await?;
        items
            .into_iter()
            .zip(products)
            .map(|(item, product)| {
                let product = product.ok_or(OrderFlowError::ProductNotFound(item.product_id))?;
                Ok(OrderItemView {
                    id: item.id,
                    order_id: item.order_id,
                    shared: item.shared,
                    status: item.status,
                    product,
                })
            })
            .collect()
    }
}
