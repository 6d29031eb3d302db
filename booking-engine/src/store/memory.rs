//! In-memory reference store
//!
//! Backs the test suites and embedders that do not need durability. Rows
//! live in [`DashMap`] tables keyed by id; the (unit, slot) uniqueness
//! constraint is a separate index claimed with the map's entry API, so two
//! concurrent inserts for the same pair cannot both succeed.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::models::{
    Branch, ItemStatus, Order, OrderCreate, OrderItem, OrderItemCreate, Payment, Product,
    Reservation, ReservationCreate, ReservationStage, TableUnit, WalkInCreate,
};
use shared::util::snowflake_id;

use super::{
    BranchStore, OrderItemStore, OrderStore, PaymentStore, ProductStore, ReservationStore,
    StoreError, StoreResult, UnitStore,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    branches: DashMap<i64, Branch>,
    units: DashMap<i64, TableUnit>,
    reservations: DashMap<i64, Reservation>,
    /// (unit id, slot) -> reservation id. Claimed before the row is visible.
    unit_slot_index: DashMap<(i64, NaiveDateTime), i64>,
    orders: DashMap<i64, Order>,
    items: DashMap<i64, OrderItem>,
    products: DashMap<i64, Product>,
    payments: DashMap<i64, Payment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id<V>(map: &DashMap<i64, V>) -> i64 {
        loop {
            let id = snowflake_id();
            if !map.contains_key(&id) {
                return id;
            }
        }
    }

    fn claim_unit_slot(
        &self,
        unit_id: i64,
        slot: NaiveDateTime,
        reservation_id: i64,
    ) -> StoreResult<()> {
        match self.unit_slot_index.entry((unit_id, slot)) {
            Entry::Occupied(held) => Err(StoreError::Conflict(format!(
                "unit {unit_id} already reserved at {slot} by reservation {}",
                held.get()
            ))),
            Entry::Vacant(claim) => {
                claim.insert(reservation_id);
                Ok(())
            }
        }
    }

    fn release_unit_slot(&self, unit_id: i64, slot: NaiveDateTime, reservation_id: i64) {
        self.unit_slot_index
            .remove_if(&(unit_id, slot), |_, held| *held == reservation_id);
    }

    /// Seed a branch. Administrative CRUD lives outside the engine; tests
    /// and embedders load reference data through these helpers.
    pub fn add_branch(&self, town: &str, address: &str, table_count: u32) -> Branch {
        let id = Self::fresh_id(&self.branches);
        let branch = Branch {
            id,
            town: town.to_string(),
            address: address.to_string(),
            table_count,
            latitude: 0.0,
            longitude: 0.0,
            image: None,
        };
        self.branches.insert(id, branch.clone());
        branch
    }

    /// Seed one table unit for a branch.
    pub fn add_unit(&self, branch_id: i64) -> TableUnit {
        let id = Self::fresh_id(&self.units);
        let unit = TableUnit { id, branch_id };
        self.units.insert(id, unit.clone());
        unit
    }

    /// Seed several table units for a branch.
    pub fn add_units(&self, branch_id: i64, count: usize) -> Vec<TableUnit> {
        (0..count).map(|_| self.add_unit(branch_id)).collect()
    }

    /// Seed a menu product.
    pub fn add_product(&self, name: &str, price: f64, category: &str) -> Product {
        let id = Self::fresh_id(&self.products);
        let product = Product {
            id,
            name: name.to_string(),
            price,
            category: category.to_string(),
        };
        self.products.insert(id, product.clone());
        product
    }
}

#[async_trait]
impl BranchStore for MemoryStore {
    async fn branch(&self, id: i64) -> StoreResult<Option<Branch>> {
        Ok(self.branches.get(&id).map(|b| b.clone()))
    }

    async fn branches(&self) -> StoreResult<Vec<Branch>> {
        let mut all: Vec<Branch> = self.branches.iter().map(|b| b.clone()).collect();
        all.sort_by_key(|b| b.id);
        Ok(all)
    }
}

#[async_trait]
impl UnitStore for MemoryStore {
    async fn free_units_for_slot(
        &self,
        branch_id: i64,
        slot: NaiveDateTime,
    ) -> StoreResult<Vec<TableUnit>> {
        let mut free: Vec<TableUnit> = self
            .units
            .iter()
            .filter(|u| u.branch_id == branch_id)
            .filter(|u| !self.unit_slot_index.contains_key(&(u.id, slot)))
            .map(|u| u.clone())
            .collect();
        free.sort_by_key(|u| u.id);
        Ok(free)
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn create_reservation(
        &self,
        create: ReservationCreate,
        unit_id: i64,
    ) -> StoreResult<Reservation> {
        let id = Self::fresh_id(&self.reservations);
        self.claim_unit_slot(unit_id, create.slot_at, id)?;
        let reservation = Reservation {
            id,
            branch_id: create.branch_id,
            customer_id: Some(create.customer_id),
            party_size: create.party_size,
            slot_at: create.slot_at,
            otp: None,
            unit_id: Some(unit_id),
            stage: ReservationStage::Requested,
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn create_confirmed_reservation(
        &self,
        create: WalkInCreate,
        unit_id: i64,
        otp: String,
    ) -> StoreResult<Reservation> {
        let id = Self::fresh_id(&self.reservations);
        self.claim_unit_slot(unit_id, create.slot_at, id)?;
        let reservation = Reservation {
            id,
            branch_id: create.branch_id,
            customer_id: None,
            party_size: create.party_size,
            slot_at: create.slot_at,
            otp: Some(otp),
            unit_id: Some(unit_id),
            stage: ReservationStage::Confirmed,
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn update_reservation(&self, reservation: &Reservation) -> StoreResult<()> {
        let Some(current) = self.reservations.get(&reservation.id).map(|r| r.clone()) else {
            return Err(StoreError::NotFound(format!(
                "reservation {}",
                reservation.id
            )));
        };
        let old_key = current.unit_id.map(|u| (u, current.slot_at));
        let new_key = reservation.unit_id.map(|u| (u, reservation.slot_at));
        if new_key != old_key {
            if let Some((unit_id, slot)) = new_key {
                match self.unit_slot_index.entry((unit_id, slot)) {
                    Entry::Occupied(held) if *held.get() != reservation.id => {
                        return Err(StoreError::Conflict(format!(
                            "unit {unit_id} already reserved at {slot} by reservation {}",
                            held.get()
                        )));
                    }
                    Entry::Occupied(_) => {}
                    Entry::Vacant(claim) => {
                        claim.insert(reservation.id);
                    }
                }
            }
            if let Some((unit_id, slot)) = old_key {
                self.release_unit_slot(unit_id, slot, reservation.id);
            }
        }
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn delete_reservation(&self, id: i64) -> StoreResult<()> {
        let Some((_, row)) = self.reservations.remove(&id) else {
            return Err(StoreError::NotFound(format!("reservation {id}")));
        };
        if let Some(unit_id) = row.unit_id {
            self.release_unit_slot(unit_id, row.slot_at, id);
        }
        Ok(())
    }

    async fn reservation(&self, id: i64) -> StoreResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn reservations_by_customer(&self, customer_id: i64) -> StoreResult<Vec<Reservation>> {
        let mut rows: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.customer_id == Some(customer_id))
            .map(|r| r.clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn reservations_by_branch_and_slot(
        &self,
        branch_id: i64,
        slot: NaiveDateTime,
    ) -> StoreResult<Vec<Reservation>> {
        let mut rows: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.branch_id == branch_id && r.slot_at == slot)
            .map(|r| r.clone())
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn reservation_by_slot_and_unit(
        &self,
        slot: NaiveDateTime,
        unit_id: i64,
    ) -> StoreResult<Option<Reservation>> {
        let Some(id) = self
            .unit_slot_index
            .get(&(unit_id, slot))
            .map(|held| *held.value())
        else {
            return Ok(None);
        };
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, create: OrderCreate) -> StoreResult<Order> {
        let id = Self::fresh_id(&self.orders);
        let order = Order {
            id,
            placed_by: create.placed_by,
            reservation_id: create.reservation_id,
            customer_id: create.customer_id,
            payment_id: None,
        };
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn order(&self, id: i64) -> StoreResult<Option<Order>> {
        Ok(self.orders.get(&id).map(|o| o.clone()))
    }

    async fn orders_by_reservation(&self, reservation_id: i64) -> StoreResult<Vec<Order>> {
        let mut rows: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.reservation_id == reservation_id)
            .map(|o| o.clone())
            .collect();
        rows.sort_by_key(|o| o.id);
        Ok(rows)
    }

    async fn set_order_payment(&self, order_id: i64, payment_id: i64) -> StoreResult<()> {
        let Some(mut order) = self.orders.get_mut(&order_id) else {
            return Err(StoreError::NotFound(format!("order {order_id}")));
        };
        order.payment_id = Some(payment_id);
        Ok(())
    }
}

#[async_trait]
impl OrderItemStore for MemoryStore {
    async fn create_items(
        &self,
        order_id: i64,
        items: Vec<OrderItemCreate>,
    ) -> StoreResult<Vec<OrderItem>> {
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let id = Self::fresh_id(&self.items);
            let row = OrderItem {
                id,
                order_id,
                product_id: item.product_id,
                shared: item.shared,
                status: ItemStatus::default(),
            };
            self.items.insert(id, row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn item(&self, id: i64) -> StoreResult<Option<OrderItem>> {
        Ok(self.items.get(&id).map(|i| i.clone()))
    }

    async fn items_by_order(&self, order_id: i64) -> StoreResult<Vec<OrderItem>> {
        let mut rows: Vec<OrderItem> = self
            .items
            .iter()
            .filter(|i| i.order_id == order_id)
            .map(|i| i.clone())
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(rows)
    }

    async fn update_item_status(&self, id: i64, status: ItemStatus) -> StoreResult<()> {
        let Some(mut item) = self.items.get_mut(&id) else {
            return Err(StoreError::NotFound(format!("order item {id}")));
        };
        item.status = status;
        Ok(())
    }

    async fn set_item_shared(&self, id: i64, shared: bool) -> StoreResult<()> {
        let Some(mut item) = self.items.get_mut(&id) else {
            return Err(StoreError::NotFound(format!("order item {id}")));
        };
        item.shared = shared;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn product(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.products.get(&id).map(|p| p.clone()))
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn create_payment(&self, amount: f64, paid_at: NaiveDateTime) -> StoreResult<Payment> {
        let id = Self::fresh_id(&self.payments);
        let payment = Payment {
            id,
            amount,
            paid_at,
        };
        self.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn payments_by_year(&self, year: i32) -> StoreResult<Vec<Payment>> {
        let mut rows: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.paid_at.year() == year)
            .map(|p| p.clone())
            .collect();
        rows.sort_by_key(|p| p.id);
        Ok(rows)
    }
}
