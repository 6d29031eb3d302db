//! Billing and payment recording
//!
//! A diner pays their own dishes in full plus an even share of everything
//! the table marked as shared. Totals are computed from the live rows at
//! billing time; the stored payment is the only financial record kept.

use std::sync::Arc;

use chrono::Datelike;
use rust_decimal::Decimal;
use shared::models::{ItemStatus, Order, Payment, PaymentCreate};
use tracing::info;

use crate::orders::error::{OrderFlowError, OrderFlowResult};
use crate::orders::money::{to_decimal, to_f64};
use crate::store::DataStore;
use crate::utils::time::Clock;

pub struct BillingEngine<S> {
    store: Arc<S>,
    clock: Clock,
}

impl<S: DataStore> BillingEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Clock::System)
    }

    pub fn with_clock(store: Arc<S>, clock: Clock) -> Self {
        Self { store, clock }
    }

    async fn require_order(&self, id: i64) -> OrderFlowResult<Order> {
        self.store
            .order(id)
            .await?
            .ok_or(OrderFlowError::OrderNotFound(id))
    }

    /// One diner's bill: individual dishes at full price, shared dishes
    /// divided evenly across the reservation's party. The division is
    /// carried at full precision and rounded to cents once, at the end.
    pub async fn order_total(&self, order_id: i64) -> OrderFlowResult<f64> {
        let order = self.require_order(order_id).await?;
        let reservation = self
            .store
            .reservation(order.reservation_id)
            .await?
            .ok_or(OrderFlowError::ReservationNotFound(order.reservation_id))?;
        let items = self.store.items_by_order(order_id).await?;

        let mut individual = Decimal::ZERO;
        let mut shared = Decimal::ZERO;
        for item in &items {
            let product = self
                .store
                .product(item.product_id)
                .await?
                .ok_or(OrderFlowError::ProductNotFound(item.product_id))?;
            let price = to_decimal(product.price);
            if item.shared {
                shared += price;
            } else {
                individual += price;
            }
        }
        let party = Decimal::from(reservation.party_size.max(1));
        Ok(to_f64(individual + shared / party))
    }

    /// Record the bill as settled.
    ///
    /// The order must be complete (at least one item, all delivered, not
    /// yet paid), the amount must cover the computed total, and the
    /// timestamp must be on the service day or the day after, never in
    /// the future.
    pub async fn record_payment(&self, input: PaymentCreate) -> OrderFlowResult<Payment> {
        let order = self.require_order(input.order_id).await?;
        if order.is_paid() {
            return Err(OrderFlowError::AlreadyPaid(order.id));
        }
        let items = self.store.items_by_order(order.id).await?;
        if items.is_empty() {
            return Err(OrderFlowError::EmptyOrder(order.id));
        }
        if items.iter().any(|i| i.status != ItemStatus::Delivered) {
            return Err(OrderFlowError::UndeliveredItems(order.id));
        }
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(OrderFlowError::NonPositiveAmount);
        }
        let due = self.order_total(order.id).await?;
        if to_decimal(input.amount) < to_decimal(due) {
            return Err(OrderFlowError::InsufficientAmount {
                amount: input.amount,
                due,
            });
        }
        let now = self.clock.now();
        if input.paid_at > now {
            return Err(OrderFlowError::FuturePayment);
        }
        let paid_on = input.paid_at.date();
        let today = now.date();
        let yesterday = today.pred_opt().unwrap_or(today);
        if paid_on != today && paid_on != yesterday {
            return Err(OrderFlowError::StalePaymentDate);
        }

        let payment = self
            .store
            .create_payment(input.amount, input.paid_at)
            .await?;
        self.store.set_order_payment(order.id, payment.id).await?;
        info!(
            order_id = order.id,
            payment_id = payment.id,
            amount = input.amount,
            "payment recorded"
        );
        Ok(payment)
    }

    /// Takings per calendar month for one year; index 0 is January.
    pub async fn revenue_by_month(&self, year: i32) -> OrderFlowResult<[f64; 12]> {
        let payments = self.store.payments_by_year(year).await?;
        let mut months = [Decimal::ZERO; 12];
        for payment in &payments {
            months[payment.paid_at.month0() as usize] += to_decimal(payment.amount);
        }
        Ok(months.map(to_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, OrderItemStore, OrderStore, PaymentStore, ReservationStore};
    use chrono::NaiveDateTime;
    use shared::models::{OrderCreate, OrderItemCreate, WalkInCreate};

    fn at(value: &str) -> NaiveDateTime {
        crate::utils::time::parse_date_time(value).unwrap()
    }

    /// Dinner service wrapped up: every scenario bills around this moment.
    const TILL_NOW: &str = "2031-05-20 23:00";

    fn billing(store: &Arc<MemoryStore>) -> BillingEngine<MemoryStore> {
        BillingEngine::with_clock(store.clone(), Clock::Fixed(at(TILL_NOW)))
    }

    /// An order with all items delivered, under a reservation of
    /// `party_size` diners. Prices land as given, shared ones flagged.
    async fn delivered_order(
        store: &Arc<MemoryStore>,
        party_size: u32,
        individual: &[f64],
        shared: &[f64],
    ) -> Order {
        let order = open_order(store, party_size).await;
        let items = add_priced_items(store, order.id, individual, shared).await;
        for item in &items {
            store
                .update_item_status(item.id, ItemStatus::Delivered)
                .await
                .unwrap();
        }
        order
    }

    async fn open_order(store: &Arc<MemoryStore>, party_size: u32) -> Order {
        let branch = store.add_branch("Milano", "Via Roma 1", 10);
        let unit = store.add_unit(branch.id);
        let reservation = store
            .create_confirmed_reservation(
                WalkInCreate {
                    branch_id: branch.id,
                    party_size,
                    slot_at: at("2031-05-20 19:30"),
                },
                unit.id,
                "aB3xY9".to_string(),
            )
            .await
            .unwrap();
        store
            .create_order(OrderCreate {
                reservation_id: reservation.id,
                placed_by: "mario.rossi.1990".to_string(),
                customer_id: None,
            })
            .await
            .unwrap()
    }

    async fn add_priced_items(
        store: &Arc<MemoryStore>,
        order_id: i64,
        individual: &[f64],
        shared: &[f64],
    ) -> Vec<shared::models::OrderItem> {
        let mut creates = Vec::new();
        for price in individual {
            let product = store.add_product("piatto", *price, "primi");
            creates.push(OrderItemCreate {
                product_id: product.id,
                shared: false,
            });
        }
        for price in shared {
            let product = store.add_product("bottiglia", *price, "bevande");
            creates.push(OrderItemCreate {
                product_id: product.id,
                shared: true,
            });
        }
        store.create_items(order_id, creates).await.unwrap()
    }

    fn pay(order_id: i64, amount: f64, paid_at: &str) -> PaymentCreate {
        PaymentCreate {
            order_id,
            amount,
            paid_at: at(paid_at),
        }
    }

    #[tokio::test]
    async fn shared_dishes_split_across_the_party() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 4, &[10.0, 5.0], &[12.0]).await;
        let engine = billing(&store);

        // 10 + 5, plus 12 split four ways
        assert_eq!(engine.order_total(order.id).await.unwrap(), 18.0);
    }

    #[tokio::test]
    async fn uneven_splits_round_half_up_at_the_end() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 3, &[], &[10.0]).await;
        let engine = billing(&store);

        // 10 / 3 = 3.333..., rounded once to cents
        assert_eq!(engine.order_total(order.id).await.unwrap(), 3.33);
    }

    #[tokio::test]
    async fn an_order_with_no_items_owes_nothing_and_cannot_be_paid() {
        let store = Arc::new(MemoryStore::new());
        let order = open_order(&store, 4).await;
        let engine = billing(&store);

        assert_eq!(engine.order_total(order.id).await.unwrap(), 0.0);
        let denied = engine
            .record_payment(pay(order.id, 10.0, "2031-05-20 22:45"))
            .await;
        assert!(matches!(denied, Err(OrderFlowError::EmptyOrder(_))));
    }

    #[tokio::test]
    async fn payment_settles_the_order_exactly_once() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 4, &[10.0, 5.0], &[12.0]).await;
        let engine = billing(&store);

        let payment = engine
            .record_payment(pay(order.id, 18.0, "2031-05-20 22:45"))
            .await
            .unwrap();
        assert_eq!(payment.amount, 18.0);

        let settled = store.order(order.id).await.unwrap().unwrap();
        assert_eq!(settled.payment_id, Some(payment.id));

        let denied = engine
            .record_payment(pay(order.id, 18.0, "2031-05-20 22:50"))
            .await;
        assert!(matches!(denied, Err(OrderFlowError::AlreadyPaid(_))));
    }

    #[tokio::test]
    async fn undelivered_dishes_block_the_bill() {
        let store = Arc::new(MemoryStore::new());
        let order = open_order(&store, 4).await;
        let items = add_priced_items(&store, order.id, &[10.0, 5.0], &[]).await;
        store
            .update_item_status(items[0].id, ItemStatus::Delivered)
            .await
            .unwrap();
        let engine = billing(&store);

        let denied = engine
            .record_payment(pay(order.id, 15.0, "2031-05-20 22:45"))
            .await;
        assert!(matches!(denied, Err(OrderFlowError::UndeliveredItems(_))));
    }

    #[tokio::test]
    async fn the_amount_must_cover_the_bill() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 4, &[10.0, 5.0], &[12.0]).await;
        let engine = billing(&store);

        let denied = engine
            .record_payment(pay(order.id, 17.99, "2031-05-20 22:45"))
            .await;
        assert!(matches!(
            denied,
            Err(OrderFlowError::InsufficientAmount { due, .. }) if due == 18.0
        ));

        // tipping is allowed
        engine
            .record_payment(pay(order.id, 20.0, "2031-05-20 22:45"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn amounts_must_be_positive_finite_numbers() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 2, &[10.0], &[]).await;
        let engine = billing(&store);

        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let denied = engine
                .record_payment(pay(order.id, bad, "2031-05-20 22:45"))
                .await;
            assert!(
                matches!(denied, Err(OrderFlowError::NonPositiveAmount)),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn the_till_rejects_future_timestamps() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 2, &[10.0], &[]).await;
        let engine = billing(&store);

        let denied = engine
            .record_payment(pay(order.id, 10.0, "2031-05-20 23:30"))
            .await;
        assert!(matches!(denied, Err(OrderFlowError::FuturePayment)));
    }

    #[tokio::test]
    async fn payments_register_today_or_the_morning_after() {
        let store = Arc::new(MemoryStore::new());
        let order = delivered_order(&store, 2, &[10.0], &[]).await;
        // the till closes past midnight; service was "yesterday"
        let engine = BillingEngine::with_clock(
            store.clone(),
            Clock::Fixed(at("2031-05-21 00:30")),
        );

        engine
            .record_payment(pay(order.id, 10.0, "2031-05-20 23:55"))
            .await
            .unwrap();

        let second = delivered_order(&store, 2, &[10.0], &[]).await;
        let denied = engine
            .record_payment(pay(second.id, 10.0, "2031-05-18 21:00"))
            .await;
        assert!(matches!(denied, Err(OrderFlowError::StalePaymentDate)));
    }

    #[tokio::test]
    async fn yearly_takings_fall_into_their_months() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_payment(30.0, at("2030-01-15 13:00"))
            .await
            .unwrap();
        store
            .create_payment(12.5, at("2030-01-20 21:30"))
            .await
            .unwrap();
        store
            .create_payment(45.0, at("2030-11-02 20:45"))
            .await
            .unwrap();
        store
            .create_payment(99.0, at("2029-12-31 22:00"))
            .await
            .unwrap();
        let engine = billing(&store);

        let months = engine.revenue_by_month(2030).await.unwrap();
        assert_eq!(months[0], 42.5);
        assert_eq!(months[10], 45.0);
        assert_eq!(months.iter().sum::<f64>(), 87.5);

        let empty = engine.revenue_by_month(2028).await.unwrap();
        assert!(empty.iter().all(|m| *m == 0.0));
    }
}
