//! Full service arc, online and walk-in
//!
//! Drives one reservation from booking through arrival, ordering, kitchen
//! work and the final bill, using only the crate's public surface. Each
//! test is one evening at a small branch.

use std::sync::Arc;

use booking_engine::store::OrderStore;
use booking_engine::{
    BillingEngine, Clock, Config, MemoryStore, OrderWorkflow, ReservationLifecycle,
};
use chrono::NaiveDateTime;
use shared::models::{
    ItemStatus, OrderCreate, OrderItemCreate, OtpCheck, PaymentCreate, ReservationCreate,
    ReservationStage, ServiceStatus, WalkInCreate,
};

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn lifecycle_at(store: &Arc<MemoryStore>, now: &str) -> ReservationLifecycle<MemoryStore> {
    ReservationLifecycle::with_clock(
        store.clone(),
        Config::with_max_party_size(20),
        Clock::Fixed(at(now)),
    )
}

/// Branch with three two-seaters and a short menu.
fn seed(store: &Arc<MemoryStore>) -> (i64, Vec<i64>, [i64; 3]) {
    let branch = store.add_branch("Milano", "Via Roma 1", 12);
    let units = store
        .add_units(branch.id, 3)
        .into_iter()
        .map(|u| u.id)
        .collect();
    let carbonara = store.add_product("Carbonara", 12.5, "primi").id;
    let tagliata = store.add_product("Tagliata", 22.0, "secondi").id;
    let barolo = store.add_product("Barolo", 36.0, "bevande").id;
    (branch.id, units, [carbonara, tagliata, barolo])
}

#[tokio::test]
async fn dinner_service_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let (branch_id, _, [carbonara, tagliata, barolo]) = seed(&store);

    // Morning: customer 501 books dinner for four online.
    let lifecycle = lifecycle_at(&store, "2031-05-20 10:00:00");
    let booked = lifecycle
        .reserve_online(ReservationCreate {
            branch_id,
            customer_id: 501,
            party_size: 4,
            slot_at: at("2031-05-20 19:30:00"),
        })
        .await
        .unwrap();
    assert_eq!(booked.stage, ReservationStage::Requested);
    assert!(booked.otp.is_none());
    let unit_id = booked.unit_id.unwrap();

    // Two tables held for a party of four.
    let occupancy = lifecycle
        .occupancy(branch_id, at("2031-05-20 19:30:00").date())
        .await
        .unwrap();
    assert_eq!(occupancy.get(&at("2031-05-20 19:30:00")), Some(&2));

    let workflow = OrderWorkflow::new(store.clone());
    assert_eq!(
        workflow.table_status(booked.id).await.unwrap(),
        ServiceStatus::AwaitingArrival
    );

    // Evening: the party shows up and gets a code for the table.
    let evening = lifecycle_at(&store, "2031-05-20 19:32:00");
    let arrived = evening.confirm_arrival(booked.id).await.unwrap();
    assert_eq!(arrived.stage, ReservationStage::Confirmed);
    let code = arrived.otp.clone().unwrap();

    let denied = evening
        .check_otp(OtpCheck {
            slot_at: at("2031-05-20 19:30:00"),
            unit_id,
            otp: "zzzzz0".to_string(),
        })
        .await;
    assert!(denied.is_err());
    let verified = evening
        .check_otp(OtpCheck {
            slot_at: at("2031-05-20 19:30:00"),
            unit_id,
            otp: code.clone(),
        })
        .await
        .unwrap();
    assert_eq!(verified, booked.id);
    assert_eq!(
        evening.current_otp_for_unit(unit_id).await.unwrap(),
        Some(code)
    );

    // One diner orders: two dishes of their own, wine for the table.
    let order = workflow
        .open_order(OrderCreate {
            reservation_id: booked.id,
            placed_by: "mario.rossi.1990".to_string(),
            customer_id: Some(501),
        })
        .await
        .unwrap();
    let items = workflow
        .add_items(
            order.id,
            vec![
                OrderItemCreate {
                    product_id: carbonara,
                    shared: false,
                },
                OrderItemCreate {
                    product_id: tagliata,
                    shared: false,
                },
                OrderItemCreate {
                    product_id: barolo,
                    shared: true,
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(
        workflow.table_status(booked.id).await.unwrap(),
        ServiceStatus::NotStarted
    );
    assert_eq!(
        workflow.kitchen_status(booked.id).await.unwrap(),
        ServiceStatus::NotStarted
    );

    // The kitchen picks everything up, then sends it out.
    for item in &items {
        workflow
            .advance_item(item.id, ItemStatus::InPreparation)
            .await
            .unwrap();
    }
    assert_eq!(
        workflow.kitchen_status(booked.id).await.unwrap(),
        ServiceStatus::InProgress
    );
    for item in &items {
        workflow
            .advance_item(item.id, ItemStatus::InDelivery)
            .await
            .unwrap();
    }
    assert_eq!(
        workflow.table_status(booked.id).await.unwrap(),
        ServiceStatus::InDelivery
    );
    for item in &items {
        workflow
            .advance_item(item.id, ItemStatus::Delivered)
            .await
            .unwrap();
    }
    assert_eq!(
        workflow.table_status(booked.id).await.unwrap(),
        ServiceStatus::Delivered
    );
    assert_eq!(
        workflow.kitchen_status(booked.id).await.unwrap(),
        ServiceStatus::Delivered
    );

    // The bill: 12.50 + 22.00 own, 36.00 split four ways.
    let billing = BillingEngine::with_clock(store.clone(), Clock::Fixed(at("2031-05-20 23:00:00")));
    let due = billing.order_total(order.id).await.unwrap();
    assert_eq!(due, 43.5);

    billing
        .record_payment(PaymentCreate {
            order_id: order.id,
            amount: due,
            paid_at: at("2031-05-20 22:45:00"),
        })
        .await
        .unwrap();
    let settled = store.order(order.id).await.unwrap().unwrap();
    assert!(settled.is_paid());

    // May's takings carry the evening.
    let months = billing.revenue_by_month(2031).await.unwrap();
    assert_eq!(months[4], 43.5);
    assert_eq!(months.iter().sum::<f64>(), 43.5);
}

#[tokio::test]
async fn walk_in_service_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let (branch_id, _, [carbonara, ..]) = seed(&store);

    // A couple walks in a few minutes after the dinner slot opens.
    let lifecycle = lifecycle_at(&store, "2031-05-20 19:35:00");
    let seated = lifecycle
        .reserve_walk_in(WalkInCreate {
            branch_id,
            party_size: 2,
            slot_at: at("2031-05-20 19:30:00"),
        })
        .await
        .unwrap();
    assert_eq!(seated.stage, ReservationStage::Confirmed);
    assert_eq!(seated.customer_id, None);
    let code = seated.otp.clone().unwrap();
    let unit_id = seated.unit_id.unwrap();

    // The code works right away; no separate arrival step.
    let verified = lifecycle
        .check_otp(OtpCheck {
            slot_at: at("2031-05-20 19:30:00"),
            unit_id,
            otp: code,
        })
        .await
        .unwrap();
    assert_eq!(verified, seated.id);

    let workflow = OrderWorkflow::new(store.clone());
    let order = workflow
        .open_order(OrderCreate {
            reservation_id: seated.id,
            placed_by: "anna.bianchi.1988".to_string(),
            customer_id: None,
        })
        .await
        .unwrap();
    let items = workflow
        .add_items(
            order.id,
            vec![OrderItemCreate {
                product_id: carbonara,
                shared: false,
            }],
        )
        .await
        .unwrap();
    for target in [
        ItemStatus::InPreparation,
        ItemStatus::InDelivery,
        ItemStatus::Delivered,
    ] {
        workflow.advance_item(items[0].id, target).await.unwrap();
    }

    let billing = BillingEngine::with_clock(store.clone(), Clock::Fixed(at("2031-05-20 22:00:00")));
    assert_eq!(billing.order_total(order.id).await.unwrap(), 12.5);
    billing
        .record_payment(PaymentCreate {
            order_id: order.id,
            amount: 15.0,
            paid_at: at("2031-05-20 21:50:00"),
        })
        .await
        .unwrap();
    assert!(store.order(order.id).await.unwrap().unwrap().is_paid());
}

#[tokio::test]
async fn reservation_wire_shape_hides_unset_fields() {
    let store = Arc::new(MemoryStore::new());
    let (branch_id, _, _) = seed(&store);

    let lifecycle = lifecycle_at(&store, "2031-05-20 10:00:00");
    let booked = lifecycle
        .reserve_online(ReservationCreate {
            branch_id,
            customer_id: 501,
            party_size: 2,
            slot_at: at("2031-05-20 12:00:00"),
        })
        .await
        .unwrap();

    // No code before arrival, and none leaked on the wire.
    let json = serde_json::to_value(&booked).unwrap();
    assert!(json.get("otp").is_none());
    assert_eq!(json["stage"], "REQUESTED");
    assert_eq!(json["party_size"], 2);

    let confirmed = lifecycle.confirm_arrival(booked.id).await.unwrap();
    let json = serde_json::to_value(&confirmed).unwrap();
    assert_eq!(json["stage"], "CONFIRMED");
    assert_eq!(json["otp"], confirmed.otp.unwrap());
}
