//! Dashboard projections
//!
//! Waitstaff and the kitchen watch the same line items through different
//! priorities. Both views are pure functions of the reservation's current
//! rows, recomputed on every read.

use shared::models::{ItemStatus, ServiceStatus};

/// Waitstaff view. Delivery activity outranks kitchen activity; a table
/// reads as fully served only when it has items and every one is on it.
pub fn waitstaff_status(has_otp: bool, order_count: usize, items: &[ItemStatus]) -> ServiceStatus {
    if !has_otp {
        return ServiceStatus::AwaitingArrival;
    }
    if order_count == 0 {
        return ServiceStatus::NoOrders;
    }
    if items.iter().any(|s| *s == ItemStatus::InDelivery) {
        return ServiceStatus::InDelivery;
    }
    if items.iter().any(|s| *s == ItemStatus::InPreparation) {
        return ServiceStatus::InProgress;
    }
    if !items.is_empty() && items.iter().all(|s| *s == ItemStatus::Delivered) {
        return ServiceStatus::Delivered;
    }
    ServiceStatus::NotStarted
}

/// Kitchen view. Anything still untouched outranks work in progress, so the
/// pass never loses track of dishes nobody has started.
pub fn kitchen_status(has_otp: bool, order_count: usize, items: &[ItemStatus]) -> ServiceStatus {
    if !has_otp {
        return ServiceStatus::AwaitingArrival;
    }
    if order_count == 0 {
        return ServiceStatus::NoOrders;
    }
    if items.iter().any(|s| *s == ItemStatus::NotStarted) {
        return ServiceStatus::NotStarted;
    }
    if items.iter().any(|s| *s == ItemStatus::InPreparation) {
        return ServiceStatus::InProgress;
    }
    ServiceStatus::Delivered
}
