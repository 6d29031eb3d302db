use std::sync::Arc;

use chrono::NaiveDateTime;
use shared::models::{Branch, ReservationCreate, TableUnit, WalkInCreate};

use super::*;
use crate::core::Config;
use crate::store::MemoryStore;
use crate::utils::time::{Clock, parse_date_time};

/// Reference instant for the scenarios: a morning well before the first
/// seating, on a date far enough out that the system clock never catches up.
const NOW: &str = "2031-05-20 10:00";

fn at(value: &str) -> NaiveDateTime {
    parse_date_time(value).unwrap()
}

struct TestBranch {
    store: Arc<MemoryStore>,
    lifecycle: ReservationLifecycle<MemoryStore>,
    branch: Branch,
    units: Vec<TableUnit>,
}

/// A branch seeded with tables and units, engine clock pinned to [`NOW`].
fn branch_with(tables: u32, units: usize) -> TestBranch {
    branch_at(tables, units, NOW)
}

fn branch_at(tables: u32, units: usize, now: &str) -> TestBranch {
    let store = Arc::new(MemoryStore::new());
    let branch = store.add_branch("Milano", "Via Savona 17", tables);
    let units = store.add_units(branch.id, units);
    let lifecycle = lifecycle_at(&store, now);
    TestBranch {
        store,
        lifecycle,
        branch,
        units,
    }
}

/// A second engine over the same store with its clock pinned elsewhere.
fn lifecycle_at(store: &Arc<MemoryStore>, now: &str) -> ReservationLifecycle<MemoryStore> {
    ReservationLifecycle::with_clock(
        store.clone(),
        Config::with_max_party_size(20),
        Clock::Fixed(at(now)),
    )
}

fn online(branch_id: i64, customer_id: i64, party_size: u32, slot: &str) -> ReservationCreate {
    ReservationCreate {
        branch_id,
        customer_id,
        party_size,
        slot_at: at(slot),
    }
}

fn walk_in(branch_id: i64, party_size: u32, slot: &str) -> WalkInCreate {
    WalkInCreate {
        branch_id,
        party_size,
        slot_at: at(slot),
    }
}
