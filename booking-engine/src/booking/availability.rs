//! Per-slot capacity accounting
//!
//! Occupancy is recomputed from the live reservation rows on every check;
//! nothing is cached and nothing expires. Elapsed reservations keep their
//! rows and so keep counting against their slot, which only ever holds
//! bookings for that exact timestamp anyway.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use shared::models::Branch;

use crate::booking::allocator::tables_needed;
use crate::booking::error::{BookingError, BookingResult};
use crate::booking::slots::slots_for_date;
use crate::store::ReservationStore;

/// Tables taken at `branch_id` for exactly `slot`. `exclude` removes one
/// reservation's own footprint, used when that reservation is being moved.
async fn occupied_tables<S: ReservationStore>(
    store: &S,
    branch_id: i64,
    slot: NaiveDateTime,
    exclude: Option<i64>,
) -> BookingResult<u32> {
    let reservations = store.reservations_by_branch_and_slot(branch_id, slot).await?;
    Ok(reservations
        .iter()
        .filter(|r| Some(r.id) != exclude)
        .map(|r| tables_needed(r.party_size))
        .sum())
}

/// Occupied-table counts for each of a day's four slots at one branch.
pub async fn compute_occupancy<S: ReservationStore>(
    store: &S,
    branch_id: i64,
    date: NaiveDate,
) -> BookingResult<HashMap<NaiveDateTime, u32>> {
    let mut occupancy = HashMap::with_capacity(4);
    for slot in slots_for_date(date) {
        occupancy.insert(slot, occupied_tables(store, branch_id, slot, None).await?);
    }
    Ok(occupancy)
}

/// Gate a party into `slot`: the tables it needs must fit next to what the
/// slot already holds. On rejection the error reports how many whole
/// tables remain.
pub async fn ensure_capacity<S: ReservationStore>(
    store: &S,
    branch: &Branch,
    slot: NaiveDateTime,
    party_size: u32,
    exclude: Option<i64>,
) -> BookingResult<()> {
    let occupied = occupied_tables(store, branch.id, slot, exclude).await?;
    let needed = tables_needed(party_size);
    if occupied + needed > branch.table_count {
        let remaining = branch.table_count.saturating_sub(occupied);
        tracing::warn!(
            branch_id = branch.id,
            slot = %slot,
            party_size,
            needed,
            remaining,
            "slot capacity exhausted"
        );
        return Err(BookingError::InsufficientCapacity { remaining });
    }
    Ok(())
}
