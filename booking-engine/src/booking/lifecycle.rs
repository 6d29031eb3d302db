//! Reservation lifecycle engine
//!
//! One instance serves every branch of the chain. All timestamp decisions
//! go through the injected [`Clock`]; all persistence goes through the
//! [`DataStore`] traits. The engine keeps no reservation state of its own
//! apart from the per-(branch, slot) locks that serialize bookings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use shared::models::{
    OtpCheck, Reservation, ReservationCreate, ReservationStage, TableUnit, WalkInCreate,
};
use tokio::sync::Mutex;
use tracing::{info, warn};
use validator::Validate;

use crate::booking::availability;
use crate::booking::error::{BookingError, BookingResult};
use crate::booking::otp;
use crate::booking::slots::{
    current_window_slot, normalize_slot, slots_for_date, within_walk_in_grace,
};
use crate::core::Config;
use crate::store::{DataStore, StoreError};
use crate::utils::time::Clock;

pub struct ReservationLifecycle<S> {
    store: Arc<S>,
    config: Config,
    clock: Clock,
    /// One async mutex per (branch, slot); taken for the whole
    /// check-and-commit sequence of creates and moves.
    slot_locks: DashMap<(i64, NaiveDateTime), Arc<Mutex<()>>>,
}

impl<S: DataStore> ReservationLifecycle<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, Config::from_env(), Clock::System)
    }

    pub fn with_config(store: Arc<S>, config: Config) -> Self {
        Self::with_clock(store, config, Clock::System)
    }

    pub fn with_clock(store: Arc<S>, config: Config, clock: Clock) -> Self {
        Self {
            store,
            config,
            clock,
            slot_locks: DashMap::new(),
        }
    }

    fn slot_lock(&self, branch_id: i64, slot: NaiveDateTime) -> Arc<Mutex<()>> {
        self.slot_locks
            .entry((branch_id, slot))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn check_party_size(&self, party_size: u32) -> BookingResult<()> {
        if party_size < 1 || party_size > self.config.max_party_size {
            return Err(BookingError::PartySizeOutOfRange {
                given: party_size,
                max: self.config.max_party_size,
            });
        }
        Ok(())
    }

    async fn require_branch(&self, branch_id: i64) -> BookingResult<shared::models::Branch> {
        self.store
            .branch(branch_id)
            .await?
            .ok_or(BookingError::BranchNotFound(branch_id))
    }

    async fn require_reservation(&self, id: i64) -> BookingResult<Reservation> {
        self.store
            .reservation(id)
            .await?
            .ok_or(BookingError::ReservationNotFound(id))
    }

    /// Book a slot for a registered customer.
    ///
    /// Checks run in a fixed order so rejections are stable: slot validity,
    /// past date, the one-upcoming-reservation rule, table capacity, unit
    /// availability. The reservation starts in [`ReservationStage::Requested`]
    /// with no OTP.
    pub async fn reserve_online(&self, input: ReservationCreate) -> BookingResult<Reservation> {
        let now = self.clock.now();
        self.check_party_size(input.party_size)?;
        let slot = normalize_slot(input.slot_at).ok_or(BookingError::InvalidSlot)?;
        if slot < now {
            return Err(BookingError::PastDate);
        }

        // one upcoming reservation per customer, chain-wide
        let existing = self.store.reservations_by_customer(input.customer_id).await?;
        if existing.iter().any(|r| !r.is_past(now)) {
            return Err(BookingError::DuplicateFutureReservation(input.customer_id));
        }

        let branch = self.require_branch(input.branch_id).await?;
        let lock = self.slot_lock(branch.id, slot);
        let _guard = lock.lock().await;

        availability::ensure_capacity(self.store.as_ref(), &branch, slot, input.party_size, None)
            .await?;
        let unit = self.pick_free_unit(branch.id, slot).await?;

        let create = ReservationCreate {
            slot_at: slot,
            ..input
        };
        let reservation = self
            .store
            .create_reservation(create, unit.id)
            .await
            .map_err(Self::unit_race_to_booking)?;

        info!(
            reservation_id = reservation.id,
            branch_id = branch.id,
            slot = %slot,
            party_size = reservation.party_size,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Seat a party that showed up without booking. Staff-side: the grace
    /// period replaces the past-date rule, the OTP is bound immediately and
    /// the reservation starts confirmed.
    pub async fn reserve_walk_in(&self, input: WalkInCreate) -> BookingResult<Reservation> {
        let now = self.clock.now();
        self.check_party_size(input.party_size)?;
        let slot = normalize_slot(input.slot_at).ok_or(BookingError::InvalidSlot)?;
        if !within_walk_in_grace(slot, now) {
            return Err(BookingError::PastDate);
        }

        let branch = self.require_branch(input.branch_id).await?;
        let lock = self.slot_lock(branch.id, slot);
        let _guard = lock.lock().await;

        availability::ensure_capacity(self.store.as_ref(), &branch, slot, input.party_size, None)
            .await?;
        let unit = self.pick_free_unit(branch.id, slot).await?;

        let create = WalkInCreate {
            slot_at: slot,
            ..input
        };
        let reservation = self
            .store
            .create_confirmed_reservation(create, unit.id, otp::generate())
            .await
            .map_err(Self::unit_race_to_booking)?;

        info!(
            reservation_id = reservation.id,
            branch_id = branch.id,
            slot = %slot,
            party_size = reservation.party_size,
            "walk-in seated"
        );
        Ok(reservation)
    }

    /// Mark the party as arrived: issue a fresh OTP and confirm the
    /// reservation. Repeatable; each call replaces the previous code.
    pub async fn confirm_arrival(&self, id: i64) -> BookingResult<Reservation> {
        let mut reservation = self.require_reservation(id).await?;
        reservation.otp = Some(otp::generate());
        reservation.stage = ReservationStage::Confirmed;
        self.store.update_reservation(&reservation).await?;
        info!(reservation_id = id, "arrival confirmed, code issued");
        Ok(reservation)
    }

    /// Move a reservation to a new party size and slot.
    ///
    /// The new values go through the same slot and past-date checks as a
    /// fresh booking; capacity is re-checked with the reservation's own
    /// footprint excluded. The unit is kept when it is still free at the
    /// new slot, otherwise rebound.
    pub async fn modify(
        &self,
        id: i64,
        party_size: u32,
        slot_at: NaiveDateTime,
    ) -> BookingResult<Reservation> {
        let now = self.clock.now();
        self.check_party_size(party_size)?;
        let mut reservation = self.require_reservation(id).await?;
        if reservation.is_past(now) {
            return Err(BookingError::PastReservation);
        }
        let slot = normalize_slot(slot_at).ok_or(BookingError::InvalidSlot)?;
        if slot < now {
            return Err(BookingError::PastDate);
        }

        let branch = self.require_branch(reservation.branch_id).await?;
        let lock = self.slot_lock(branch.id, slot);
        let _guard = lock.lock().await;

        availability::ensure_capacity(self.store.as_ref(), &branch, slot, party_size, Some(id))
            .await?;

        // keep the current unit when it is ours or free at the new slot
        let kept = match reservation.unit_id {
            Some(unit_id) => {
                let holder = self
                    .store
                    .reservation_by_slot_and_unit(slot, unit_id)
                    .await?;
                match holder {
                    None => Some(unit_id),
                    Some(other) if other.id == id => Some(unit_id),
                    Some(_) => None,
                }
            }
            None => None,
        };
        let unit_id = match kept {
            Some(unit_id) => unit_id,
            None => self.pick_free_unit(branch.id, slot).await?.id,
        };

        reservation.party_size = party_size;
        reservation.slot_at = slot;
        reservation.unit_id = Some(unit_id);
        self.store
            .update_reservation(&reservation)
            .await
            .map_err(Self::unit_race_to_booking)?;

        info!(
            reservation_id = id,
            slot = %slot,
            party_size,
            unit_id,
            "reservation modified"
        );
        Ok(reservation)
    }

    /// Cancel an upcoming reservation. Elapsed ones are history and stay.
    pub async fn cancel(&self, id: i64) -> BookingResult<()> {
        let now = self.clock.now();
        let reservation = self.require_reservation(id).await?;
        if reservation.is_past(now) {
            return Err(BookingError::PastReservation);
        }
        self.store.delete_reservation(id).await?;
        info!(reservation_id = id, "reservation cancelled");
        Ok(())
    }

    /// Verify a guest-typed code against the reservation holding the unit
    /// at the given slot. Returns the reservation id on success.
    pub async fn check_otp(&self, check: OtpCheck) -> BookingResult<i64> {
        check.validate()?;
        let slot = normalize_slot(check.slot_at).ok_or(BookingError::InvalidSlot)?;
        let reservation = self
            .store
            .reservation_by_slot_and_unit(slot, check.unit_id)
            .await?
            .ok_or(BookingError::NoReservationAtSlot {
                unit_id: check.unit_id,
                slot,
            })?;
        let stored = reservation.otp.as_deref().ok_or(BookingError::OtpNotFound)?;
        if stored != check.otp {
            warn!(
                reservation_id = reservation.id,
                unit_id = check.unit_id,
                "code mismatch"
            );
            return Err(BookingError::OtpMismatch);
        }
        Ok(reservation.id)
    }

    /// The code a unit's display should show right now: the OTP of whatever
    /// reservation holds the unit in the current service window. `None`
    /// outside every window, or when the unit sits idle, or before arrival.
    pub async fn current_otp_for_unit(&self, unit_id: i64) -> BookingResult<Option<String>> {
        let now = self.clock.now();
        let Some(slot) = current_window_slot(now) else {
            return Ok(None);
        };
        let Some(reservation) = self
            .store
            .reservation_by_slot_and_unit(slot, unit_id)
            .await?
        else {
            return Ok(None);
        };
        Ok(reservation.otp)
    }

    /// Units of a branch with no reservation at the given slot.
    pub async fn free_units(
        &self,
        branch_id: i64,
        slot_at: NaiveDateTime,
    ) -> BookingResult<Vec<TableUnit>> {
        let slot = normalize_slot(slot_at).ok_or(BookingError::InvalidSlot)?;
        self.require_branch(branch_id).await?;
        Ok(self.store.free_units_for_slot(branch_id, slot).await?)
    }

    /// Every reservation of a branch across the day's four slots, in
    /// seating order.
    pub async fn reservations_for_day(
        &self,
        branch_id: i64,
        date: NaiveDate,
    ) -> BookingResult<Vec<Reservation>> {
        self.require_branch(branch_id).await?;
        let mut day = Vec::new();
        for slot in slots_for_date(date) {
            day.extend(
                self.store
                    .reservations_by_branch_and_slot(branch_id, slot)
                    .await?,
            );
        }
        Ok(day)
    }

    /// Occupied-table counts per slot for one branch and day.
    pub async fn occupancy(
        &self,
        branch_id: i64,
        date: NaiveDate,
    ) -> BookingResult<HashMap<NaiveDateTime, u32>> {
        self.require_branch(branch_id).await?;
        availability::compute_occupancy(self.store.as_ref(), branch_id, date).await
    }

    async fn pick_free_unit(&self, branch_id: i64, slot: NaiveDateTime) -> BookingResult<TableUnit> {
        self.store
            .free_units_for_slot(branch_id, slot)
            .await?
            .into_iter()
            .next()
            .ok_or(BookingError::NoUnitAvailable)
    }

    /// A lost (unit, slot) race surfaces as unit exhaustion, not as a
    /// storage failure.
    fn unit_race_to_booking(err: StoreError) -> BookingError {
        match err {
            StoreError::Conflict(_) => BookingError::NoUnitAvailable,
            other => other.into(),
        }
    }
}
