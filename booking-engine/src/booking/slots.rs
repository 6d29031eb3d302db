//! Slot catalog and service windows
//!
//! The chain seats exactly four times a day, every day, at fixed wall-clock
//! times. A reservation timestamp is valid only when its hour and minute
//! equal a slot exactly; any other minute is rejected rather than rounded.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// The four daily seatings, as (hour, minute).
pub const SLOT_TIMES: [(u32, u32); 4] = [(12, 0), (13, 30), (19, 30), (21, 0)];

/// Minutes of grace before a seating during which a walk-in may still be
/// taken and a unit display already resolves to the upcoming slot.
pub const ARRIVAL_GRACE_MIN: i64 = 10;

/// When each seating hands the room over. The lunch tail runs until 19:00;
/// 19:00 to 19:20 belongs to no window at all.
const WINDOW_ENDS: [(u32, u32); 4] = [(13, 30), (19, 0), (21, 0), (22, 30)];

/// The canonical slot timestamp for `at`: same date, matched slot time,
/// seconds zeroed. `None` when the hour:minute pair is not a seating.
pub fn normalize_slot(at: NaiveDateTime) -> Option<NaiveDateTime> {
    SLOT_TIMES
        .iter()
        .find(|&&(h, m)| at.hour() == h && at.minute() == m)
        .map(|&(h, m)| at.date().and_hms_opt(h, m, 0).unwrap_or_default())
}

/// Does `at` land on a seating (hour and minute equality)?
pub fn is_slot_time(at: NaiveDateTime) -> bool {
    normalize_slot(at).is_some()
}

/// The four slot timestamps of a calendar day, in seating order.
pub fn slots_for_date(date: NaiveDate) -> [NaiveDateTime; 4] {
    SLOT_TIMES.map(|(h, m)| date.and_hms_opt(h, m, 0).unwrap_or_default())
}

/// Walk-ins may still be seated up to [`ARRIVAL_GRACE_MIN`] minutes past
/// the slot start.
pub fn within_walk_in_grace(slot: NaiveDateTime, now: NaiveDateTime) -> bool {
    now <= slot + Duration::minutes(ARRIVAL_GRACE_MIN)
}

/// The slot whose service window contains `now`, with the pre-start grace
/// counted in. Windows are checked in seating order and the first match
/// wins, so a boundary instant shared by two windows resolves to the
/// earlier seating.
pub fn current_window_slot(now: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = now.date();
    for (i, &(h, m)) in SLOT_TIMES.iter().enumerate() {
        let start = date.and_hms_opt(h, m, 0).unwrap_or_default();
        let (end_h, end_m) = WINDOW_ENDS[i];
        let end = date.and_hms_opt(end_h, end_m, 0).unwrap_or_default();
        if now >= start - Duration::minutes(ARRIVAL_GRACE_MIN) && now <= end {
            return Some(start);
        }
    }
    None
}
