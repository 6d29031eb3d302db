//! ID and timestamp helpers.

use rand::Rng;

/// Epoch for ID timestamps: 2024-01-01 00:00:00 UTC.
const ID_EPOCH_MS: i64 = 1_704_067_200_000;

/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a snowflake-style `i64` resource ID.
///
/// 53 bits total so the value survives a round-trip through a JavaScript
/// client (`Number.MAX_SAFE_INTEGER`): 41 bits of milliseconds since
/// [`ID_EPOCH_MS`] followed by 12 random bits. 4096 values per millisecond
/// is collision-free at restaurant scale.
pub fn snowflake_id() -> i64 {
    let ts = (now_millis() - ID_EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let noise: i64 = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | noise
}
