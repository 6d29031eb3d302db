//! One-time codes
//!
//! Six alphanumeric characters bound to a reservation once the party is at
//! the table. The unit's display shows the code; guests type it to open
//! the ordering session on their own devices. Comparison is exact and
//! case-sensitive.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Code length, enforced on both issue and verification.
pub const OTP_LEN: usize = 6;

/// Draw a fresh code from `[A-Za-z0-9]`.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(OTP_LEN)
        .map(char::from)
        .collect()
}
