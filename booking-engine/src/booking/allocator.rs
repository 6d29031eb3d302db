//! Table allocation policy
//!
//! Every dining room is furnished with identical four-seat tables that link
//! end to end into longer rows. A single table seats four; each table added
//! to the row contributes two more seats, since the joined ends swallow one
//! seat pair per junction.

/// Minimum number of linked tables for a party.
///
/// Smallest `t >= 1` such that `2t + 2 >= party_size`: parties of 1-4 take
/// one table, 5-6 two, 7-8 three, and so on. Callers validate the party
/// size range; `0` is clamped to one table rather than treated as an error.
pub fn tables_needed(party_size: u32) -> u32 {
    party_size.saturating_sub(2).div_ceil(2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_parties_share_one_table() {
        for party in 1..=4 {
            assert_eq!(tables_needed(party), 1, "party of {party}");
        }
    }

    #[test]
    fn each_extra_pair_adds_a_table() {
        assert_eq!(tables_needed(5), 2);
        assert_eq!(tables_needed(6), 2);
        assert_eq!(tables_needed(7), 3);
        assert_eq!(tables_needed(8), 3);
        assert_eq!(tables_needed(12), 5);
    }

    #[test]
    fn allocation_is_minimal() {
        for party in 1..=40u32 {
            let tables = tables_needed(party);
            assert!(2 * tables + 2 >= party, "party of {party} fits");
            if tables > 1 {
                assert!(2 * (tables - 1) + 2 < party, "party of {party} is not over-allocated");
            }
        }
    }
}
