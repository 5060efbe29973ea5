//! Per-party breakdown of a roll call.
//!
//! Built from normalized positions, so House and Senate votes share it.

use super::{PartyTally, VotePosition};

/// Counts casts per party. Positions without a recognized party are left
/// out, so the grand total can be smaller than `positions.len()`.
pub fn tally_by_party(positions: &[VotePosition]) -> PartyTally {
    let mut tally = PartyTally::new();
    for position in positions {
        if let Some(party) = position.party {
            *tally
                .entry(party)
                .or_default()
                .entry(position.vote_cast)
                .or_insert(0) += 1;
        }
    }
    tally
}
