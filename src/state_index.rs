//! State codec: bijection between [`GameState`] and a dense table index.
//!
//! Mixed-radix layout, most significant first:
//!
//! ```text
//! index = ((round * TARGET_SCORE + banked) * MAX_CARD + (card_1 - 1)) * MAX_CARD + ... + (card_n - 1)
//! ```
//!
//! with `n = NUM_SLOTS`. An empty slot ([`EMPTY_SLOT`] = 1) encodes as digit 0
//! and card `v` as `v - 1`, so every slot is a digit in `[0, MAX_CARD)`. All
//! `NUM_SLOTS` card digits of one `(round, banked)` bucket are contiguous.

use rayon::prelude::*;

use crate::constants::*;
use crate::error::SolveError;
use crate::types::{DrawnCards, GameRules, GameState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateCodec {
    target_score: u64,
    max_card: u64,
    num_slots: usize,
    total_states: u64,
}

impl StateCodec {
    /// Codec for validated `rules`.
    pub fn new(rules: &GameRules) -> Self {
        Self {
            target_score: rules.target_score as u64,
            max_card: rules.max_card as u64,
            num_slots: rules.num_slots(),
            total_states: rules.checked_total_states().unwrap_or(u64::MAX),
        }
    }

    /// TOTAL_STATES: one past the largest valid index.
    #[inline(always)]
    pub fn total_states(&self) -> u64 {
        self.total_states
    }

    /// Pack `state`. Out-of-range states produce indices outside the table.
    #[inline]
    pub fn encode(&self, state: &GameState) -> u64 {
        let mut index = state.round as u64;
        index = index * self.target_score + state.banked_score as u64;
        for i in 0..self.num_slots {
            index = index * self.max_card + (state.cards.slot(i) - 1) as u64;
        }
        index
    }

    /// Unpack `index`, peeling card digits from the least significant end.
    pub fn decode(&self, mut index: u64) -> GameState {
        let mut slots = [EMPTY_SLOT; SLOT_CAPACITY];
        for i in (0..self.num_slots).rev() {
            slots[i] = (index % self.max_card) as u8 + 1;
            index /= self.max_card;
        }
        let banked_score = (index % self.target_score) as u32;
        index /= self.target_score;
        GameState::new(index as u32, banked_score, DrawnCards::from_slots(slots))
    }

    /// Check that `index` and `state` describe each other.
    pub fn verify(&self, index: u64, state: &GameState) -> Result<(), SolveError> {
        let encoded = self.encode(state);
        let decoded = self.decode(index);
        if index >= self.total_states || encoded != index || decoded != *state {
            return Err(SolveError::IndexMismatch {
                index,
                encoded,
                state: *state,
                decoded,
            });
        }
        Ok(())
    }

    /// Check `encode(decode(index)) == index`.
    pub fn verify_roundtrip(&self, index: u64) -> Result<(), SolveError> {
        self.verify(index, &self.decode(index))
    }
}

/// How much of the index space the startup self-check covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexSweep {
    /// First and last index plus every first-round start state.
    Boundary,
    /// Every index in `[0, TOTAL_STATES)`, in parallel.
    Full,
}

/// Startup self-check of the codec. Returns the number of indices checked.
pub fn verify_state_indexing(
    codec: &StateCodec,
    rules: &GameRules,
    sweep: IndexSweep,
) -> Result<u64, SolveError> {
    let total = codec.total_states();
    match sweep {
        IndexSweep::Boundary => {
            codec.verify_roundtrip(0)?;
            codec.verify_roundtrip(total - 1)?;
            for score in 0..rules.target_score {
                let state = GameState::round_start(0, score);
                codec.verify(codec.encode(&state), &state)?;
            }
            Ok(2 + rules.target_score as u64)
        }
        IndexSweep::Full => {
            (0..total)
                .into_par_iter()
                .try_for_each(|index| codec.verify_roundtrip(index))?;
            Ok(total)
        }
    }
}
