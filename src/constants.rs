//! Game constants for the default Flip 7 rule set.
//!
//! The solver carries these as a validated [`GameRules`](crate::types::GameRules)
//! value so that small rule sets can be solved exhaustively in tests. The
//! defaults below reproduce the full game:
//! - [`MAX_ROUNDS`] = 10 rounds to reach [`TARGET_SCORE`] = 200
//! - cards 2..=[`MAX_CARD`] (12), with 3 copies of the wild 2 and `v` copies of `v`
//! - [`MAX_DRAWS`] = 7 safe draws end the round with a [`DRAW_LIMIT_BONUS`] of 15

/// Rounds available before the game counts as failed.
pub const MAX_ROUNDS: u32 = 10;

/// Cumulative score that ends the game.
pub const TARGET_SCORE: u32 = 200;

/// Highest card value in the deck.
pub const MAX_CARD: u8 = 12;

/// Cards per round that trigger the automatic draw-limit stop.
pub const MAX_DRAWS: u8 = 7;

/// Bonus added to the round score when [`MAX_DRAWS`] cards are drawn without busting.
pub const DRAW_LIMIT_BONUS: u32 = 15;

/// The one card value exempt from the bust rule.
pub const WILD_VALUE: u8 = 2;

/// Copies of the wild value in the deck. Every other value `v` has `v` copies.
pub const WILD_COPIES: u32 = 3;

/// Lowest drawable card value.
pub const MIN_CARD: u8 = WILD_VALUE;

/// Slot sentinel for "not yet drawn". Encodes as radix digit 0.
pub const EMPTY_SLOT: u8 = 1;

/// Table marker for states that have not been solved yet.
pub const UNSOLVED: f32 = -1.0;

/// Capacity of the fixed card-slot array. Bounds `MAX_DRAWS - 1` for any rule set.
pub const SLOT_CAPACITY: usize = 8;

/// Largest card value a rule set may use.
pub const MAX_CARD_LIMIT: u8 = 20;
