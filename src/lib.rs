//! # Flip 7 optimal fold/draw policy
//!
//! Computes, for every reachable state of a push-your-luck card game, the
//! expected number of rounds needed to reach the target score under optimal
//! play, using **memoized backward induction** over a DAG of
//! `MAX_ROUNDS × TARGET_SCORE × MAX_CARD^NUM_SLOTS` indexed states.
//!
//! ## Game
//!
//! Each round the player draws cards from a freshly shuffled deck (3 wild 2s,
//! `v` copies of each `v` in 3..=12) and after every card chooses to **fold**
//! (bank the round) or **draw** again. Drawing a non-wild value twice **busts**
//! and loses the round. Seven safe draws end the round with a 15 point bonus.
//!
//! ## Pipeline
//!
//! | Step | Rust module | Description |
//! |------|-------------|-------------|
//! | Index | [`state_index`] | Mixed-radix bijection state ↔ table index, startup self-check |
//! | Weights | [`deck`] | P(v \| drawn): sampling without replacement from the round deck |
//! | Rules | [`game_mechanics`] | Bust, fold and draw-limit outcomes and their round cost |
//! | Solve | [`value_solver`] | E(S) = min(FOLD, DRAW), memoized in the [`types::ValueTable`] |
//! | Precompute | [`state_computation`] | Solve every first-round start state |
//! | Query | [`query`] | Fold/draw values for a partial first round |
//! | Simulate | [`simulation`] | Play games with the solved policy |
//!
//! ## Cost accounting
//!
//! Reaching the target during round `r` costs `r`: only rounds fully consumed
//! before it count. A game that has not reached the target when the final
//! round ends costs `MAX_ROUNDS`, folding in the final round included. All
//! values therefore lie in `[0, MAX_ROUNDS]`.
//!
//! ## Table layout
//!
//! The full game has ~5.97 × 10⁹ slots (~24 GB of f32). [`types::TableLayout::Paged`]
//! allocates one page per `(round, banked_score)` bucket on first write;
//! [`types::TableLayout::Dense`] allocates everything up front. Both share the
//! same index.
//!
//! Paging defers allocation, it does not shrink the table: folding an empty
//! hand carries any bank into the next round, so a full precompute touches
//! every bucket and ends at the dense footprint. Only work that stops short of
//! the precompute (single queries, tests on partial tables) stays smaller.

pub mod config;
pub mod constants;
pub mod deck;
pub mod error;
pub mod game_mechanics;
pub mod query;
pub mod simulation;
pub mod state_computation;
pub mod state_index;
pub mod types;
pub mod value_solver;
