//! Error types for rule validation, table allocation, solving and query parsing.

use thiserror::Error;

use crate::types::GameState;

/// Invalid game parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("max_rounds must be at least 1")]
    NoRounds,
    #[error("target_score must be at least 1")]
    NoTarget,
    #[error("max_card must be in [2, {limit}], got {got}")]
    CardRange { got: u8, limit: u8 },
    #[error("max_draws must be in [1, {limit}], got {got}")]
    DrawRange { got: u8, limit: usize },
    #[error("deck holds {total_cards} cards, fewer than max_draws = {max_draws}")]
    DeckTooSmall { total_cards: u32, max_draws: u8 },
    #[error("state count overflows the index space")]
    TooManyStates,
}

/// Value table construction failures.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot allocate dense value table of {slots} slots: {source}")]
    Allocation {
        slots: u64,
        #[source]
        source: std::collections::TryReserveError,
    },
    #[error("table of {0} slots does not fit in the address space")]
    AddressSpace(u64),
}

/// Solver failures. Both variants indicate a bug or a misuse, never bad luck.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("state index mismatch\nIndex: {index} vs {encoded}\nState: {state}\nDecoded: {decoded}")]
    IndexMismatch {
        /// Index handed to the solver.
        index: u64,
        /// `encode(state)`.
        encoded: u64,
        /// State handed to the solver.
        state: GameState,
        /// `decode(index)`.
        decoded: GameState,
    },
    #[error("state {index} has not been solved")]
    Unsolved { index: u64 },
}

/// Malformed interactive query. The query loop drops these silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("empty query")]
    Empty,
    #[error("not an integer: {0:?}")]
    NotAnInteger(String),
    #[error("score {score} outside [0, {target})")]
    ScoreOutOfRange { score: i64, target: u32 },
    #[error("{count} cards exceed the {slots} available slots")]
    TooManyCards { count: usize, slots: usize },
    #[error("card {card} outside [2, {max_card}]")]
    CardOutOfRange { card: i64, max_card: u8 },
    #[error("card {card} drawn {count} times, deck holds {copies}")]
    ExhaustedCard { card: u8, count: u32, copies: u32 },
}

/// Failures while building a [`SolverContext`](crate::types::SolverContext).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),
    #[error(transparent)]
    Table(#[from] TableError),
}
