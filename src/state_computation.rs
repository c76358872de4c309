//! Table precompute: solve every first-round start state.
//!
//! The recursion only moves forward in round and drawn count, so solving
//! `(0, s, empty)` for every banked score `s` transitively fills every state
//! reachable from any of them. Start with `s = 0`, the actual game start.

use std::time::Instant;

use crate::error::SolveError;
use crate::types::{GameState, SolverContext};

/// Solve the start state and every first-round state, returning E(start).
pub fn compute_all_state_values(ctx: &mut SolverContext) -> Result<f32, SolveError> {
    let start_time = Instant::now();
    log::info!(
        "Solving {} first-round states ({} table slots)",
        ctx.rules.target_score,
        ctx.total_states()
    );

    let start_value = ctx.value_of(&GameState::round_start(0, 0))?;
    log::info!(
        "Start state solved: {:.6} expected rounds ({} states, {:.2}s)",
        start_value,
        ctx.solved_states(),
        start_time.elapsed().as_secs_f64()
    );

    for score in 1..ctx.rules.target_score {
        ctx.value_of(&GameState::round_start(0, score))?;
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    log::info!(
        "Solved {} of {} slots ({} table pages) in {:.2}s ({:.0} states/s)",
        ctx.solved_states(),
        ctx.total_states(),
        ctx.table().allocated_pages(),
        elapsed,
        ctx.solved_states() as f64 / elapsed.max(1e-9)
    );
    Ok(start_value)
}
