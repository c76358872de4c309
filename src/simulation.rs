//! Game simulation: plays N games with the solved fold/draw policy.
//!
//! Each decision compares FOLD and DRAW from the precomputed table (ties fold),
//! draws come from the round-local deck without replacement, and each game is
//! charged exactly as the solver charges it. The mean cost therefore converges
//! to E(start).

use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::deck::DeckModel;
use crate::error::SolveError;
use crate::game_mechanics::{
    bust_outcome, classify_draw, end_round, fold_outcome, terminal_cost, DrawOutcome, RoundEnd,
};
use crate::types::{DrawnCards, GameState, SolverContext};

/// Result of one simulated game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    /// Rounds charged: the round the target was reached in, or `MAX_ROUNDS`.
    pub rounds: u32,
    pub reached_target: bool,
    pub busts: u32,
    pub cards_drawn: u32,
}

/// Aggregate statistics of a batch.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationSummary {
    pub games: usize,
    pub mean_rounds: f64,
    pub std_dev: f64,
    pub successes: usize,
    pub mean_busts: f64,
    pub mean_cards_drawn: f64,
    /// `rounds_histogram[r]` = games charged `r` rounds, for `r` in `0..=MAX_ROUNDS`.
    pub rounds_histogram: Vec<u64>,
    pub elapsed_secs: f64,
}

/// Draw one card from the deck left after `drawn`.
fn draw_card(deck: &DeckModel, drawn: &DrawnCards, rng: &mut SmallRng) -> u8 {
    let remaining = deck.remaining_cards(drawn.len());
    let mut pick = rng.random_range(0..remaining);
    for value in deck.values() {
        let weight = deck.draw_weight(value, drawn.count_of(value));
        if pick < weight {
            return value;
        }
        pick -= weight;
    }
    deck.max_card()
}

/// Play one game from the start state.
pub fn simulate_game(ctx: &SolverContext, rng: &mut SmallRng) -> Result<GameOutcome, SolveError> {
    let rules = &ctx.rules;
    let mut state = GameState::round_start(0, 0);
    let mut busts = 0;
    let mut cards_drawn = 0;

    loop {
        let decision = ctx.decision_values(&state)?;
        let end = if decision.prefers_fold() {
            fold_outcome(rules, &state)
        } else {
            let value = draw_card(&ctx.deck, &state.cards, rng);
            cards_drawn += 1;
            match classify_draw(rules, &state, value) {
                DrawOutcome::Bust => {
                    busts += 1;
                    bust_outcome(rules, &state)
                }
                DrawOutcome::DrawLimit { final_score } => {
                    end_round(rules, state.round, final_score)
                }
                DrawOutcome::Continue(next) => {
                    state = next;
                    continue;
                }
            }
        };

        match end {
            RoundEnd::Next(next) => state = next,
            settled => {
                let cost = terminal_cost(rules, state.round, &settled)
                    .unwrap_or(rules.max_rounds as f32);
                return Ok(GameOutcome {
                    rounds: cost as u32,
                    reached_target: matches!(settled, RoundEnd::Reached { .. }),
                    busts,
                    cards_drawn,
                });
            }
        }
    }
}

/// Simulate `num_games` games in parallel, game `i` seeded with `seed + i`.
pub fn simulate_batch(
    ctx: &SolverContext,
    num_games: usize,
    seed: u64,
) -> Result<SimulationSummary, SolveError> {
    let start = Instant::now();

    let outcomes: Vec<GameOutcome> = (0..num_games)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            simulate_game(ctx, &mut rng)
        })
        .collect::<Result<Vec<_>, SolveError>>()?;

    let n = num_games.max(1) as f64;
    let mean = outcomes.iter().map(|o| o.rounds as f64).sum::<f64>() / n;
    let variance = outcomes
        .iter()
        .map(|o| (o.rounds as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let mut rounds_histogram = vec![0u64; ctx.rules.max_rounds as usize + 1];
    for outcome in &outcomes {
        rounds_histogram[outcome.rounds as usize] += 1;
    }

    Ok(SimulationSummary {
        games: num_games,
        mean_rounds: mean,
        std_dev: variance.sqrt(),
        successes: outcomes.iter().filter(|o| o.reached_target).count(),
        mean_busts: outcomes.iter().map(|o| o.busts as f64).sum::<f64>() / n,
        mean_cards_drawn: outcomes.iter().map(|o| o.cards_drawn as f64).sum::<f64>() / n,
        rounds_histogram,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}
