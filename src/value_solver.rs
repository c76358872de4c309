//! Memoized backward induction over (round, banked_score, drawn cards).
//!
//! E(S) = min(FOLD(S), DRAW(S)) where
//!
//! - FOLD(S) banks the round: `MAX_ROUNDS` in the final round, `round` once the
//!   target is covered, otherwise E(next round start).
//! - DRAW(S) = Σ_v P(v | S) · cost(v): a bust restarts the next round with the
//!   old bank, the draw that fills the last slot ends the round with the bonus,
//!   any other safe draw continues within the round.
//!
//! Every child either has a higher round or the same round with one more card,
//! so the recursion runs over a finite DAG of depth at most
//! `MAX_ROUNDS * (NUM_SLOTS + 1)` and each state is solved once.

use crate::deck::DeckModel;
use crate::error::SolveError;
use crate::game_mechanics::{
    bust_outcome, classify_draw, end_round, fold_outcome, terminal_cost, DrawOutcome, RoundEnd,
};
use crate::types::{DecisionValues, GameRules, GameState, SolverContext};

impl SolverContext {
    /// E(state), solving it first if it is not in the table.
    pub fn value_of(&mut self, state: &GameState) -> Result<f32, SolveError> {
        let index = self.codec.encode(state);
        match self.table.get(index) {
            Some(value) => Ok(value),
            None => Ok(self.solve(index, state)?.expected_rounds),
        }
    }

    /// Fold/draw breakdown at `state`, reusing solved children.
    pub fn evaluate_state(&mut self, state: &GameState) -> Result<DecisionValues, SolveError> {
        let index = self.codec.encode(state);
        self.solve(index, state)
    }

    /// Compute both branches at `state` and record min(fold, draw) under `index`.
    ///
    /// Always recomputes the breakdown; a state that is already solved keeps its
    /// stored value.
    pub fn solve(&mut self, index: u64, state: &GameState) -> Result<DecisionValues, SolveError> {
        if self.check_indexing {
            self.codec.verify(index, state)?;
        }
        let rules = self.rules;
        let deck = self.deck;
        let values = branch_values(&rules, &deck, state, |child| self.value_of(child))?;
        self.record_solved(index, values.expected_rounds);
        Ok(values)
    }

    /// Read-only breakdown at `state`. Fails if any reachable child is unsolved.
    pub fn decision_values(&self, state: &GameState) -> Result<DecisionValues, SolveError> {
        branch_values(&self.rules, &self.deck, state, |child| {
            let index = self.codec.encode(child);
            self.table.get(index).ok_or(SolveError::Unsolved { index })
        })
    }
}

#[inline]
fn round_end_cost<F>(
    rules: &GameRules,
    round: u32,
    end: RoundEnd,
    child: &mut F,
) -> Result<f32, SolveError>
where
    F: FnMut(&GameState) -> Result<f32, SolveError>,
{
    match end {
        RoundEnd::Next(next) => child(&next),
        settled => Ok(terminal_cost(rules, round, &settled).unwrap_or(rules.max_rounds as f32)),
    }
}

/// FOLD(S) and DRAW(S) with child values supplied by `child`.
///
/// Values with no copies left are skipped, so states holding more wilds than
/// the deck has are never visited. Contributions are summed in ascending card
/// order.
fn branch_values<F>(
    rules: &GameRules,
    deck: &DeckModel,
    state: &GameState,
    mut child: F,
) -> Result<DecisionValues, SolveError>
where
    F: FnMut(&GameState) -> Result<f32, SolveError>,
{
    let fold = round_end_cost(rules, state.round, fold_outcome(rules, state), &mut child)?;

    let remaining = deck.remaining_cards(state.drawn_count()) as f32;
    let mut draw = 0.0f32;
    for value in deck.values() {
        let weight = deck.draw_weight(value, state.cards.count_of(value));
        if weight == 0 {
            continue;
        }
        let probability = weight as f32 / remaining;
        let cost = match classify_draw(rules, state, value) {
            DrawOutcome::Bust => {
                round_end_cost(rules, state.round, bust_outcome(rules, state), &mut child)?
            }
            DrawOutcome::DrawLimit { final_score } => round_end_cost(
                rules,
                state.round,
                end_round(rules, state.round, final_score),
                &mut child,
            )?,
            DrawOutcome::Continue(next) => child(&next)?,
        };
        draw += probability * cost;
    }

    Ok(DecisionValues::new(fold, draw))
}
