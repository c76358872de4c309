//! Round rules: busts, folds and the draw-limit stop.
//!
//! Shared by the value solver and the policy simulation so both account for a
//! round's end the same way:
//! - reaching the target during round `r` costs `r` (rounds fully consumed before it)
//! - failing to reach it by the final round costs `MAX_ROUNDS`

use crate::constants::*;
use crate::types::{GameRules, GameState};

/// How a round ends once its score is settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// Target reached this round.
    Reached { score: u32 },
    /// Final round over without reaching the target.
    Failed,
    /// Play continues at the start of the next round.
    Next(GameState),
}

/// What drawing `value` leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Non-wild value already drawn this round: the round score is lost.
    Bust,
    /// Safe draw that fills the last permitted slot; the round ends with the bonus.
    DrawLimit { final_score: u32 },
    /// Safe draw, the round continues with the card appended.
    Continue(GameState),
}

#[inline(always)]
pub fn is_bust(state: &GameState, value: u8) -> bool {
    value != WILD_VALUE && state.cards.contains(value)
}

/// Banked score plus every card drawn this round.
#[inline]
pub fn round_score(state: &GameState) -> u32 {
    state.banked_score + state.cards.sum()
}

/// Settle a round that ends with `score` banked.
#[inline]
pub fn end_round(rules: &GameRules, round: u32, score: u32) -> RoundEnd {
    if score >= rules.target_score {
        RoundEnd::Reached { score }
    } else if rules.is_final_round(round) {
        RoundEnd::Failed
    } else {
        RoundEnd::Next(GameState::round_start(round + 1, score))
    }
}

/// Folding in the final round always fails, even with the target covered by
/// the cards in hand.
#[inline]
pub fn fold_outcome(rules: &GameRules, state: &GameState) -> RoundEnd {
    if rules.is_final_round(state.round) {
        RoundEnd::Failed
    } else {
        end_round(rules, state.round, round_score(state))
    }
}

/// A bust keeps only the score banked before this round.
#[inline]
pub fn bust_outcome(rules: &GameRules, state: &GameState) -> RoundEnd {
    end_round(rules, state.round, state.banked_score)
}

pub fn classify_draw(rules: &GameRules, state: &GameState, value: u8) -> DrawOutcome {
    if is_bust(state, value) {
        DrawOutcome::Bust
    } else if state.drawn_count() == rules.num_slots() {
        DrawOutcome::DrawLimit {
            final_score: round_score(state) + value as u32 + rules.draw_limit_bonus,
        }
    } else {
        DrawOutcome::Continue(state.with_draw(value))
    }
}

/// Cost in rounds of a settled round end that does not continue play.
#[inline]
pub fn terminal_cost(rules: &GameRules, round: u32, end: &RoundEnd) -> Option<f32> {
    match end {
        RoundEnd::Reached { .. } => Some(round as f32),
        RoundEnd::Failed => Some(rules.max_rounds as f32),
        RoundEnd::Next(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrawnCards;

    fn hand(round: u32, banked: u32, cards: &[u8]) -> GameState {
        GameState::new(round, banked, DrawnCards::from_cards(cards).unwrap())
    }

    #[test]
    fn test_bust_rule() {
        let state = hand(0, 0, &[5, 2]);
        assert!(is_bust(&state, 5));
        assert!(!is_bust(&state, 2));
        assert!(!is_bust(&state, 6));
        assert_eq!(
            classify_draw(&GameRules::default(), &state, 5),
            DrawOutcome::Bust
        );
    }

    #[test]
    fn test_draw_limit_adds_bonus() {
        let rules = GameRules::default();
        let state = hand(3, 100, &[2, 3, 4, 5, 6, 7]);
        assert_eq!(
            classify_draw(&rules, &state, 2),
            DrawOutcome::DrawLimit {
                final_score: 100 + 27 + 2 + 15
            }
        );
        assert_eq!(
            classify_draw(&rules, &hand(3, 100, &[2, 3]), 9),
            DrawOutcome::Continue(hand(3, 100, &[2, 3, 9]))
        );
    }

    #[test]
    fn test_fold_outcomes() {
        let rules = GameRules::default();
        assert_eq!(
            fold_outcome(&rules, &hand(2, 190, &[12])),
            RoundEnd::Reached { score: 202 }
        );
        assert_eq!(
            fold_outcome(&rules, &hand(2, 50, &[12])),
            RoundEnd::Next(GameState::round_start(3, 62))
        );
        // Final round fold fails even when the cards would cover the target.
        assert_eq!(fold_outcome(&rules, &hand(9, 190, &[12])), RoundEnd::Failed);
    }

    #[test]
    fn test_bust_outcomes() {
        let rules = GameRules::default();
        assert_eq!(
            bust_outcome(&rules, &hand(4, 80, &[7, 9])),
            RoundEnd::Next(GameState::round_start(5, 80))
        );
        assert_eq!(bust_outcome(&rules, &hand(9, 80, &[7])), RoundEnd::Failed);
    }

    #[test]
    fn test_terminal_costs() {
        let rules = GameRules::default();
        assert_eq!(
            terminal_cost(&rules, 4, &RoundEnd::Reached { score: 200 }),
            Some(4.0)
        );
        assert_eq!(terminal_cost(&rules, 4, &RoundEnd::Failed), Some(10.0));
        assert_eq!(
            terminal_cost(&rules, 4, &RoundEnd::Next(GameState::round_start(5, 0))),
            None
        );
    }
}
