//! Deck model: weighted draws without replacement from a round-local deck.
//!
//! The deck holds [`WILD_COPIES`] copies of the wild value and `v` copies of
//! every other value `v`. The whole deck is reshuffled at the start of each
//! round, so only the cards drawn this round are missing from it.
//!
//! P(draw v | drawn) = (copies(v) - count(v in drawn)) / (TOTAL_CARDS - |drawn|)

use std::ops::RangeInclusive;

use crate::constants::*;
use crate::types::DrawnCards;

/// Copies of `value` in a full deck.
#[inline(always)]
pub fn copies(value: u8) -> u32 {
    if value == WILD_VALUE {
        WILD_COPIES
    } else {
        value as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeckModel {
    max_card: u8,
    total_cards: u32,
}

impl DeckModel {
    pub fn new(max_card: u8) -> Self {
        let total_cards = (MIN_CARD..=max_card).map(copies).sum();
        Self {
            max_card,
            total_cards,
        }
    }

    #[inline(always)]
    pub fn max_card(&self) -> u8 {
        self.max_card
    }

    /// TOTAL_CARDS: size of the full deck.
    #[inline(always)]
    pub fn total_cards(&self) -> u32 {
        self.total_cards
    }

    /// Every drawable value in ascending order.
    #[inline(always)]
    pub fn values(&self) -> RangeInclusive<u8> {
        MIN_CARD..=self.max_card
    }

    /// Cards left after `drawn_count` draws this round.
    #[inline(always)]
    pub fn remaining_cards(&self, drawn_count: usize) -> u32 {
        self.total_cards.saturating_sub(drawn_count as u32)
    }

    /// Copies of `value` still in the deck after drawing it `already_drawn` times.
    #[inline(always)]
    pub fn draw_weight(&self, value: u8, already_drawn: u32) -> u32 {
        copies(value).saturating_sub(already_drawn)
    }

    /// Probability that the next card is `value`.
    #[inline]
    pub fn draw_probability(&self, value: u8, drawn: &DrawnCards) -> f32 {
        let weight = self.draw_weight(value, drawn.count_of(value));
        weight as f32 / self.remaining_cards(drawn.len()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probability_sum(deck: &DeckModel, drawn: &DrawnCards) -> f32 {
        deck.values().map(|v| deck.draw_probability(v, drawn)).sum()
    }

    #[test]
    fn test_default_deck_size() {
        let deck = DeckModel::new(MAX_CARD);
        assert_eq!(copies(2), 3);
        assert_eq!(copies(3), 3);
        assert_eq!(copies(12), 12);
        assert_eq!(deck.total_cards(), 78);
    }

    #[test]
    fn test_fresh_deck_probabilities() {
        let deck = DeckModel::new(MAX_CARD);
        let p12 = deck.draw_probability(12, &DrawnCards::EMPTY);
        assert!((p12 - 12.0 / 78.0).abs() < 1e-7);
        let p2 = deck.draw_probability(2, &DrawnCards::EMPTY);
        assert!((p2 - 3.0 / 78.0).abs() < 1e-7);
        assert!((probability_sum(&deck, &DrawnCards::EMPTY) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_denominator_shrinks_by_cards_drawn() {
        let deck = DeckModel::new(MAX_CARD);
        let drawn = DrawnCards::from_cards(&[12, 2]).unwrap();
        // 11 twelves and 2 wilds left out of 76 cards.
        assert!((deck.draw_probability(12, &drawn) - 11.0 / 76.0).abs() < 1e-7);
        assert!((deck.draw_probability(2, &drawn) - 2.0 / 76.0).abs() < 1e-7);
        assert!((deck.draw_probability(7, &drawn) - 7.0 / 76.0).abs() < 1e-7);
        assert!((probability_sum(&deck, &drawn) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_exhausted_wild_has_zero_weight() {
        let deck = DeckModel::new(MAX_CARD);
        let drawn = DrawnCards::from_cards(&[2, 2, 2]).unwrap();
        assert_eq!(deck.draw_weight(2, 3), 0);
        assert_eq!(deck.draw_weight(2, 4), 0);
        assert_eq!(deck.draw_probability(2, &drawn), 0.0);
        assert!((probability_sum(&deck, &drawn) - 1.0).abs() < 1e-5);
    }
}
