//! Property-based tests for the state codec and the deck model.

use proptest::prelude::*;

use flip7::constants::*;
use flip7::deck::DeckModel;
use flip7::state_index::StateCodec;
use flip7::types::{DrawnCards, GameRules, GameState};

/// Strategy: any state of the full game the codec must round-trip.
fn state_strategy() -> impl Strategy<Value = GameState> {
    (
        0..MAX_ROUNDS,
        0..TARGET_SCORE,
        prop::collection::vec(MIN_CARD..=MAX_CARD, 0..=(MAX_DRAWS as usize - 1)),
    )
        .prop_map(|(round, score, cards)| {
            GameState::new(round, score, DrawnCards::from_cards(&cards).unwrap())
        })
}

/// Strategy: a pre-draw hand the deck can actually produce (distinct non-wild
/// values, at most three wilds), at most NUM_SLOTS cards.
fn legal_hand_strategy() -> impl Strategy<Value = DrawnCards> {
    let values: Vec<u8> = (3..=MAX_CARD).collect();
    (
        prop::sample::subsequence(values, 0..=(MAX_DRAWS as usize - 1)),
        0..=WILD_COPIES as usize,
    )
        .prop_map(|(distinct, wilds)| {
            let mut cards = vec![WILD_VALUE; wilds];
            cards.extend(distinct);
            cards.truncate(MAX_DRAWS as usize - 1);
            DrawnCards::from_cards(&cards).unwrap()
        })
}

proptest! {
    // 1. decode(encode(s)) == s for every valid state
    #[test]
    fn decode_inverts_encode(state in state_strategy()) {
        let codec = StateCodec::new(&GameRules::default());
        let index = codec.encode(&state);
        prop_assert!(index < codec.total_states());
        prop_assert_eq!(codec.decode(index), state);
    }

    // 2. encode(decode(i)) == i for every index
    #[test]
    fn encode_inverts_decode(index in 0..(10u64 * 200 * 12u64.pow(6))) {
        let codec = StateCodec::new(&GameRules::default());
        prop_assert_eq!(codec.encode(&codec.decode(index)), index);
    }

    // 3. Distinct states get distinct indices
    #[test]
    fn encode_is_injective(a in state_strategy(), b in state_strategy()) {
        let codec = StateCodec::new(&GameRules::default());
        if a != b {
            prop_assert_ne!(codec.encode(&a), codec.encode(&b));
        }
    }

    // 4. Draw probabilities of a legal hand sum to 1
    #[test]
    fn probabilities_close(hand in legal_hand_strategy()) {
        let deck = DeckModel::new(MAX_CARD);
        let total: f32 = deck.values().map(|v| deck.draw_probability(v, &hand)).sum();
        prop_assert!((total - 1.0).abs() < 1e-5, "sum={total} hand={hand}");
    }

    // 5. Every probability is a proper probability
    #[test]
    fn probabilities_in_unit_interval(hand in legal_hand_strategy(), value in MIN_CARD..=MAX_CARD) {
        let deck = DeckModel::new(MAX_CARD);
        let p = deck.draw_probability(value, &hand);
        prop_assert!((0.0..=1.0).contains(&p), "p={p}");
    }

    // 6. Appending a card keeps the round and bank, grows the hand by one
    #[test]
    fn with_draw_appends(state in state_strategy(), value in MIN_CARD..=MAX_CARD) {
        prop_assume!(state.drawn_count() < MAX_DRAWS as usize - 1);
        let next = state.with_draw(value);
        prop_assert_eq!(next.round, state.round);
        prop_assert_eq!(next.banked_score, state.banked_score);
        prop_assert_eq!(next.drawn_count(), state.drawn_count() + 1);
        prop_assert_eq!(next.cards.sum(), state.cards.sum() + value as u32);
    }
}
