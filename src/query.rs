//! Interactive queries: fold and draw values for a partial first round.
//!
//! A query line is `q` or a banked score followed by the cards drawn so far,
//! whitespace separated, e.g. `120 5 2 11`. Card values 0 and 1 are read as the
//! wild 2.

use crate::constants::*;
use crate::deck::copies;
use crate::error::{QueryError, SolveError};
use crate::types::{DecisionValues, DrawnCards, GameRules, GameState, SolverContext};

/// Token that ends the session.
pub const QUIT_TOKEN: &str = "q";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Query {
    pub banked_score: u32,
    pub cards: DrawnCards,
}

impl Query {
    /// The round-0 decision point this query describes.
    pub fn state(&self) -> GameState {
        GameState::new(0, self.banked_score, self.cards)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryCommand {
    Quit,
    Evaluate(Query),
}

fn parse_int(token: &str) -> Result<i64, QueryError> {
    token
        .parse::<i64>()
        .map_err(|_| QueryError::NotAnInteger(token.to_string()))
}

/// Parse and validate one input line against `rules`.
pub fn parse_query_line(line: &str, rules: &GameRules) -> Result<QueryCommand, QueryError> {
    let line = line.trim();
    if line == QUIT_TOKEN {
        return Ok(QueryCommand::Quit);
    }

    let mut tokens = line.split_whitespace();
    let score = parse_int(tokens.next().ok_or(QueryError::Empty)?)?;
    let mut cards: Vec<i64> = Vec::new();
    for token in tokens {
        let card = parse_int(token)?;
        cards.push(if (0..=WILD_VALUE as i64).contains(&card) {
            WILD_VALUE as i64
        } else {
            card
        });
    }

    if score < 0 || score >= rules.target_score as i64 {
        return Err(QueryError::ScoreOutOfRange {
            score,
            target: rules.target_score,
        });
    }
    if cards.len() > rules.num_slots() {
        return Err(QueryError::TooManyCards {
            count: cards.len(),
            slots: rules.num_slots(),
        });
    }
    if let Some(&card) = cards
        .iter()
        .find(|&&c| c < MIN_CARD as i64 || c > rules.max_card as i64)
    {
        return Err(QueryError::CardOutOfRange {
            card,
            max_card: rules.max_card,
        });
    }

    let values: Vec<u8> = cards.iter().map(|&c| c as u8).collect();
    let cards = DrawnCards::from_cards(&values).ok_or(QueryError::TooManyCards {
        count: values.len(),
        slots: rules.num_slots(),
    })?;
    for &card in cards.as_slice() {
        let count = cards.count_of(card);
        if count > copies(card) {
            return Err(QueryError::ExhaustedCard {
                card,
                count,
                copies: copies(card),
            });
        }
    }

    Ok(QueryCommand::Evaluate(Query {
        banked_score: score as u32,
        cards,
    }))
}

/// Fold/draw values at the query's decision point.
pub fn evaluate_query(ctx: &mut SolverContext, query: &Query) -> Result<DecisionValues, SolveError> {
    ctx.evaluate_state(&query.state())
}
