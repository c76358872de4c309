use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::deck::DeckModel;
use crate::error::{RulesError, SetupError, TableError};
use crate::state_index::StateCodec;

/// Game parameters. Defaults are the constants in [`crate::constants`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub max_rounds: u32,
    pub target_score: u32,
    pub max_card: u8,
    /// Cards per round that end it with the bonus. `max_draws - 1` slots are indexed.
    pub max_draws: u8,
    pub draw_limit_bonus: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            target_score: TARGET_SCORE,
            max_card: MAX_CARD,
            max_draws: MAX_DRAWS,
            draw_limit_bonus: DRAW_LIMIT_BONUS,
        }
    }
}

impl GameRules {
    /// NUM_SLOTS: cards remembered by the index. The last permitted draw is never stored.
    #[inline(always)]
    pub fn num_slots(&self) -> usize {
        self.max_draws.saturating_sub(1) as usize
    }

    #[inline(always)]
    pub fn is_final_round(&self, round: u32) -> bool {
        round + 1 == self.max_rounds
    }

    /// Slots per (round, banked_score) bucket: MAX_CARD^NUM_SLOTS.
    pub fn states_per_bucket(&self) -> Option<u64> {
        (self.max_card as u64).checked_pow(self.num_slots() as u32)
    }

    /// MAX_ROUNDS * TARGET_SCORE * MAX_CARD^NUM_SLOTS, or `None` on overflow.
    pub fn checked_total_states(&self) -> Option<u64> {
        (self.max_rounds as u64)
            .checked_mul(self.target_score as u64)?
            .checked_mul(self.states_per_bucket()?)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.max_rounds == 0 {
            return Err(RulesError::NoRounds);
        }
        if self.target_score == 0 {
            return Err(RulesError::NoTarget);
        }
        if !(MIN_CARD..=MAX_CARD_LIMIT).contains(&self.max_card) {
            return Err(RulesError::CardRange {
                got: self.max_card,
                limit: MAX_CARD_LIMIT,
            });
        }
        if self.max_draws == 0 || self.num_slots() > SLOT_CAPACITY {
            return Err(RulesError::DrawRange {
                got: self.max_draws,
                limit: SLOT_CAPACITY + 1,
            });
        }
        let total_cards = DeckModel::new(self.max_card).total_cards();
        if total_cards < self.max_draws as u32 {
            return Err(RulesError::DeckTooSmall {
                total_cards,
                max_draws: self.max_draws,
            });
        }
        if self.checked_total_states().is_none() {
            return Err(RulesError::TooManyStates);
        }
        Ok(())
    }
}

/// Cards drawn so far this round, in draw order.
///
/// Slots past the occupied prefix hold [`EMPTY_SLOT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawnCards {
    slots: [u8; SLOT_CAPACITY],
    len: u8,
}

impl Default for DrawnCards {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl DrawnCards {
    pub const EMPTY: Self = Self {
        slots: [EMPTY_SLOT; SLOT_CAPACITY],
        len: 0,
    };

    /// Build from a draw sequence. Returns `None` if it exceeds [`SLOT_CAPACITY`]
    /// or holds a value outside `[MIN_CARD, MAX_CARD_LIMIT]`.
    pub fn from_cards(cards: &[u8]) -> Option<Self> {
        if cards.len() > SLOT_CAPACITY
            || cards
                .iter()
                .any(|c| !(MIN_CARD..=MAX_CARD_LIMIT).contains(c))
        {
            return None;
        }
        let mut slots = [EMPTY_SLOT; SLOT_CAPACITY];
        slots[..cards.len()].copy_from_slice(cards);
        Some(Self {
            slots,
            len: cards.len() as u8,
        })
    }

    /// Build from raw slots; the length is the prefix before the first empty slot.
    pub fn from_slots(slots: [u8; SLOT_CAPACITY]) -> Self {
        let len = slots.iter().take_while(|&&c| c != EMPTY_SLOT).count() as u8;
        Self { slots, len }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.slots[..self.len as usize]
    }

    #[inline(always)]
    pub fn slot(&self, i: usize) -> u8 {
        self.slots[i]
    }

    pub fn sum(&self) -> u32 {
        self.as_slice().iter().map(|&c| c as u32).sum()
    }

    pub fn count_of(&self, value: u8) -> u32 {
        self.as_slice().iter().filter(|&&c| c == value).count() as u32
    }

    pub fn contains(&self, value: u8) -> bool {
        self.as_slice().contains(&value)
    }

    /// Append one card. The caller guarantees `len() < SLOT_CAPACITY`.
    #[inline]
    pub fn with_card(&self, value: u8) -> Self {
        let mut next = *self;
        next.slots[next.len as usize] = value;
        next.len += 1;
        next
    }
}

impl fmt::Display for DrawnCards {
    /// `(3 2 7)`. Slots after a gap are printed too, with `-` for the gap.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self
            .slots
            .iter()
            .rposition(|&c| c != EMPTY_SLOT)
            .map_or(0, |p| p + 1);
        write!(f, "(")?;
        for (i, &c) in self.slots[..last].iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if c == EMPTY_SLOT {
                write!(f, "-")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, ")")
    }
}

/// A decision point: rounds completed, score banked, cards drawn this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub round: u32,
    pub banked_score: u32,
    pub cards: DrawnCards,
}

impl GameState {
    pub fn new(round: u32, banked_score: u32, cards: DrawnCards) -> Self {
        Self {
            round,
            banked_score,
            cards,
        }
    }

    /// State at the start of a round, nothing drawn yet.
    pub fn round_start(round: u32, banked_score: u32) -> Self {
        Self::new(round, banked_score, DrawnCards::EMPTY)
    }

    #[inline(always)]
    pub fn drawn_count(&self) -> usize {
        self.cards.len()
    }

    /// Same round with `value` appended to the drawn cards.
    #[inline]
    pub fn with_draw(&self, value: u8) -> Self {
        Self::new(self.round, self.banked_score, self.cards.with_card(value))
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "round {}, banked {}, cards {}",
            self.round, self.banked_score, self.cards
        )
    }
}

/// Expected rounds for both choices at one decision point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DecisionValues {
    pub fold: f32,
    pub draw: f32,
    /// min(fold, draw): the value stored in the table.
    pub expected_rounds: f32,
}

impl DecisionValues {
    pub fn new(fold: f32, draw: f32) -> Self {
        Self {
            fold,
            draw,
            expected_rounds: fold.min(draw),
        }
    }

    /// Ties fold.
    #[inline]
    pub fn prefers_fold(&self) -> bool {
        self.fold <= self.draw
    }
}

/// Physical layout of the value table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TableLayout {
    /// One contiguous allocation of every slot up front.
    Dense,
    /// One page per (round, banked_score) bucket, allocated on first write.
    #[default]
    Paged,
}

/// E_table: expected rounds per state index, [`UNSOLVED`] until written.
pub enum ValueTable {
    Dense(Vec<f32>),
    Paged {
        page_len: usize,
        pages: Vec<Option<Box<[f32]>>>,
    },
}

impl ValueTable {
    pub fn new(layout: TableLayout, rules: &GameRules) -> Result<Self, TableError> {
        let total = rules.checked_total_states().unwrap_or(u64::MAX);
        match layout {
            TableLayout::Dense => {
                let slots = usize::try_from(total).map_err(|_| TableError::AddressSpace(total))?;
                let mut values = Vec::new();
                values
                    .try_reserve_exact(slots)
                    .map_err(|source| TableError::Allocation {
                        slots: total,
                        source,
                    })?;
                values.resize(slots, UNSOLVED);
                Ok(ValueTable::Dense(values))
            }
            TableLayout::Paged => {
                let per_bucket = rules.states_per_bucket().unwrap_or(u64::MAX);
                let page_len =
                    usize::try_from(per_bucket).map_err(|_| TableError::AddressSpace(total))?;
                let num_pages = rules.max_rounds as usize * rules.target_score as usize;
                Ok(ValueTable::Paged {
                    page_len,
                    pages: (0..num_pages).map(|_| None).collect(),
                })
            }
        }
    }

    /// Solved value at `index`, or `None` while unsolved.
    #[inline]
    pub fn get(&self, index: u64) -> Option<f32> {
        let v = match self {
            ValueTable::Dense(values) => values[index as usize],
            ValueTable::Paged { page_len, pages } => {
                let i = index as usize;
                match &pages[i / page_len] {
                    Some(page) => page[i % page_len],
                    None => UNSOLVED,
                }
            }
        };
        (v >= 0.0).then_some(v)
    }

    #[inline]
    pub(crate) fn set(&mut self, index: u64, value: f32) {
        match self {
            ValueTable::Dense(values) => values[index as usize] = value,
            ValueTable::Paged { page_len, pages } => {
                let i = index as usize;
                let page_len = *page_len;
                let page = pages[i / page_len].get_or_insert_with(|| {
                    log::debug!("allocating table page {}", i / page_len);
                    vec![UNSOLVED; page_len].into_boxed_slice()
                });
                page[i % page_len] = value;
            }
        }
    }

    /// Logical slot count (TOTAL_STATES).
    pub fn len(&self) -> u64 {
        match self {
            ValueTable::Dense(values) => values.len() as u64,
            ValueTable::Paged { page_len, pages } => (*page_len as u64) * pages.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pages holding memory. Dense tables count as a single page.
    pub fn allocated_pages(&self) -> usize {
        match self {
            ValueTable::Dense(_) => 1,
            ValueTable::Paged { pages, .. } => pages.iter().filter(|p| p.is_some()).count(),
        }
    }

    /// Every solved `(index, value)` pair in index order.
    pub fn solved_entries(&self) -> Box<dyn Iterator<Item = (u64, f32)> + '_> {
        match self {
            ValueTable::Dense(values) => Box::new(
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| **v >= 0.0)
                    .map(|(i, v)| (i as u64, *v)),
            ),
            ValueTable::Paged { page_len, pages } => {
                let page_len = *page_len;
                Box::new(pages.iter().enumerate().flat_map(move |(p, page)| {
                    page.iter().flat_map(move |page| {
                        page.iter()
                            .enumerate()
                            .filter(|(_, v)| **v >= 0.0)
                            .map(move |(i, v)| ((p * page_len + i) as u64, *v))
                    })
                }))
            }
        }
    }

    /// Reset every slot to unsolved.
    pub fn clear(&mut self) {
        match self {
            ValueTable::Dense(values) => values.fill(UNSOLVED),
            ValueTable::Paged { pages, .. } => pages.iter_mut().for_each(|p| *p = None),
        }
    }
}

/// Callback receiving the integer percentage of solved table slots.
pub type ProgressListener = Box<dyn FnMut(u32) + Send + Sync>;

/// Solver context: rules, deck, codec and the memo table with its counters.
pub struct SolverContext {
    pub rules: GameRules,
    pub deck: DeckModel,
    pub codec: StateCodec,
    pub(crate) table: ValueTable,
    pub(crate) solved_states: u64,
    pub(crate) last_pct: u32,
    pub(crate) check_indexing: bool,
    pub(crate) progress: Option<ProgressListener>,
}

impl SolverContext {
    /// Validate `rules` and allocate a table with `layout`.
    pub fn new(rules: GameRules, layout: TableLayout) -> Result<Self, SetupError> {
        rules.validate()?;
        let table = ValueTable::new(layout, &rules)?;
        Ok(Self {
            rules,
            deck: DeckModel::new(rules.max_card),
            codec: StateCodec::new(&rules),
            table,
            solved_states: 0,
            last_pct: 0,
            check_indexing: cfg!(debug_assertions),
            progress: None,
        })
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn total_states(&self) -> u64 {
        self.codec.total_states()
    }

    /// Number of unsolved→solved transitions so far.
    pub fn solved_states(&self) -> u64 {
        self.solved_states
    }

    /// Verify every solved index against its state before solving it.
    pub fn set_check_indexing(&mut self, enabled: bool) {
        self.check_indexing = enabled;
    }

    pub fn set_progress_listener(&mut self, listener: ProgressListener) {
        self.progress = Some(listener);
    }

    /// Memoized value of `state`, if solved.
    #[inline]
    pub fn cached_value(&self, state: &GameState) -> Option<f32> {
        self.table.get(self.codec.encode(state))
    }

    /// Forget every solved value.
    pub fn clear(&mut self) {
        self.table.clear();
        self.solved_states = 0;
        self.last_pct = 0;
    }

    /// Store a freshly solved value. Entries are written once; later writes are ignored.
    pub(crate) fn record_solved(&mut self, index: u64, value: f32) {
        if self.table.get(index).is_some() {
            return;
        }
        self.table.set(index, value);
        self.solved_states += 1;

        let pct = (self.solved_states * 100 / self.total_states().max(1)) as u32;
        if pct != self.last_pct {
            self.last_pct = pct;
            if let Some(listener) = self.progress.as_mut() {
                listener(pct);
            }
        }
    }
}
