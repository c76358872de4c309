//! Shared command-line and environment configuration for the binaries.
//!
//! Every rule parameter can be given as a flag or through its `FLIP7_*`
//! environment variable; defaults are the constants of the full game.
//! `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`) sizes the rayon pool.

use clap::Args;

use crate::constants::*;
use crate::types::{GameRules, TableLayout};

/// Game rule flags.
#[derive(Args, Debug, Clone)]
pub struct RulesArgs {
    /// Rounds available before the game counts as failed
    #[arg(long, env = "FLIP7_MAX_ROUNDS", default_value_t = MAX_ROUNDS)]
    pub max_rounds: u32,
    /// Cumulative score that ends the game
    #[arg(long, env = "FLIP7_TARGET_SCORE", default_value_t = TARGET_SCORE)]
    pub target_score: u32,
    /// Highest card value in the deck
    #[arg(long, env = "FLIP7_MAX_CARD", default_value_t = MAX_CARD)]
    pub max_card: u8,
    /// Cards per round that end it with the bonus
    #[arg(long, env = "FLIP7_MAX_DRAWS", default_value_t = MAX_DRAWS)]
    pub max_draws: u8,
    /// Bonus for drawing max-draws cards without busting
    #[arg(long, env = "FLIP7_BONUS", default_value_t = DRAW_LIMIT_BONUS)]
    pub bonus: u32,
}

impl RulesArgs {
    pub fn rules(&self) -> GameRules {
        GameRules {
            max_rounds: self.max_rounds,
            target_score: self.target_score,
            max_card: self.max_card,
            max_draws: self.max_draws,
            draw_limit_bonus: self.bonus,
        }
    }
}

/// Value table flags.
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Table layout: dense allocates every slot up front
    #[arg(long, value_enum, env = "FLIP7_TABLE", default_value_t = TableLayout::Paged)]
    pub table: TableLayout,
    /// Verify each state index against its state while solving
    #[arg(long, env = "FLIP7_CHECK_INDEXING")]
    pub check_indexing: bool,
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default: rayon's choice)
/// and build the global pool. Returns the resulting thread count.
pub fn init_rayon_threads() -> usize {
    let requested = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse::<usize>().ok());
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = requested {
        builder = builder.num_threads(n);
    }
    if let Err(e) = builder.build_global() {
        log::warn!("Rayon pool already initialised: {}", e);
    }
    let threads = rayon::current_num_threads();
    log::info!("Rayon threads: {}", threads);
    threads
}

/// Install the stderr logger at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        rules: RulesArgs,
        #[command(flatten)]
        table: TableArgs,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--max-rounds",
            "3",
            "--target-score",
            "40",
            "--bonus",
            "0",
            "--table",
            "dense",
        ]);
        let rules = cli.rules.rules();
        assert_eq!(rules.max_rounds, 3);
        assert_eq!(rules.target_score, 40);
        assert_eq!(rules.max_card, MAX_CARD);
        assert_eq!(rules.max_draws, MAX_DRAWS);
        assert_eq!(rules.draw_limit_bonus, 0);
        assert_eq!(cli.table.table, TableLayout::Dense);
    }
}
