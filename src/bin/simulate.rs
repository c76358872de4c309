use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use flip7::config::{init_logging, init_rayon_threads, RulesArgs, TableArgs};
use flip7::simulation::simulate_batch;
use flip7::state_computation::compute_all_state_values;
use flip7::types::SolverContext;

#[derive(Parser, Debug)]
#[command(
    name = "flip7-simulate",
    version,
    about = "Play Flip 7 games with the optimal policy and report the rounds distribution"
)]
struct Cli {
    #[command(flatten)]
    rules: RulesArgs,
    #[command(flatten)]
    table: TableArgs,
    /// Number of games to simulate
    #[arg(short = 'n', long, default_value_t = 100_000)]
    games: usize,
    /// Base seed; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    init_rayon_threads();

    let mut ctx = match SolverContext::new(cli.rules.rules(), cli.table.table) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Cannot build solver context for {:?}", cli.rules.rules());
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    ctx.set_check_indexing(cli.table.check_indexing);

    let solve_start = Instant::now();
    let start_value = match compute_all_state_values(&mut ctx) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Precomputation failed");
            eprintln!("Precomputation failed:\n{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Precomputation took {:.2}s",
        solve_start.elapsed().as_secs_f64()
    );

    let summary = match simulate_batch(&ctx, cli.games, cli.seed) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("Simulation failed");
            eprintln!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                log::error!("Cannot serialize summary");
                eprintln!("Cannot serialize summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("Expected rounds from start state: {:.6}", start_value);
    println!(
        "Simulated {} games in {:.2}s (seed {})",
        summary.games, summary.elapsed_secs, cli.seed
    );
    println!(
        "Mean rounds: {:.6} (std dev {:.4})",
        summary.mean_rounds, summary.std_dev
    );
    println!(
        "Reached target: {} ({:.2}%)",
        summary.successes,
        summary.successes as f64 / summary.games.max(1) as f64 * 100.0
    );
    println!(
        "Per game: {:.3} busts, {:.2} cards drawn",
        summary.mean_busts, summary.mean_cards_drawn
    );
    println!("\nRounds | Games");
    println!("-------|--------");
    for (rounds, &count) in summary.rounds_histogram.iter().enumerate() {
        if count > 0 {
            println!("  {:4} | {:7}", rounds, count);
        }
    }
    ExitCode::SUCCESS
}
