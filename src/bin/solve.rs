use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use flip7::config::{init_logging, init_rayon_threads, RulesArgs, TableArgs};
use flip7::error::SolveError;
use flip7::query::{evaluate_query, parse_query_line, QueryCommand};
use flip7::state_computation::compute_all_state_values;
use flip7::state_index::{verify_state_indexing, IndexSweep, StateCodec};
use flip7::types::{DecisionValues, SolverContext};

#[derive(Parser, Debug)]
#[command(
    name = "flip7-solve",
    version,
    about = "Solve Flip 7 expected rounds-to-target and answer fold/draw queries"
)]
struct Cli {
    #[command(flatten)]
    rules: RulesArgs,
    #[command(flatten)]
    table: TableArgs,
    /// Check every state index at startup (parallel, slow for the full game)
    #[arg(long)]
    verify_indexing: bool,
    /// Print query results as JSON objects
    #[arg(long)]
    json: bool,
    /// Exit after precomputation without reading queries
    #[arg(long)]
    no_queries: bool,
}

#[derive(Serialize)]
struct QueryReport<'a> {
    banked_score: u32,
    cards: &'a [u8],
    #[serde(flatten)]
    values: DecisionValues,
}

fn prompt() {
    print!("\nEnter score and cards (or 'q' to quit): ");
    let _ = io::stdout().flush();
}

/// Read queries until `q` or end of input. Malformed lines, including bytes
/// that are not UTF-8, are skipped and the prompt repeats.
fn run_query_loop(ctx: &mut SolverContext, json: bool) -> Result<(), SolveError> {
    let rules = ctx.rules;
    let mut input = io::stdin().lock();
    let mut buf = Vec::new();
    loop {
        prompt();
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                log::warn!("Cannot read query input: {}", e);
                break;
            }
        }
        let line = String::from_utf8_lossy(&buf);
        match parse_query_line(&line, &rules) {
            Ok(QueryCommand::Quit) => break,
            Ok(QueryCommand::Evaluate(query)) => {
                let values = evaluate_query(ctx, &query)?;
                if json {
                    let report = QueryReport {
                        banked_score: query.banked_score,
                        cards: query.cards.as_slice(),
                        values,
                    };
                    match serde_json::to_string(&report) {
                        Ok(s) => println!("{}", s),
                        Err(e) => log::warn!("Cannot serialize query result: {}", e),
                    }
                } else {
                    println!("Fold expected rounds: {}", values.fold);
                    println!("Draw expected rounds: {}", values.draw);
                }
            }
            Err(e) => log::debug!("Ignoring query {:?}: {}", line.trim_end(), e),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let rules = cli.rules.rules();
    if let Err(e) = rules.validate() {
        log::error!("Invalid rules {:?}", rules);
        eprintln!("Invalid rules: {}", e);
        return ExitCode::FAILURE;
    }

    let codec = StateCodec::new(&rules);
    println!("Total states: {}", codec.total_states());

    let sweep = if cli.verify_indexing {
        init_rayon_threads();
        IndexSweep::Full
    } else {
        IndexSweep::Boundary
    };
    match verify_state_indexing(&codec, &rules, sweep) {
        Ok(checked) => log::info!("Index self-check passed ({} indices)", checked),
        Err(e) => {
            log::error!("Index self-check failed");
            eprintln!("Error in index conversion:\n{}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut ctx = match SolverContext::new(rules, cli.table.table) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("Cannot build solver context");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    ctx.set_check_indexing(cli.table.check_indexing || cfg!(debug_assertions));
    ctx.set_progress_listener(Box::new(|pct| {
        print!("{} ", pct);
        let _ = io::stdout().flush();
    }));

    let start_value = match compute_all_state_values(&mut ctx) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Precomputation failed");
            eprintln!("Error in index conversion for start state:\n{}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("\nExpected rounds from start state: {}", start_value);

    if !cli.no_queries {
        if let Err(e) = run_query_loop(&mut ctx, cli.json) {
            log::error!("Query evaluation failed");
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
