//! End-to-end runs of the `flip7-solve` binary over stdin/stdout.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// 2 rounds, target 6, cards 2..=4, 3 cards end a round: 2 * 6 * 4^2 = 192 slots.
const TOY_RULES: [&str; 10] = [
    "--max-rounds",
    "2",
    "--target-score",
    "6",
    "--max-card",
    "4",
    "--max-draws",
    "3",
    "--bonus",
    "1",
];

fn run_solver(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_flip7-solve"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn flip7-solve");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input)
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for flip7-solve")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_malformed_lines_are_skipped() {
    let mut input = Vec::new();
    input.extend_from_slice(b"0 3\n");
    input.extend_from_slice(b"\xff\xfe\n");
    input.extend_from_slice(b"abc\n");
    input.extend_from_slice(b"7\n");
    input.extend_from_slice(b"2 3 4 2\n");
    input.extend_from_slice(b"1 4\n");
    input.extend_from_slice(b"q\n");
    input.extend_from_slice(b"0\n");

    let output = run_solver(&TOY_RULES, &input);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert_eq!(out.matches("Fold expected rounds: ").count(), 2, "{out}");
    assert_eq!(out.matches("Draw expected rounds: ").count(), 2, "{out}");
}

#[test]
fn test_startup_lines_and_progress_stream() {
    let output = run_solver(&TOY_RULES, b"q\n");
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);

    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("Total states: 192"));
    let progress: Vec<u32> = lines
        .next()
        .unwrap()
        .split_whitespace()
        .map(|t| t.parse().unwrap())
        .collect();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] < w[1]), "{progress:?}");
    assert!(progress.iter().all(|&p| p <= 100), "{progress:?}");

    let start = lines.next().unwrap();
    let value: f32 = start
        .strip_prefix("Expected rounds from start state: ")
        .unwrap()
        .parse()
        .unwrap();
    assert!((0.0..=2.0).contains(&value), "{value}");
}

#[test]
fn test_end_of_input_ends_session() {
    let output = run_solver(&TOY_RULES, b"0 3\n");
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert_eq!(out.matches("Fold expected rounds: ").count(), 1, "{out}");
}

#[test]
fn test_json_reports() {
    let mut args = TOY_RULES.to_vec();
    args.push("--json");
    let output = run_solver(&args, b"1 4 2\nq\n");
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    let reports: Vec<serde_json::Value> = out
        .lines()
        .filter_map(|line| line.find('{').map(|i| &line[i..]))
        .map(|json| serde_json::from_str(json).unwrap())
        .collect();
    assert_eq!(reports.len(), 1, "{out}");
    let report = &reports[0];
    assert_eq!(report["banked_score"], 1);
    assert_eq!(report["cards"], serde_json::json!([4, 2]));
    let fold = report["fold"].as_f64().unwrap();
    let draw = report["draw"].as_f64().unwrap();
    assert_eq!(report["expected_rounds"].as_f64().unwrap(), fold.min(draw));
}

#[test]
fn test_invalid_rules_exit_nonzero() {
    let output = run_solver(&["--max-card", "1", "--max-draws", "3"], b"");
    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("Total states"));
}

fn run_simulator(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flip7-simulate"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run flip7-simulate")
}

#[test]
fn test_simulator_json_summary() {
    let mut args = TOY_RULES.to_vec();
    args.extend(["-n", "200", "--seed", "3", "--json"]);
    let output = run_simulator(&args);
    assert_eq!(output.status.code(), Some(0));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["games"], 200);
    let histogram: u64 = summary["rounds_histogram"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_u64().unwrap())
        .sum();
    assert_eq!(histogram, 200);
}

#[test]
fn test_simulator_logs_fatal_setup_errors() {
    let output = run_simulator(&["--max-card", "1", "--max-draws", "3"]);
    assert_eq!(output.status.code(), Some(1));
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("Cannot build solver context"), "{err}");
    assert!(err.contains("invalid rules"), "{err}");
}
