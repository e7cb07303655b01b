//! Integration tests for the warband binary.
//!
//! Spawns the binary with different flags and roster files and checks the
//! JSONL battle records it writes to stdout.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use warband::battle::{BattleRecord, Outcome};

/// Runs the binary with the given arguments and returns its output.
fn run_warband(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_warband");
    Command::new(exe)
        .args(args)
        .env("RUST_LOG", "error")
        .stdin(Stdio::null())
        .output()
        .expect("failed to start warband")
}

fn parse_records(output: &Output) -> Vec<BattleRecord> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be a battle record"))
        .collect()
}

/// Writes `contents` to a uniquely named file in the temp directory.
fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("warband-{}-{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn default_run_writes_one_record() {
    let output = run_warband(&["--seed", "42", "--quiet"]);
    assert!(output.status.success());
    let records = parse_records(&output);
    assert_eq!(records.len(), 1);
    assert!(records[0].rounds <= 100);
}

#[test]
fn batch_respects_battle_count_and_cap() {
    let output = run_warband(&["-n", "5", "--rounds", "20", "--seed", "7", "--threads", "2", "-q"]);
    assert!(output.status.success());
    let records = parse_records(&output);
    assert_eq!(records.len(), 5);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.battle_id, i);
        assert!(record.rounds <= 20);
        if record.outcome == Outcome::Draw {
            assert_eq!(record.rounds, 20);
        }
    }
}

#[test]
fn same_seed_same_output() {
    let args = ["-n", "3", "--seed", "99", "--scoring", "sampled", "-q"];
    let first = run_warband(&args);
    let second = run_warband(&args);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn roster_files_are_loaded() {
    let attacker = temp_file(
        "attacker.json",
        r#"{ "units": [ { "archetype": "lord", "position": 0 } ] }"#,
    );
    let defender = temp_file(
        "defender.json",
        r#"{ "units": [ { "archetype": "levy", "amount": 1, "position": 0 } ] }"#,
    );
    let output = run_warband(&[
        "--attacker",
        attacker.to_str().unwrap(),
        "--defender",
        defender.to_str().unwrap(),
        "--seed",
        "3",
        "-q",
    ]);
    assert!(output.status.success());
    let records = parse_records(&output);
    assert_eq!(records.len(), 1);
    assert!(records[0].attacker_models <= 1);
    assert!(records[0].defender_models <= 1);
}

#[test]
fn bad_roster_fails_with_message() {
    let roster = temp_file(
        "bad.json",
        r#"{ "units": [ { "archetype": "dragon" } ] }"#,
    );
    let output = run_warband(&["--attacker", roster.to_str().unwrap(), "-q"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown unit type"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn config_file_sets_defaults() {
    let config = temp_file(
        "config.json",
        r#"{ "num_battles": 2, "max_rounds": 5, "seed": 11 }"#,
    );
    let output = run_warband(&["--config", config.to_str().unwrap(), "-q"]);
    assert!(output.status.success());
    let records = parse_records(&output);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.rounds <= 5));
}

#[test]
fn unknown_scoring_is_rejected() {
    let output = run_warband(&["--scoring", "psychic"]);
    assert!(!output.status.success());
}

#[test]
fn attacker_roster_cannot_be_a_defender() {
    let roster = temp_file(
        "attacker-defender.json",
        r#"{ "defender": true, "units": [ { "archetype": "lord" } ] }"#,
    );
    let output = run_warband(&["--attacker", roster.to_str().unwrap(), "-q"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("attacker roster"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());

    // The same file is fine on the defending side.
    let output = run_warband(&["--defender", roster.to_str().unwrap(), "--seed", "5", "-q"]);
    assert!(output.status.success());
    assert_eq!(parse_records(&output).len(), 1);
}
