//! End-to-end tests for the `sq` binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Builds a command for the `sq` binary.
fn sq() -> Command {
    Command::cargo_bin("sq").expect("sq binary should build")
}

#[test]
fn parse_prints_tree_and_canonical() {
    sq().args(["parse", "a AND b OR c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("query: a AND b OR c"))
        .stdout(predicate::str::contains("Or"))
        .stdout(predicate::str::contains("Term(\"c\")"))
        .stdout(predicate::str::contains("canonical: ((a AND b) OR c)"));
}

#[test]
fn parse_canonical_only() {
    sq().args(["parse", "--canonical", "a b"])
        .assert()
        .success()
        .stdout("(a AND b)\n");
}

#[test]
fn parse_json_output() {
    let output = sq()
        .args(["parse", "--json", "color:red OR boots"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("output should be one JSON object");
    assert_eq!(value["query"], "color:red OR boots");
    assert_eq!(value["ast"]["op"], "or");
    assert_eq!(value["ast"]["left"]["op"], "field");
    assert_eq!(value["ast"]["left"]["key"], "color");
    assert_eq!(value["canonical"], "(color:red OR boots)");
}

#[test]
fn parse_empty_query() {
    sq().args(["parse", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("(empty query)"));
}

#[test]
fn parse_error_shows_caret_and_hint() {
    sq().args(["parse", ":value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query syntax error"))
        .stderr(predicate::str::contains(":value"))
        .stderr(predicate::str::contains("^"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn parse_continues_past_errors() {
    sq().args(["parse", "(broken", "ok"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("query: ok"))
        .stderr(predicate::str::contains("closing parenthesis"));
}

#[test]
fn parse_reads_stdin_lines() {
    sq().args(["parse", "--canonical"])
        .write_stdin("a b\nc OR d\n")
        .assert()
        .success()
        .stdout("(a AND b)\n(c OR d)\n");
}

#[test]
fn check_is_silent_on_success() {
    sq().args(["check", "category:\"winter boots\" AND (color:black OR color:brown)"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn check_reports_every_error() {
    sq().args(["check", "(unbalanced", "field:", "fine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("closing parenthesis"))
        .stderr(predicate::str::contains("after 'field:'"));
}
