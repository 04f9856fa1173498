//! Scenario: the binary runs an offline session end to end
//!
//! Drives the real `ptd` binary over piped stdin with the fixed offline
//! quote source, so the test is deterministic and needs no network.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_subcommands() {
    Command::cargo_bin("ptd")
        .expect("binary builds")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("session")
                .and(predicate::str::contains("quote"))
                .and(predicate::str::contains("hours")),
        );
}

#[test]
fn hours_prints_the_market_banner() {
    Command::cargo_bin("ptd")
        .expect("binary builds")
        .arg("hours")
        .assert()
        .success()
        .stdout(predicate::str::contains("NSE").and(predicate::str::contains("IST")));
}

#[test]
fn offline_session_trades_and_summarizes() {
    Command::cargo_bin("ptd")
        .expect("binary builds")
        .args(["session", "--offline", "--cash", "500000"])
        .write_stdin("buy tcs 10 3000\nsummary\nsell tcs 10 3100\njournal\nquit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("paper funds: ₹500,000.00")
                .and(predicate::str::contains("bought 10 TCS.NS"))
                .and(predicate::str::contains("net worth"))
                .and(predicate::str::contains("sold 10 TCS.NS"))
                .and(predicate::str::contains("SELL")),
        );
}

#[test]
fn invalid_commands_do_not_kill_the_session() {
    Command::cargo_bin("ptd")
        .expect("binary builds")
        .args(["session", "--offline"])
        .write_stdin("frobnicate\nbuy tcs 1 3000\nquit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("unrecognized command")
                .and(predicate::str::contains("bought 1 TCS.NS")),
        );
}

#[test]
fn malformed_cash_flag_is_rejected() {
    Command::cargo_bin("ptd")
        .expect("binary builds")
        .args(["session", "--offline", "--cash", "lots"])
        .assert()
        .failure();
}
