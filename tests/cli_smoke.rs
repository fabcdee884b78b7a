//! Behavioural smoke tests for the CLI entrypoint.

use assert_cmd::Command;
use predicates::prelude::*;

fn gantry() -> Command {
    Command::cargo_bin("gantry").expect("binary should be built")
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    gantry()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_every_subcommand() {
    gantry().arg("--help").assert().success().stdout(
        predicate::str::contains("ls")
            .and(predicate::str::contains("start"))
            .and(predicate::str::contains("stop"))
            .and(predicate::str::contains("ssh"))
            .and(predicate::str::contains("gpu")),
    );
}

#[test]
fn gpu_rejects_an_unknown_token_before_any_network_call() {
    gantry()
        .args(["gpu", "vm1", "a100"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("a100").and(predicate::str::contains("possible values")),
        );
}

#[test]
fn gpu_help_names_the_offered_accelerators() {
    gantry().args(["gpu", "--help"]).assert().success().stdout(
        predicate::str::contains("v100")
            .and(predicate::str::contains("t4"))
            .and(predicate::str::contains("none")),
    );
}
