use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn hybrid_run_quickstart() {
    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("run").arg("demos/quickstart.hy");
    cmd.assert().success().stdout(predicate::eq("70\n"));
}

#[test]
fn hybrid_eval_snippet_prints_value() {
    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("eval").arg("2 + 3 * 4");
    cmd.assert().success().stdout(predicate::eq("14\n"));
}

#[test]
fn hybrid_eval_reports_const_reassignment() {
    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("eval").arg("const y = 1; y = 2;");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("ConstReassignment"));
}

#[test]
fn hybrid_division_flag_selects_policy() {
    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("eval").arg("1 / 0");
    cmd.assert().success().stdout(predicate::eq("Infinity\n"));

    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.args(["--division", "error", "eval", "1 / 0"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("DivisionByZero"));
}

#[test]
fn hybrid_run_script_from_disk() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("scoped.hy");
    fs::write(&script, "let z;\nz\n").expect("write script");

    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert().success().stdout(predicate::eq("null\n"));
}

#[test]
fn hybrid_run_reports_lex_error() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("bad.hy");
    fs::write(&script, "let x = 1 # 2;").expect("write script");

    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized character '#'"));
}

#[test]
fn hybrid_run_rejects_oversized_expression() {
    let dir = tempdir().expect("create temp dir");
    let script = dir.path().join("long_sum.hy");
    fs::write(&script, format!("1{}", " + 1".repeat(100_000))).expect("write script");

    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("run").arg(&script);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("nests too deeply"));
}

#[test]
fn hybrid_run_missing_file_fails() {
    let dir = tempdir().expect("create temp dir");
    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("run").arg(dir.path().join("absent.hy"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn hybrid_repl_keeps_session_until_exit() {
    let mut cmd = Command::cargo_bin("hybrid").expect("binary exists");
    cmd.arg("repl")
        .write_stdin("let a = 2;\na * 21\nexit\nlet never = 1;\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Hybrid Repl"))
        .stdout(predicate::str::contains("42"));
}
