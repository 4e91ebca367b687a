use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn shell(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("line_shell").unwrap();
    cmd.current_dir(dir.path()).env("HOME", dir.path());
    cmd
}

#[test]
fn runs_one_line_and_prints_output() {
    let dir = TempDir::new().unwrap();
    shell(&dir)
        .args(["-c", "echo hello | wc -w"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn redirected_output_lands_in_the_file() {
    let dir = TempDir::new().unwrap();
    shell(&dir)
        .args(["-c", "echo AAA > newfile.txt; cat newfile.txt"])
        .assert()
        .success()
        .stdout("AAA\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("newfile.txt")).unwrap(),
        "AAA\n"
    );
}

#[test]
fn failure_sets_exit_code_and_reports_category() {
    let dir = TempDir::new().unwrap();
    shell(&dir)
        .args(["-c", "echo before; nosuch"])
        .assert()
        .failure()
        .code(1)
        .stdout("before\n")
        .stderr(predicate::str::contains("Unknown command: nosuch"));
}

#[test]
fn syntax_error_runs_nothing() {
    let dir = TempDir::new().unwrap();
    shell(&dir)
        .args(["-c", "echo x; echo \"open"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Syntax error"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    shell(&dir)
        .arg("--no-such-flag")
        .assert()
        .failure();
}

#[test]
fn failed_statement_still_lets_later_ones_run() {
    let dir = TempDir::new().unwrap();
    shell(&dir)
        .args(["-c", "rmdir nothere; mkdir d; echo ok"])
        .assert()
        .code(1)
        .stdout("ok\n")
        .stderr(predicate::str::contains("File not found"));
    assert!(dir.path().join("d").is_dir());
}
