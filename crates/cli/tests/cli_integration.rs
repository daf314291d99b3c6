//! CLI integration tests for all implemented subcommands.
//!
//! Uses `assert_cmd` to spawn the `fil` binary and verify
//! exit codes, stdout content, and stderr content.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = "x: value FROM some table.
y: first part OF x.
z: any value FROM [INNER value OF y] INTO nothing.
";

/// Helper: create a Command for the `fil` binary.
fn fil() -> Command {
    let mut cmd = cargo_bin_cmd!("fil");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper: write `content` to `name` inside a fresh temp dir.
fn write_source(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write source");
    (dir, path)
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    fil()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("FIL to Python translator"));
}

#[test]
fn version_exits_0() {
    fil()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fil"));
}

// ──────────────────────────────────────────────
// 2. Translate subcommand
// ──────────────────────────────────────────────

#[test]
fn translate_sample_prints_python() {
    let (_dir, path) = write_source("sample.fil", SAMPLE);
    fil()
        .arg("translate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("def FROM(p0, p1):\n\tpass\n\n"))
        .stdout(predicate::str::ends_with(
            "z = FROM_INTO(any_value, INNER_OF(value, y), nothing)\n",
        ));
}

#[test]
fn translate_reads_stdin_dash() {
    fil()
        .args(["translate", "-"])
        .write_stdin("42%.")
        .assert()
        .success()
        .stdout("42%\n");
}

#[test]
fn translate_writes_out_file() {
    let (dir, path) = write_source("in.fil", "x: FOO.");
    let out = dir.path().join("script.py");
    fil()
        .arg("translate")
        .arg(&path)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote"));
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "def FOO():\n\tpass\n\nx = FOO()\n"
    );
}

#[test]
fn translate_dedupe_flag_collapses_stubs() {
    fil()
        .args(["translate", "-", "--dedupe"])
        .write_stdin("a: x OF y.\nb: p OF q.")
        .assert()
        .success()
        .stdout("def OF(p0, p1):\n\tpass\n\na = OF(x, y)\nb = OF(p, q)\n");
}

#[test]
fn translate_syntax_error_exits_1_with_position() {
    fil()
        .args(["translate", "-"])
        .write_stdin("x: FOO")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains(
            "syntax error at line 1, column 7",
        ));
}

#[test]
fn translate_error_json_output() {
    let output = fil()
        .args(["--output", "json", "translate", "-"])
        .write_stdin("x: [FOO.")
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("stderr is JSON");
    assert_eq!(json["kind"], "syntax");
    assert_eq!(json["line"], 1);
    assert_eq!(json["column"], 8);
}

#[test]
fn translate_max_depth_flag_limits_nesting() {
    fil()
        .args(["translate", "-", "--max-depth", "1"])
        .write_stdin("A [B [C x]].")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nested deeper than 1 levels"));
}

#[test]
fn translate_nonexistent_file_exits_1() {
    fil()
        .args(["translate", "nonexistent_file_xyz.fil"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn quiet_suppresses_text_diagnostics() {
    fil()
        .args(["--quiet", "translate", "-"])
        .write_stdin("oops")
        .assert()
        .failure()
        .stderr("");
}

// ──────────────────────────────────────────────
// 3. Parse and sample subcommands
// ──────────────────────────────────────────────

#[test]
fn parse_json_dumps_typed_ast() {
    let output = fil()
        .args(["--output", "json", "parse", "-"])
        .write_stdin("y: first part OF x.")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(json["lines"][0]["kind"], "assignment");
    assert_eq!(json["lines"][0]["target"]["name"], "y");
    assert_eq!(json["lines"][0]["source"]["signature_name"], "OF");
}

#[test]
fn parse_text_prints_outline() {
    fil()
        .args(["parse", "-"])
        .write_stdin("FOO a b.")
        .assert()
        .success()
        .stdout("instruction FOO (1 params)\n  keyword FOO\n  identifier a_b\n");
}

#[test]
fn sample_round_trips_through_translate() {
    let sample = fil()
        .arg("sample")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    fil()
        .args(["translate", "-"])
        .write_stdin(sample)
        .assert()
        .success()
        .stdout(predicate::str::contains("def INNER_OF(p0, p1):"));
}
