//! CLI tests for the `birdc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn birdc() -> Command {
    Command::cargo_bin("birdc").expect("binary builds")
}

fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).expect("write source");
    path
}

#[test]
fn test_run_mode_prints_program_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "count.bird", "var x = 0; while x < 3 { x += 1; print x; }");

    birdc()
        .arg(&path)
        .arg("--run")
        .assert()
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn test_default_mode_writes_wasm_and_prints_module() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "hello.bird", "print \"hello\";");

    birdc()
        .arg(&path)
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(module"))
        .stdout(predicate::str::contains("call $print_str"))
        .stdout(predicate::str::contains("wasm module written to output.wasm"));

    let bytes = std::fs::read(dir.path().join("output.wasm")).expect("output.wasm exists");
    assert_eq!(&bytes[0..4], b"\0asm");
}

#[test]
fn test_output_flag_overrides_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "one.bird", "print 1;");

    birdc()
        .arg(&path)
        .args(["-o", "one.wasm"])
        .current_dir(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("one.wasm").exists());
}

#[test]
fn test_check_mode_reports_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "bad.bird", "const x = 1;\nx = 2;");

    birdc()
        .arg(&path)
        .arg("--check")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            ">>[ERROR] Identifier 'x' is not mutable. (line 2, character 1)",
        ))
        .stderr(predicate::str::contains("[1 ERRORS FOUND]"));
}

#[test]
fn test_lex_error_renders_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "lex.bird", "var x = @;");

    birdc()
        .arg(&path)
        .arg("--check")
        .assert()
        .failure()
        .stderr(predicate::str::contains(">>[ERROR] undefined character @"))
        .stderr(predicate::str::contains("var x = @;"));
}

#[test]
fn test_missing_file_fails() {
    birdc()
        .arg("no-such-file.bird")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_usage_without_arguments() {
    birdc()
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: birdc"));
}

#[test]
fn test_tokens_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_source(&dir, "tok.bird", "print 1;");

    birdc()
        .arg(&path)
        .arg("--tokens")
        .assert()
        .success()
        .stdout(predicate::str::contains("Print"))
        .stdout(predicate::str::contains("IntLiteral"));
}
