use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_gabc-lint")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn temp_score(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".gabc").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// -- stdin mode --

#[test]
fn stdin_clean_score() {
    let input = std::fs::read_to_string(fixture_path("clean.gabc")).unwrap();
    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn stdin_diagnostics_are_labelled() {
    cmd()
        .write_stdin("name: x;\n%%\nA(f|g)")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "<stdin>:3:3: error[invalid_pipe_without_nabc]",
        ));
}

// -- file mode --

#[test]
fn clean_file_exits_zero() {
    cmd()
        .arg(fixture_path("clean.gabc"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn pipe_without_nabc_lines_reports_gregorio_message() {
    cmd()
        .arg(fixture_path("pipe.gabc"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            ":3:11: error[invalid_pipe_without_nabc]: You used character \"|\" in gabc without setting \"nabc-lines\" parameter. Please set it in your gabc header.",
        ))
        .stdout(predicate::str::contains("warning[text_without_music]"));
}

#[test]
fn nabc_score_is_clean_in_its_own_font() {
    cmd()
        .arg(fixture_path("nabc.gabc"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn font_flag_overrides_header() {
    cmd()
        .args(["-F", "gregall"])
        .arg(fixture_path("nabc.gabc"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[font_incompatibility]"))
        .stdout(predicate::str::contains("error[invalid_subpunctis_modifier]"));
}

#[test]
fn unknown_font_is_a_usage_error() {
    cmd()
        .args(["--font", "gothic"])
        .arg(fixture_path("clean.gabc"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("gothic"));
}

#[test]
fn nabc_lines_flag_enables_alternation() {
    let score = temp_score("name: x;\n%%\nA(f|peGlsa6tohl)");
    cmd().arg(score.path()).assert().code(1);
    cmd()
        .args(["--nabc-lines", "1"])
        .arg(score.path())
        .assert()
        .success();
}

#[test]
fn json_output() {
    let assert = cmd()
        .args(["-f", "json"])
        .arg(fixture_path("broken.gabc"))
        .assert()
        .code(1);
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["code"], "unclosed_tag");
    assert_eq!(entries[0]["message"], "unclosed tag: <b>");
    assert_eq!(entries[1]["code"], "invalid_pitch");
    assert_eq!(entries[1]["range"]["start"]["line"], 2);
    assert!(entries[0]["file"].as_str().unwrap().ends_with("broken.gabc"));
}

#[test]
fn max_diagnostics_caps_output_not_status() {
    let assert = cmd()
        .args(["-m", "1"])
        .arg(fixture_path("broken.gabc"))
        .assert()
        .code(1);
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 2, "{output}");
    assert!(lines[0].contains("error[unclosed_tag]"));
    assert_eq!(lines[1], "1 error(s), 0 warning(s) in 1 file(s)");
}

#[test]
fn information_does_not_fail_and_can_be_hidden() {
    let score = temp_score("name: x;\n%%\nBad(gwh)");
    cmd()
        .arg(score.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("info[glyph_break_suggestion]"));
    cmd()
        .arg("--no-info")
        .arg(score.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn directory_is_scanned_for_gabc_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.gabc"), "name: a;\n%%\n(c4) A(f)").unwrap();
    std::fs::write(dir.path().join("b.gabc"), "name: b;\n%%\n(c4) B(n)").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "A(f|g)").unwrap();

    cmd()
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("b.gabc:3:8: error[invalid_pitch]"))
        .stdout(predicate::str::contains("notes.txt").not())
        .stdout(predicate::str::contains("in 1 file(s)").not());
}

#[test]
fn glob_patterns_expand() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("one.gabc"), "name: a;\n%%\n(c4) A(f)").unwrap();
    std::fs::write(dir.path().join("two.gabc"), "%%\n(c4) A(f)").unwrap();
    let pattern = format!("{}/*.gabc", dir.path().display());

    cmd()
        .arg(pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains("two.gabc:1:1: warning[missing_name]"))
        .stdout(predicate::str::contains("0 error(s), 1 warning(s) in 2 file(s)"));
}

#[test]
fn unmatched_input_is_an_operational_failure() {
    cmd()
        .arg("/nonexistent/score.gabc")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("warning: no files matched"))
        .stderr(predicate::str::contains("no input files"));
}

#[test]
fn unknown_format_is_an_operational_failure() {
    cmd()
        .args(["-f", "xml"])
        .arg(fixture_path("clean.gabc"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown format: xml"));
}
