use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::tempdir;

fn run_check(project: &Path, extra: &[&str]) -> Output {
    let mut cmd = Command::new(PathBuf::from(env!("CARGO_BIN_EXE_plint")));
    cmd.current_dir(project).arg("check").arg(".");
    for arg in extra {
        cmd.arg(arg);
    }
    cmd.output().expect("failed to run plint")
}

#[test]
fn clean_file_passes() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("index.pug"), "div\n  span hello\n").unwrap();

    let output = run_check(project.path(), &[]);

    assert!(output.status.success(), "{output:?}");
    assert!(output.stdout.is_empty());
}

#[test]
fn empty_directory_passes() {
    let project = tempdir().unwrap();

    let output = run_check(project.path(), &[]);

    assert!(output.status.success());
}

#[test]
fn reports_bad_indentation() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("index.pug"), "div\n   span x\n").unwrap();

    let output = run_check(project.path(), &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("P201"), "{stdout}");
    assert!(
        stdout.contains("Expected indentation of 2 spaces but found 3"),
        "{stdout}"
    );
    assert!(stderr.contains("Found 1 error in 1 file."), "{stderr}");
}

#[test]
fn reports_undefined_variable() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("index.pug"), "div\n  p= user.name\n").unwrap();

    let output = run_check(project.path(), &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("P301"), "{stdout}");
    assert!(stdout.contains("'user' is not defined."), "{stdout}");
}

#[test]
fn globals_from_config_are_defined() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("plint.toml"), "globals = [\"user\"]\n").unwrap();
    fs::write(project.path().join("index.pug"), "div\n  p= user.name\n").unwrap();

    let output = run_check(project.path(), &[]);

    assert!(output.status.success(), "{output:?}");
}

#[test]
fn reports_broken_template() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("index.pug"), "each x in ]\n").unwrap();

    let output = run_check(project.path(), &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("P001"), "{stdout}");
    assert!(stdout.contains("Pug can't parse this template"), "{stdout}");
}

#[test]
fn json_format_emits_one_object_per_line() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("index.pug"), "div\n  p= user.name\n").unwrap();

    let output = run_check(project.path(), &["--format", "json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    let lines: Vec<&str> = stdout.lines().filter(|line| !line.is_empty()).collect();
    assert!(!lines.is_empty(), "{stdout}");
    for line in &lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["path"].as_str().unwrap().ends_with("index.pug"));
        assert_eq!(value["code"], "P301");
        assert!(value["location"]["start"]["line"].is_u64());
    }
}

#[test]
fn counts_errors_across_files() {
    let project = tempdir().unwrap();
    fs::write(project.path().join("a.pug"), "div\n   span x\n").unwrap();
    fs::write(project.path().join("b.pug"), "div\n   span y\n").unwrap();

    let output = run_check(project.path(), &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Found 2 errors in 2 files."), "{stderr}");
}
