#![allow(dead_code)]
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn crate_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).to_path_buf()
}

pub fn fixtures_dir() -> PathBuf {
    crate_root().join("tests").join("fixtures")
}

pub fn compile(src: &str) -> String {
    compile_named(src, "test.gnash")
}

pub fn compile_named(src: &str, name: &str) -> String {
    gnashc::compile_source(src, name).unwrap_or_else(|e| panic!("compile failed:\n{}", e))
}

pub fn compile_err(src: &str) -> String {
    match gnashc::compile_source(src, "test.gnash") {
        Ok(out) => panic!("expected a compile error, got:\n{}", out),
        Err(e) => e.to_string(),
    }
}

/// Compiles `tests/fixtures/<name>.gnash` and compares it with
/// `<name>.sh.expected`. Set `GNASHC_UPDATE_SNAPSHOTS` to rewrite the snapshot.
pub fn assert_codegen_matches_snapshot(fixture_name: &str) {
    let src_path = fixtures_dir().join(format!("{}.gnash", fixture_name));
    let expected_path = fixtures_dir().join(format!("{}.sh.expected", fixture_name));

    let src = fs::read_to_string(&src_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", src_path.display(), e));
    let output = compile_named(&src, &format!("{}.gnash", fixture_name));

    let expected = if std::env::var("GNASHC_UPDATE_SNAPSHOTS").is_ok() {
        fs::write(&expected_path, &output).expect("Failed to update snapshot");
        output.clone()
    } else {
        fs::read_to_string(&expected_path).unwrap_or_else(|_| {
            panic!(
                "Snapshot missing: {}. run with GNASHC_UPDATE_SNAPSHOTS=1 to create it.",
                expected_path.display()
            )
        })
    };

    pretty_assertions::assert_eq!(
        output.trim(),
        expected.trim(),
        "Codegen mismatch for {}",
        fixture_name
    );
}

/// Writes `script` into a fresh temp dir and runs it with bash from there.
/// Returns (stdout, stderr, exit code).
pub fn run_bash_script(script: &str, env: &[(&str, &str)], args: &[&str]) -> (String, String, i32) {
    run_bash_script_with_files(script, &[], env, args)
}

/// Like `run_bash_script`, but first writes each `(relative path, contents)`
/// pair into the working directory.
pub fn run_bash_script_with_files(
    script: &str,
    files: &[(&str, &str)],
    env: &[(&str, &str)],
    args: &[&str],
) -> (String, String, i32) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("Failed to write fixture file");
    }
    let script_path = dir.path().join("script.sh");
    fs::write(&script_path, script).expect("Failed to write temp script");

    let mut cmd = Command::new("bash");
    cmd.arg(&script_path)
        .args(args)
        .current_dir(dir.path())
        .env("GNASH_NO_RC", "1")
        .env("HOME", dir.path())
        .env("TMPDIR", dir.path())
        .env_remove("GNASH_RC")
        .env_remove("GNASH_RC_OVERRIDE");
    for (k, v) in env {
        cmd.env(k, v);
    }
    let output = cmd.output().expect("Failed to run bash");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

pub fn compile_and_run(src: &str) -> (String, String, i32) {
    run_bash_script(&compile(src), &[], &[])
}
