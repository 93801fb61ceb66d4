mod common;
use common::*;

#[test]
fn println_runs() {
    let (stdout, stderr, code) = compile_and_run("fn main() {\n  println(\"hello\")\n}\n");
    assert_eq!(stdout, "hello\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn main_receives_script_arguments() {
    let script = compile("fn main(first) {\n  println(\"got ${first}\")\n}\n");
    let (stdout, _, code) = run_bash_script(&script, &[], &["alpha"]);
    assert_eq!(stdout, "got alpha\n");
    assert_eq!(code, 0);
}

#[test]
fn list_literal_iterates_items() {
    let src = "fn main() {\n  items = [\"a\", \"b c\"]\n  items.add(\"d\")\n  for item in items {\n    println(item)\n  }\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "a\nb c\nd\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn empty_list_iterates_nothing() {
    let src = "fn main() {\n  items = []\n  for item in items {\n    println(item)\n  }\n  println(\"done\")\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "done\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn list_membership() {
    let src = "fn main() {\n  items = [\"x\", \"y\"]\n  if items.contains(\"y\") {\n    println(\"has y\")\n  }\n  found = items.contains(\"z\")\n  println(found)\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "has y\nfalse\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn struct_fields_round_trip_including_multiline_values() {
    let src = "fn main() {\n  cfg = {name: \"demo\", note: \"one\ntwo\"}\n  println(cfg.name)\n  println(cfg.note)\n  println(cfg)\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(
        stdout,
        "demo\none\ntwo\nname=raw:demo\nnote=b64:b25lCnR3bw==\n",
        "stderr: {}",
        stderr
    );
    assert_eq!(code, 0);
}

#[test]
fn struct_get_method() {
    let src = "fn main() {\n  cfg = {mode: \"fast\"}\n  mode = cfg.get(\"mode\")\n  println(mode)\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "fast\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn try_catch_recovers_from_throw() {
    let src = "fn risky() {\n  throw \"boom\"\n}\n\nfn main() {\n  try {\n    risky()\n  } catch err {\n    println(\"caught ${err}\")\n  }\n  println(\"after\")\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "caught 1\nafter\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn try_without_failure_skips_catch_and_runs_finally() {
    let src = "fn main() {\n  try {\n    println(\"body\")\n  } catch err {\n    println(\"caught\")\n  } finally {\n    println(\"cleanup\")\n  }\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "body\ncleanup\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn destructuring_captures_status() {
    let src = "fn fail() {\n  return 3\n}\n\nfn main() {\n  out, code = fail()\n  println(\"code=${code}\")\n}\n";
    let (stdout, _, code) = compile_and_run(src);
    assert_eq!(stdout, "code=3\n");
    assert_eq!(code, 0);
}

#[test]
fn call_value_returns_string_result() {
    let src = "fn greet(name) {\n  return \"hi ${name}\"\n}\n\nfn main() {\n  msg = greet(\"bob\")\n  println(msg)\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "hi bob\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn dotted_call_dispatches_to_mangled_function() {
    let src = "fn main() {\n  tools.run(\"x\")\n}\n\nfn tools_run(v) {\n  println(\"ran ${v}\")\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "ran x\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn conditions_combine_and_negate() {
    let src = "fn main() {\n  name = \"x\"\n  if name == \"x\" && !missing {\n    println(\"match\")\n  }\n  if (name != \"x\" || missing) {\n    println(\"wrong\")\n  } else {\n    println(\"else\")\n  }\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "match\nelse\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn is_list_check() {
    let src = "fn main() {\n  items = [\"a\"]\n  name = \"a\"\n  if items is List {\n    println(\"items\")\n  }\n  if name is List {\n    println(\"name\")\n  }\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "items\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn shell_literal_runs_command() {
    let src = "fn main() {\n  greeting = $\"printf hey\"\n  println(greeting)\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "hey\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn runtime_truthiness_helpers() {
    let src = "fn main() {\n  if __gnash_bool_truthy(\"yes\") {\n    println(\"yes\")\n  }\n  if __gnash_bool_falsey(\"off\") {\n    println(\"off\")\n  }\n  if __gnash_bool_truthy(\"0\") {\n    println(\"zero\")\n  }\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "yes\noff\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn rc_file_feeds_config_accessors() {
    let src = "fn main() {\n  __gnash_load_rc()\n  if __gnash_config_step_enabled(\"deploy\") {\n    println(\"deploy on\")\n  }\n  if __gnash_config_step_enabled(\"lint\") {\n    println(\"lint on\")\n  }\n  target = __gnash_config_step_value(\"deploy\", \"target\")\n  println(target)\n}\n";
    let script = compile(src);
    let dir = tempfile::tempdir().expect("temp dir");
    let rc = dir.path().join("gnashrc");
    std::fs::write(&rc, "deploy_enabled=yes\nlint_enabled=no\ndeploy_target=prod\n").expect("write rc");
    let rc_path = rc.to_string_lossy().to_string();
    let (stdout, stderr, code) = run_bash_script(
        &script,
        &[("GNASH_NO_RC", "0"), ("GNASH_RC_OVERRIDE", rc_path.as_str())],
        &[],
    );
    assert_eq!(stdout, "deploy on\nprod\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn unreadable_rc_override_dies() {
    let script = compile("fn main() {\n  __gnash_load_rc()\n  println(\"unreachable\")\n}\n");
    let (stdout, stderr, code) = run_bash_script(
        &script,
        &[("GNASH_NO_RC", "0"), ("GNASH_RC_OVERRIDE", "/nonexistent/gnashrc")],
        &[],
    );
    assert_eq!(stdout, "");
    assert_eq!(code, 1);
    assert!(stderr.contains("RC override '/nonexistent/gnashrc' not readable"));
}

#[test]
fn ensure_file_content_reports_changes() {
    let src = "fn main() {\n  res, first = __gnash_ensure_file_content(\"out.txt\", \"data\", \"644\")\n  res, second = __gnash_ensure_file_content(\"out.txt\", \"data\", \"644\")\n  println(\"${first} ${second}\")\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "0 1\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn struct_field_keeps_trailing_newline() {
    let src = "fn main() {\n  cfg = {note: \"one\n\", plain: \"flat\"}\n  v = cfg.note\n  if v == \"one\n\" {\n    println(\"same\")\n  } else {\n    println(\"changed\")\n  }\n  w = cfg.get(\"plain\")\n  println(w)\n  println(cfg)\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(
        stdout,
        "same\nflat\nnote=b64:b25lCg==\nplain=raw:flat\n",
        "stderr: {}",
        stderr
    );
    assert_eq!(code, 0);
}

#[test]
fn empty_map_argument_is_an_empty_struct() {
    let src = "fn show(v) {\n  println(\"got=${v}.\")\n}\n\nfn main() {\n  show({})\n  println({})\n}\n";
    let (stdout, stderr, code) = compile_and_run(src);
    assert_eq!(stdout, "got=.\n\n", "stderr: {}", stderr);
    assert!(!stdout.contains("__GNASH"));
    assert_eq!(code, 0);
}

#[test]
fn rc_associative_arrays_are_promoted_to_global_scope() {
    let src = "fn main() {\n  __gnash_load_rc()\n  target = __gnash_config_step_value(\"deploy\", \"target\")\n  region = __gnash_config_step_value(\"deploy\", \"region\")\n  println(\"${target} ${region}\")\n}\n";
    let (stdout, stderr, code) = run_bash_script_with_files(
        &compile(src),
        &[("assoc.rc", "declare -A deploy=([target]=prod [region]=eu)\n")],
        &[("GNASH_NO_RC", "0"), ("GNASH_RC_OVERRIDE", "assoc.rc")],
        &[],
    );
    assert_eq!(stdout, "prod eu\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn config_step_list_reads_arrays_and_comma_lists() {
    let src = "fn main() {\n  __gnash_load_rc()\n  targets = __gnash_config_step_list(\"build\", \"targets\")\n  for t in targets {\n    println(t)\n  }\n  stages = __gnash_config_step_list(\"build\", \"stages\")\n  for stage in stages {\n    println(stage)\n  }\n  missing = __gnash_config_step_list(\"build\", \"none\")\n  for m in missing {\n    println(m)\n  }\n  println(\"end\")\n}\n";
    let (stdout, stderr, code) = run_bash_script_with_files(
        &compile(src),
        &[("build.rc", "build_targets=a,b\nbuild_stages=(lint \"unit test\")\n")],
        &[("GNASH_NO_RC", "0"), ("GNASH_RC", "build.rc")],
        &[],
    );
    assert_eq!(stdout, "a\nb\nlint\nunit test\nend\n", "stderr: {}", stderr);
    assert_eq!(code, 0);
}

#[test]
fn rc_found_in_working_directory_without_override() {
    let src = "fn main() {\n  __gnash_load_rc()\n  if __gnash_config_step_enabled(\"feature\") {\n    println(\"on\")\n  } else {\n    println(\"off\")\n  }\n}\n";
    let script = compile(src);
    let files = [(".gnashrc", "feature_enabled=no\n")];

    let (stdout, stderr, code) = run_bash_script_with_files(
        &script,
        &files,
        &[("GNASH_NO_RC", "0"), ("HOME", "/nonexistent-home")],
        &[],
    );
    assert_eq!(stdout, "off\n", "stderr: {}", stderr);
    assert_eq!(code, 0);

    // Disabled loading leaves every step enabled.
    let (stdout, _, code) = run_bash_script_with_files(&script, &files, &[("GNASH_NO_RC", "1")], &[]);
    assert_eq!(stdout, "on\n");
    assert_eq!(code, 0);
}
