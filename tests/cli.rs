//! End-to-end tests for the `sdlc` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn sdlc_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sdlc"))
        .args(args)
        .current_dir(dir)
        .env_remove("SDLC_LOG")
        .output()
        .expect("failed to execute sdlc")
}

fn sdlc(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    sdlc_in(dir.path(), args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_config(dir: &Path, contents: &str) {
    std::fs::write(dir.join("sdlc.toml"), contents).unwrap();
}

// ---------------------------------------------------------------------------
// branch encode
// ---------------------------------------------------------------------------

#[test]
fn encode_user_workspace() {
    let output = sdlc(&["branch", "encode", "w1", "--user", "alice"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim(), "workspace/alice/w1");
}

#[test]
fn encode_group_patch_resolution() {
    let output = sdlc(&[
        "branch", "encode", "w3", "--group", "--access", "resolution", "--patch", "1.2.3",
    ]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim(), "patch/1.2.3/group-resolution/w3");
}

#[test]
fn encode_uses_configured_identity() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[identity]\nuser = \"carol\"\n");
    let output = sdlc_in(dir.path(), &["branch", "encode", "w1", "--access", "backup"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim(), "backup/carol/w1");
}

#[test]
fn encode_without_user_fails() {
    let output = sdlc(&["branch", "encode", "w1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("w1"), "{stderr}");
}

#[test]
fn encode_rejects_bad_arguments() {
    for args in [
        &["branch", "encode", "a/b", "--group"][..],
        &["branch", "encode", "w1", "--group", "--patch", "1.2"][..],
        &["branch", "encode", "w1", "--group", "--access", "archive"][..],
    ] {
        let output = sdlc(args);
        assert!(!output.status.success(), "{args:?}");
    }
}

#[test]
fn encode_json_output() {
    let output = sdlc(&["--format", "json", "branch", "encode", "g1", "--group"]);
    assert!(output.status.success(), "{output:?}");
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(value["branch"], "group/g1");
    assert_eq!(value["specification"]["workspace_type"], "GROUP");
}

// ---------------------------------------------------------------------------
// branch decode / scan
// ---------------------------------------------------------------------------

#[test]
fn decode_recognized_names() {
    let output = sdlc(&[
        "branch",
        "decode",
        "workspace/uid1/wid1",
        "patch/4.5.6/group-backup/wid2",
    ]);
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "workspace/uid1/wid1\tuser workspace wid1 of uid1");
    assert_eq!(
        lines[1],
        "patch/4.5.6/group-backup/wid2\tgroup backup wid2 for patch release version 4.5.6"
    );
}

#[test]
fn decode_unrecognized_name_exits_nonzero() {
    let output = sdlc(&["branch", "decode", "group/wid1", "main"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("main\tnot a workspace branch"));
}

#[test]
fn decode_json_uses_null_for_unrecognized() {
    let output = sdlc(&["--format", "json", "branch", "decode", "workspace//"]);
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(value["branch"], "workspace//");
    assert!(value["specification"].is_null());
}

#[test]
fn scan_filters_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_sdlc"))
        .args(["branch", "scan"])
        .current_dir(dir.path())
        .env_remove("SDLC_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn sdlc");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"main\nworkspace/alice/w1\nrelease-1.0.0\n\ngroup-resolution/fix\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let names: Vec<_> = text
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(names, ["workspace/alice/w1", "group-resolution/fix"]);
}

#[test]
fn scan_skips_names_that_are_not_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_sdlc"))
        .args(["branch", "scan"])
        .current_dir(dir.path())
        .env_remove("SDLC_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn sdlc");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"group/wid1\nfeature/caf\xe9\ngroup/wid2\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "{output:?}");
    let text = stdout(&output);
    let names: Vec<_> = text
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(names, ["group/wid1", "group/wid2"]);
}

// ---------------------------------------------------------------------------
// name check
// ---------------------------------------------------------------------------

#[test]
fn name_check_exit_status() {
    let cases = [
        ("entity-name", "entityNameAllows$", true),
        ("entity-name", "random::entity::path::entityName", false),
        ("entity-path", "model::test::function::test_String_$1_10$__String_MANY_", true),
        ("entity-path", "meta::test::ValidClassName", false),
        ("package-path", "meta::entity::path", true),
        ("package-path", "model::", false),
        ("packageable-element-path", "model", true),
        ("classifier-path", "meta::pure::metamodel::function::ConcreteFunctionDefinition", true),
        ("classifier-path", "random::entity::path", false),
        ("version-tag", "release-2147483647.0.0", true),
        ("version-tag", "release-2147483648.0.0", false),
    ];
    for (kind, value, valid) in cases {
        let output = sdlc(&["name", "check", kind, value]);
        assert_eq!(output.status.success(), valid, "{kind} {value}");
    }
}

#[test]
fn name_check_json() {
    let output = sdlc(&["--format", "json", "name", "check", "version-tag", "release-1.2.3"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(value["valid"], true);
    assert_eq!(value["kind"], "version tag");
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn format_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[output]\nformat = \"json\"\n");
    let output = sdlc_in(dir.path(), &["name", "check", "entity-name", "ok"]);
    assert!(output.status.success());
    assert!(stdout(&output).trim_start().starts_with('{'));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[identity]\nnickname = \"x\"\n");
    let output = sdlc_in(dir.path(), &["branch", "decode", "group/g"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sdlc.toml"), "{stderr}");
}

#[test]
fn explicit_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[identity]\nuser = \"dave\"\n").unwrap();
    let output = sdlc(&[
        "--config",
        path.to_str().unwrap(),
        "branch",
        "encode",
        "w",
    ]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output).trim(), "workspace/dave/w");
}
