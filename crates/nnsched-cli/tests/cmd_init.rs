//! Integration tests for `nnsched init`.
#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Path to the compiled `nnsched` binary.
fn nnsched_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("nnsched");
    path
}

#[test]
fn init_exits_0() {
    let out = Command::new(nnsched_bin())
        .arg("init")
        .output()
        .expect("run nnsched init");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("\ninput\n"), "stdout: {stdout}");
}

#[test]
fn init_json_is_a_topology_document() {
    let out = Command::new(nnsched_bin())
        .args(["init", "--format", "json"])
        .output()
        .expect("run nnsched init");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert!(value["layers"].is_array(), "missing layers");
    assert!(value["glues"].is_array(), "missing glues");
}

#[test]
fn init_output_pipes_into_check() {
    let init = Command::new(nnsched_bin())
        .arg("init")
        .output()
        .expect("run nnsched init");
    assert!(init.status.success());

    let mut child = Command::new(nnsched_bin())
        .args(["check", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn nnsched check");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&init.stdout)
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("ok: 4 node(s), 4 edge(s), 1 cycle(s)"));
}
