//! Integration tests for `nnsched cycles`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::Command;

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

/// Path to a shared fixture file.
fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path
}

#[test]
fn cycles_rnn_reports_self_loop() {
    let out = Command::new(nnsched_bin())
        .args(["cycles", fixture("rnn.topo").to_str().expect("path")])
        .output()
        .expect("run nnsched cycles");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout,
        "self-loop 0 (1 edge(s))\n  head  recur: hidden -> hidden\n"
    );
}

#[test]
fn cycles_ffnn_reports_none() {
    let out = Command::new(nnsched_bin())
        .args(["cycles", fixture("ffnn.topo").to_str().expect("path")])
        .output()
        .expect("run nnsched cycles");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "no cycles\n");
}

#[test]
fn cycles_shared_json_lists_both_loops() {
    let out = Command::new(nnsched_bin())
        .args([
            "cycles",
            fixture("shared.topo").to_str().expect("path"),
            "--format",
            "json",
        ])
        .output()
        .expect("run nnsched cycles");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["count"], 2);

    // c -> a closes over b -> c and a -> b.
    assert_eq!(value["cycles"][0]["head"]["label"], "ca");
    let body: Vec<&str> = value["cycles"][0]["body"]
        .as_array()
        .expect("body array")
        .iter()
        .map(|e| e["label"].as_str().expect("label"))
        .collect();
    assert_eq!(body, ["bc", "ab"]);

    assert_eq!(value["cycles"][1]["head"]["label"], "ba");
    assert_eq!(value["cycles"][1]["body"][0]["label"], "ab");
}
