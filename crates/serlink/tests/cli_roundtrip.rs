#![cfg(feature = "cli")]

use std::process::Command;

fn serlink() -> Command {
    Command::new(env!("CARGO_BIN_EXE_serlink"))
}

#[test]
fn encode_then_decode_roundtrip() {
    let out = serlink()
        .args(["encode", "--data", "hello, link", "--format", "json"])
        .output()
        .expect("encode should run");
    assert!(out.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("encode output should be json");
    let frame = value["frame"].as_str().expect("frame field").to_string();
    assert!(frame.starts_with("c0") && frame.ends_with("c0"));

    let out = serlink()
        .args(["decode", "--hex", &frame, "--format", "raw"])
        .output()
        .expect("decode should run");
    assert!(out.status.success());
    assert_eq!(out.stdout, b"hello, link");
}

#[test]
fn chunked_decode_matches_whole_input() {
    let out = serlink()
        .args(["encode", "--hex", "c0 db 00 ff", "--format", "json"])
        .output()
        .expect("encode should run");
    assert!(out.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("encode output should be json");
    let frame = value["frame"].as_str().expect("frame field").to_string();

    let whole = serlink()
        .args(["decode", "--hex", &frame, "--format", "raw"])
        .output()
        .expect("decode should run");
    let chunked = serlink()
        .args(["decode", "--hex", &frame, "--chunk-size", "1", "--format", "raw"])
        .output()
        .expect("chunked decode should run");

    assert!(whole.status.success());
    assert!(chunked.status.success());
    assert_eq!(whole.stdout, &[0xC0, 0xDB, 0x00, 0xFF]);
    assert_eq!(whole.stdout, chunked.stdout);
}

#[test]
fn decode_rejects_bad_hex() {
    let out = serlink()
        .args(["decode", "--hex", "zz"])
        .output()
        .expect("decode should run");
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(60));
}

#[test]
fn demo_delivers_everything() {
    let out = serlink()
        .args(["--log-level", "error", "demo", "--count", "2", "--format", "pretty"])
        .output()
        .expect("demo should run");
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ping 0 via 10.0.0.1"));
    assert!(stdout.contains("ping 1 via 10.0.0.1"));
    // The reserved-octet payloads print as hex.
    assert!(stdout.contains("c0db00"));
    assert!(stdout.contains("c0db01"));
}

#[cfg(unix)]
#[test]
fn run_fails_cleanly_without_config() {
    let out = serlink()
        .args(["run", "/definitely/not/links.json"])
        .output()
        .expect("run should start");
    assert!(!out.status.success());
}

#[test]
fn version_prints_package_version() {
    let out = serlink()
        .args(["version", "--format", "pretty"])
        .output()
        .expect("version should run");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
