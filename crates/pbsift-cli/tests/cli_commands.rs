#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::process::Command;

use pbsift_cli::commands::{decode, encode, lookup};
use pbsift_cli::PbsiftConfig;

/// HTTP response around a gzip of {1: 150, 2: "hello"}.
fn capture() -> Vec<u8> {
    let mut raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
    raw.extend(hex::decode("1f8b0800000000000203e398c628c49a919a93930f00675ec6d50a000000").unwrap());
    raw
}

const BODY: &str = "089601120568656c6c6f";

#[test]
fn decode_then_encode_restores_payload() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.bin");
    fs::write(&input, capture()).unwrap();
    let cfg = PbsiftConfig::default();

    let outcome = decode::run(&input, None, &cfg).unwrap();
    assert_eq!(outcome.output, dir.path().join("capture.bin.json"));
    assert!(outcome.envelope_warnings.is_empty());
    assert!(outcome.transcode_warnings.is_empty());

    let doc: serde_json::Value =
        serde_json::from_slice(&fs::read(&outcome.output).unwrap()).unwrap();
    assert_eq!(doc["message_content"]["1"], 150);
    assert_eq!(doc["message_content"]["2"], "hello");
    assert_eq!(doc["schema_definition"]["1"]["type"], "int");
    assert_eq!(doc["schema_definition"]["2"]["type"], "bytes");

    let written = encode::run(&outcome.output, None, &cfg).unwrap();
    assert_eq!(written, dir.path().join("capture.bin.bin"));
    assert_eq!(hex::encode(fs::read(&written).unwrap()), BODY);
}

#[test]
fn edited_document_encodes_new_value() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.bin");
    fs::write(&input, capture()).unwrap();
    let cfg = PbsiftConfig::default();

    let json_path = dir.path().join("doc.json");
    decode::run(&input, Some(&json_path), &cfg).unwrap();

    let text = fs::read_to_string(&json_path).unwrap();
    fs::write(&json_path, text.replace("\"hello\"", "\"howdy\"")).unwrap();

    let out = dir.path().join("edited.bin");
    encode::run(&json_path, Some(&out), &cfg).unwrap();
    assert_eq!(hex::encode(fs::read(&out).unwrap()), "0896011205686f776479");
}

#[test]
fn missing_input_is_not_found_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.bin");

    let err = decode::run(&input, None, &PbsiftConfig::default()).unwrap_err();
    assert_eq!(err.code().as_str(), "NOT_FOUND");
    assert!(err.to_string().starts_with("input file not found: "));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn failing_encode_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(
        &input,
        r#"{"message_content": {"1": 1, "3": "x"}, "schema_definition": {"1": {"type": "int"}}}"#,
    )
    .unwrap();

    let err = encode::run(&input, None, &PbsiftConfig::default()).unwrap_err();
    assert_eq!(err.code().as_str(), "MISSING_SCHEMA");
    assert!(!dir.path().join("doc.bin").exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn framing_error_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("truncated.bin");
    fs::write(&input, b"HTTP/1.1 200 OK\r\nContent-Length: 3").unwrap();

    let err = decode::run(&input, None, &PbsiftConfig::default()).unwrap_err();
    assert_eq!(err.code().as_str(), "FRAMING");
    assert!(!dir.path().join("truncated.bin.json").exists());
}

#[test]
fn lookup_reports_missing_user() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("resp.json");
    fs::write(&input, r#"{"info": [{"type": "不存在"}]}"#).unwrap();
    assert_eq!(lookup::run(&input).unwrap(), lookup::USER_NOT_FOUND);
}

#[test]
fn binary_reports_errors_with_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.bin");

    let out = Command::new(env!("CARGO_BIN_EXE_pbsift"))
        .arg("decode")
        .arg(&input)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: input file not found: "), "{stderr}");
}

#[test]
fn binary_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("pbsift.yaml");
    fs::write(&cfg, "version: 1\nbogus: true\n").unwrap();
    let input = dir.path().join("in.bin");
    fs::write(&input, [0x08, 0x01]).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_pbsift"))
        .arg("--config")
        .arg(&cfg)
        .arg("decode")
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(!dir.path().join("in.bin.json").exists());
}
