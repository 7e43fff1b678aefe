use assert_cmd::Command;
use predicates::prelude::*;

fn pathkv() -> Command {
    let mut cmd = Command::cargo_bin("pathkv").unwrap();
    cmd.env_remove("PATHKV_DEVICE");
    cmd
}

#[test]
fn put_then_get_round_trips_across_invocations() {
    let dir = assert_fs::TempDir::new().unwrap();

    pathkv()
        .args(["--dir", dir.path().to_str().unwrap(), "put", "order/status", "open"])
        .assert()
        .success();

    pathkv()
        .args(["--dir", dir.path().to_str().unwrap(), "get", "order/status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("open"));
}

#[test]
fn get_of_missing_key_fails() {
    let dir = assert_fs::TempDir::new().unwrap();

    pathkv()
        .args(["--dir", dir.path().to_str().unwrap(), "get", "missing"])
        .assert()
        .failure();
}

#[test]
fn match_count_reflects_prefix_writes() {
    let dir = assert_fs::TempDir::new().unwrap();
    let dir_str = dir.path().to_str().unwrap();

    pathkv().args(["--dir", dir_str, "put", "a/x", "1"]).assert().success();
    pathkv().args(["--dir", dir_str, "put", "a/y", "2"]).assert().success();
    pathkv().args(["--dir", dir_str, "put", "b", "3"]).assert().success();

    pathkv()
        .args(["--dir", dir_str, "match_count", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn undo_reverts_last_commit() {
    let dir = assert_fs::TempDir::new().unwrap();
    let dir_str = dir.path().to_str().unwrap();

    pathkv().args(["--dir", dir_str, "put", "x", "1"]).assert().success();
    pathkv().args(["--dir", dir_str, "undo"]).assert().success();

    pathkv()
        .args(["--dir", dir_str, "get", "x"])
        .assert()
        .failure();
}

#[test]
fn encode_and_decode_round_trip_via_hex() {
    let dir = assert_fs::TempDir::new().unwrap();
    let dir_str = dir.path().to_str().unwrap();

    pathkv().args(["--dir", dir_str, "put", "blob", "hello"]).assert().success();

    let encoded = pathkv()
        .args(["--dir", dir_str, "encode", "blob", "hex"])
        .output()
        .unwrap();
    assert!(encoded.status.success());
    let hex = String::from_utf8(encoded.stdout).unwrap().trim().to_string();
    assert_eq!(hex, "68656c6c6f");
}
