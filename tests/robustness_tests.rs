mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_malformed_request_handling() {
    let file = common::request_file("{\"amount\": 10, \"courseId\": ");

    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.arg(file.path())
        .arg("--user-id")
        .arg("user-1")
        .arg("--gateway-key")
        .arg("rzp_test_key");

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_non_positive_amount_rejected() {
    let file = common::request_file(
        r#"{"amount": 0, "courseId": "c1", "courseTitle": "Rust"}"#,
    );

    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.arg(file.path())
        .arg("--user-id")
        .arg("user-1")
        .arg("--gateway-key")
        .arg("rzp_test_key");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn test_unauthenticated_request() {
    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.arg("tests/fixtures/request.json")
        .arg("--gateway-key")
        .arg("rzp_test_key");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Authentication is required before starting a payment.",
        ))
        .stdout(predicate::str::contains("\"aborted\""));
}

#[test]
fn test_dismissed_checkout() {
    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.arg("tests/fixtures/request.json")
        .arg("--user-id")
        .arg("user-1")
        .arg("--gateway-key")
        .arg("rzp_test_key")
        .arg("--simulate")
        .arg("dismiss");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"abandoned\""))
        .stdout(predicate::str::contains("\"is_loading\": false"));
}
