use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!());
    cmd.arg("tests/fixtures/request.json")
        .arg("--user-id")
        .arg("user-1")
        .arg("--gateway-key")
        .arg("rzp_test_key")
        .arg("--payment-id")
        .arg("pay_29QQoUBi66xm2f");

    let output = cmd.output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["initiated"], true);
    assert_eq!(report["is_loading"], false);
    assert!(report["error"].is_null());
    assert_eq!(report["outcome"]["kind"], "enrolled");
    assert_eq!(report["outcome"]["course_id"], "course-rust-101");
    assert_eq!(report["descriptor"]["amount"], 49950);
    assert_eq!(report["descriptor"]["currency"], "INR");
    assert_eq!(report["descriptor"]["order_id"], "order_Nx81");
    assert_eq!(report["descriptor"]["description"], "Enrollment for Rust Fundamentals");
    assert_eq!(report["descriptor"]["prefill"]["name"], "Asha Rao");

    Ok(())
}

#[test]
fn test_cli_gateway_failure() {
    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.arg("tests/fixtures/request.json")
        .arg("--user-id")
        .arg("user-1")
        .arg("--gateway-key")
        .arg("rzp_test_key")
        .arg("--simulate")
        .arg("failure")
        .arg("--failure-code")
        .arg("X")
        .arg("--failure-description")
        .arg("Y");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Payment failed. Code: X. Reason: Y"))
        .stdout(predicate::str::contains("\"payment_failed\""));
}

#[test]
fn test_cli_missing_key() {
    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.env_remove("GATEWAY_KEY_ID")
        .arg("tests/fixtures/request.json")
        .arg("--user-id")
        .arg("user-1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Payment gateway key is not configured."))
        .stdout(predicate::str::contains("\"initiated\": false"));
}

#[test]
fn test_cli_offline_sdk() {
    let mut cmd = Command::new(cargo_bin!("coursepay"));
    cmd.arg("tests/fixtures/request.json")
        .arg("--user-id")
        .arg("user-1")
        .arg("--gateway-key")
        .arg("rzp_test_key")
        .arg("--script-source")
        .arg("offline");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Checkout SDK failed to load. Check your internet connection.",
        ))
        .stdout(predicate::str::contains("\"is_loading\": false"));
}
