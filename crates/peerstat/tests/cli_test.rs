//! Integration tests for the `peerstat` binary.
//!
//! The appliance is a wiremock server; the key file and the report land in a
//! temp directory that also serves as the working directory.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const REPORT: &str = "device_42_peer_details.csv";

/// Build a [`Command`] for the `peerstat` binary with env isolation.
///
/// Clears `PEERSTAT_*` variables, runs inside `dir`, and points `--config`
/// at a file that does not exist so the user's configuration is never read.
fn peerstat_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("peerstat");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .env_remove("PEERSTAT_KEY_DIR")
        .env_remove("PEERSTAT_OUTPUT_DIR")
        .env_remove("PEERSTAT_INSECURE")
        .env_remove("PEERSTAT_TIMEOUT")
        .env_remove("PEERSTAT_MERGE")
        .env_remove("PEERSTAT_GROUP_BY")
        .arg("--config")
        .arg(dir.join("absent.toml"));
    cmd
}

/// Temp dir holding `key.json` for `server`.
fn workspace(server: &MockServer) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let key = json!({"hostname": server.uri(), "api_key": "test-key"});
    std::fs::write(dir.path().join("key.json"), key.to_string()).unwrap();
    dir
}

fn stat(addr: &str, values: [u64; 4]) -> Value {
    let groups: Vec<Value> = values
        .iter()
        .map(|v| json!([{"key": {"key_type": "ipaddr", "addr": addr}, "vtype": "count", "value": v}]))
        .collect();
    json!({"oid": 42, "time": 0, "duration": 0, "values": groups})
}

async fn mount(server: &MockServer, expected_body: Value, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/v1/metrics/total"))
        .and(header("authorization", "ExtraHop apikey=test-key"))
        .and(body_partial_json(expected_body))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Request failures exit with -1, which a POSIX parent sees as 255.
fn assert_request_failure(output: &Output) {
    let expected = if cfg!(unix) { 255 } else { -1 };
    assert_eq!(output.status.code(), Some(expected), "{}", combined_output(output));
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let dir = tempfile::tempdir().unwrap();
    peerstat_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("--days")
            .and(predicate::str::contains("--device-id"))
            .and(predicate::str::contains("--group-by")),
    );
}

#[test]
fn test_version_flag() {
    let dir = tempfile::tempdir().unwrap();
    peerstat_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("peerstat"));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    peerstat_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_config_path_and_show() {
    let dir = tempfile::tempdir().unwrap();
    peerstat_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("absent.toml"));

    peerstat_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]").and(predicate::str::contains("insecure = true")));
}

#[test]
fn test_global_flags_on_either_side_of_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    peerstat_cmd(dir.path())
        .args(["-v", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("absent.toml"));

    peerstat_cmd(dir.path())
        .args(["completions", "zsh", "-vv"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_report_options_rejected_with_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    peerstat_cmd(dir.path())
        .args(["--days", "3", "config", "show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be combined with a subcommand"));
}

// ── Report runs ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_prompted_report_writes_csv() {
    let server = MockServer::start().await;
    mount(
        &server,
        json!({"from": -259_200_000, "object_ids": [42], "metric_category": "net_detail"}),
        ResponseTemplate::new(200).set_body_json(json!({
            "cycle": "auto",
            "stats": [stat("10.0.0.1", [1, 2, 3, 4]), stat("10.0.0.1", [5, 6, 7, 8])]
        })),
    )
    .await;
    let dir = workspace(&server);

    peerstat_cmd(dir.path())
        .write_stdin("3\nkey.json\n42\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("How many days of lookback?")
                .and(predicate::str::contains("What is the name of your keyFile?"))
                .and(predicate::str::contains("What is the device id?"))
                .and(predicate::str::contains("Metrics successfully queried"))
                .and(predicate::str::contains(format!("File {REPORT} successfully written"))),
        );

    assert_eq!(
        std::fs::read_to_string(dir.path().join(REPORT)).unwrap(),
        "PeerIP,Packets In,Packets Out,Bytes In,Bytes Out\n10.0.0.1,5,6,7,8\n"
    );
}

#[tokio::test]
async fn test_sum_merge_via_flags() {
    let server = MockServer::start().await;
    mount(
        &server,
        json!({"from": -86_400_000}),
        ResponseTemplate::new(200).set_body_json(json!({
            "stats": [stat("10.0.0.1", [1, 2, 3, 4]), stat("10.0.0.1", [5, 6, 7, 8])]
        })),
    )
    .await;
    let dir = workspace(&server);

    peerstat_cmd(dir.path())
        .args(["--days", "1", "--key-file", "key.json", "--device-id", "42", "--merge", "sum"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join(REPORT)).unwrap(),
        "PeerIP,Packets In,Packets Out,Bytes In,Bytes Out\n10.0.0.1,6,8,10,12\n"
    );
}

#[tokio::test]
async fn test_protocol_report_with_preview() {
    let server = MockServer::start().await;
    let nested = json!([{
        "key": {"key_type": "ipaddr", "addr": "10.0.0.5", "host": "web01"},
        "vtype": "dset",
        "value": [
            {"key": {"key_type": "string", "str": "HTTP"}, "vtype": "count", "value": 3},
            {"key": {"key_type": "string", "str": "DNS"}, "vtype": "count", "value": 1}
        ]
    }]);
    mount(
        &server,
        json!({"metric_category": "app_detail"}),
        ResponseTemplate::new(200).set_body_json(json!({
            "stats": [{"oid": 42, "values": [nested.clone(), nested.clone(), nested.clone(), nested]}]
        })),
    )
    .await;
    let dir = workspace(&server);
    let out_dir = dir.path().join("reports");
    std::fs::create_dir(&out_dir).unwrap();

    peerstat_cmd(dir.path())
        .args(["-d", "2", "-f", "key.json", "-i", "42", "-g", "peer-protocol", "--preview"])
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Protocol").and(predicate::str::contains("HTTP")));

    assert_eq!(
        std::fs::read_to_string(out_dir.join(REPORT)).unwrap(),
        "PeerIP,Protocol,Packets In,Packets Out,Bytes In,Bytes Out\n\
         10.0.0.5,HTTP,3,3,3,3\n\
         10.0.0.5,DNS,1,1,1,1\n"
    );
}

#[tokio::test]
async fn test_non_numeric_lookback_queries_from_zero() {
    let server = MockServer::start().await;
    mount(
        &server,
        json!({"from": 0}),
        ResponseTemplate::new(200).set_body_json(json!({"stats": []})),
    )
    .await;
    let dir = workspace(&server);

    peerstat_cmd(dir.path())
        .write_stdin("a week\nkey.json\n42\n")
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join(REPORT)).unwrap(),
        "PeerIP,Packets In,Packets Out,Bytes In,Bytes Out\n"
    );
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_200_exits_without_csv() {
    let server = MockServer::start().await;
    mount(
        &server,
        json!({}),
        ResponseTemplate::new(500).set_body_string("internal"),
    )
    .await;
    let dir = workspace(&server);

    let output = peerstat_cmd(dir.path())
        .write_stdin("3\nkey.json\n42\n")
        .output()
        .unwrap();

    assert_request_failure(&output);
    assert!(combined_output(&output).contains("Non-200 status code"));
    assert!(!dir.path().join(REPORT).exists());
}

#[tokio::test]
async fn test_malformed_json_exits_without_csv() {
    let server = MockServer::start().await;
    mount(
        &server,
        json!({}),
        ResponseTemplate::new(200).set_body_string("{\"stats\": ["),
    )
    .await;
    let dir = workspace(&server);

    let output = peerstat_cmd(dir.path())
        .write_stdin("3\nkey.json\n42\n")
        .output()
        .unwrap();

    assert_request_failure(&output);
    assert!(combined_output(&output).contains("Error parsing response JSON"));
    assert!(!dir.path().join(REPORT).exists());
}

#[test]
fn test_unreachable_appliance_is_request_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();
    let key = json!({"hostname": format!("http://127.0.0.1:{port}"), "api_key": "k"});
    std::fs::write(dir.path().join("key.json"), key.to_string()).unwrap();

    let output = peerstat_cmd(dir.path())
        .write_stdin("3\nkey.json\n42\n")
        .output()
        .unwrap();

    assert_request_failure(&output);
    assert!(combined_output(&output).contains("Error requesting peer metrics"));
    assert!(!dir.path().join(REPORT).exists());
}

#[tokio::test]
async fn test_non_numeric_device_is_usage_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = workspace(&server);

    let output = peerstat_cmd(dir.path())
        .write_stdin("3\nkey.json\nedge-router\n")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("not a numeric device id"));
}

#[test]
fn test_missing_key_file() {
    let dir = tempfile::tempdir().unwrap();

    let output = peerstat_cmd(dir.path())
        .write_stdin("3\nnope.json\n42\n")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("nope.json"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("What is the device id?"));
}
