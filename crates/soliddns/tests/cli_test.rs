//! Integration tests for the `soliddns` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! error handling, and one end-to-end lifecycle against a wiremock
//! appliance.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `soliddns` binary with env isolation.
///
/// Clears all `SOLIDDNS_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn soliddns_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("soliddns");
    cmd.env("HOME", "/tmp/soliddns-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/soliddns-test-nonexistent")
        .env_remove("SOLIDDNS_PROFILE")
        .env_remove("SOLIDDNS_APPLIANCE")
        .env_remove("SOLIDDNS_USERNAME")
        .env_remove("SOLIDDNS_PASSWORD")
        .env_remove("SOLIDDNS_OUTPUT")
        .env_remove("SOLIDDNS_INSECURE")
        .env_remove("SOLIDDNS_TIMEOUT")
        .env_remove("SOLIDDNS_DEFAULT_PROFILE");
    cmd
}

/// A command pointed at `appliance` with flag/env credentials.
fn appliance_cmd(appliance: &str) -> assert_cmd::Command {
    let mut cmd = soliddns_cmd();
    cmd.env("SOLIDDNS_PASSWORD", "admin")
        .args(["--appliance", appliance, "--username", "ipmadmin", "--color", "never"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Nothing listens here; commands that fail before any request never
/// notice.
const UNREACHABLE: &str = "http://127.0.0.1:9";

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = soliddns_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    soliddns_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("SOLIDserver")
            .and(predicate::str::contains("create"))
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("resources")),
    );
}

#[test]
fn test_version_flag() {
    soliddns_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("soliddns"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    soliddns_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    soliddns_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Local commands ──────────────────────────────────────────────────

#[test]
fn test_resources_table() {
    soliddns_cmd().arg("resources").assert().success().stdout(
        predicate::str::contains("solidserver_dns_rr")
            .and(predicate::str::contains("ip6-alias"))
            .and(predicate::str::contains("replace")),
    );
}

#[test]
fn test_resources_plain() {
    soliddns_cmd()
        .args(["resources", "-o", "plain"])
        .assert()
        .success()
        .stdout("solidserver_dns_rr\nsolidserver_ip6_alias\n");
}

#[test]
fn test_resources_json_lists_fields() {
    let output = soliddns_cmd()
        .args(["resources", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["alias"], "dns-rr");
    assert_eq!(parsed[0]["updatable"], true);
    assert_eq!(parsed[1]["updatable"], false);
    assert_eq!(parsed[1]["fields"][3]["default"], "CNAME");
}

#[test]
fn test_config_show_no_config() {
    soliddns_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    soliddns_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_set_profile_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap();

    soliddns_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args([
            "--appliance",
            "https://ipam.example.com",
            "--username",
            "ipmadmin",
            "config",
            "set-profile",
            "lab",
        ])
        .assert()
        .success();

    soliddns_cmd()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .args(["config", "profiles", "-o", "plain"])
        .assert()
        .success()
        .stdout("lab\n");
}

#[test]
fn test_set_profile_requires_appliance() {
    soliddns_cmd()
        .args(["config", "set-profile", "lab"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--appliance"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = soliddns_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_create_without_appliance() {
    soliddns_cmd()
        .args(["create", "dns-rr", "-f", "name=www.example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No appliance configured"));
}

#[test]
fn test_field_without_equals_is_a_usage_error() {
    let output = soliddns_cmd()
        .args(["create", "dns-rr", "-f", "name"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("KEY=VALUE"));
}

#[test]
fn test_unknown_resource() {
    let output = appliance_cmd(UNREACHABLE)
        .args(["read", "solidserver_ip_address", "--id", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Unknown resource type"), "{text}");
}

#[test]
fn test_read_requires_id() {
    appliance_cmd(UNREACHABLE)
        .args(["read", "dns-rr"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--id is required"));
}

#[test]
fn test_delete_without_yes_is_refused_non_interactively() {
    appliance_cmd(UNREACHABLE)
        .args(["delete", "dns-rr", "--id", "42"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[test]
fn test_alias_update_is_unsupported() {
    appliance_cmd(UNREACHABLE)
        .args(["update", "ip6-alias", "--id", "7", "-f", "name=v6.example.com"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn test_connection_refused() {
    appliance_cmd(UNREACHABLE)
        .args(["read", "dns-rr", "--id", "42"])
        .assert()
        .code(7);
}

// ── End-to-end against a mock appliance ─────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_create_prints_assigned_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/dns_rr_add"))
        .and(query_param("rr_name", "www.example.com"))
        .and(query_param("rr_type", "A"))
        .and(query_param("rr_ttl", "3600"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "ret_oid": "42" }])))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        appliance_cmd(&uri)
            .args([
                "-o",
                "plain",
                "create",
                "dns-rr",
                "-f",
                "server=ns1.example.com",
                "-f",
                "name=www.example.com",
                "-f",
                "type=a",
                "-f",
                "value=10.0.0.1",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "42\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Created DNS RR 'www.example.com'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_vanished_record_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/dns_rr_info"))
        .and(query_param("rr_id", "42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        appliance_cmd(&uri)
            .args(["read", "dns-rr", "--id", "42"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_sends_only_mutable_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/dns_rr_info"))
        .and(query_param("rr_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "rr_id": "42",
            "dns_name": "ns1.example.com",
            "rr_full_name": "www.example.com",
            "rr_type": "A",
            "value1": "10.0.0.1",
            "ttl": "3600"
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/rest/dns_rr_add"))
        .and(query_param("rr_id", "42"))
        .and(query_param("value1", "10.0.0.2"))
        .and(query_param("rr_ttl", "3600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "ret_oid": "42" }])))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        appliance_cmd(&uri)
            .args(["-o", "json", "update", "dns-rr", "--id", "42", "-f", "value=10.0.0.2"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["id"], "42");
    assert_eq!(parsed["fields"]["value"], "10.0.0.2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_of_immutable_field_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/dns_rr_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "rr_full_name": "www.example.com",
            "rr_type": "A",
            "value1": "10.0.0.1"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        appliance_cmd(&uri)
            .args(["update", "dns-rr", "--id", "42", "-f", "type=CNAME"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("requires replacing"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refused_delete_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/dns_rr_delete"))
        .and(query_param("rr_id", "42"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!([{ "errmsg": "object is locked" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        appliance_cmd(&uri)
            .args(["--yes", "delete", "dns-rr", "--id", "42"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("object is locked"));
}
