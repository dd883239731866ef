#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};

const GRID_FIXTURE: &str = include_str!("../../../fixtures/tvheadend/channel_grid.json");
const GUIDE_FIXTURE: &str = include_str!("../../../fixtures/tvheadend/xmltv_channels.xml");

/// Command with a clean environment and an empty config directory.
fn isolated_cmd(dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tvhgate");
    cmd.env_clear().env("RUST_LOG", "warn").arg("--dir").arg(dir);
    cmd
}

async fn mock_backend() -> wiremock::MockServer {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/api/channel/grid"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(GRID_FIXTURE))
        .mount(&mock_server)
        .await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/xmltv/channels"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(GUIDE_FIXTURE))
        .mount(&mock_server)
        .await;
    mock_server
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvhgate");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("lineup"))
        .stdout(predicate::str::contains("epg"));
}

#[test]
fn test_invalid_env_override_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(dir.path());

    // Act & Assert
    cmd.env("TVH_TUNER_COUNT", "lots")
        .arg("lineup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TVH_TUNER_COUNT"));
}

#[test]
fn test_invalid_config_file_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[device]\ntuner_count = \"six\"\n").unwrap();
    let mut cmd = isolated_cmd(dir.path());

    // Act & Assert
    cmd.arg("lineup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn test_lineup_unreachable_backend_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = isolated_cmd(dir.path());

    // Act & Assert
    cmd.env("TVH_URL", "http://127.0.0.1:1")
        .env("TVH_AUTH", "none")
        .env("TVH_TIMEOUT", "2")
        .arg("lineup")
        .assert()
        .failure()
        .stderr(predicate::str::contains("backend unavailable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lineup_prints_json() {
    // Arrange
    let mock_server = mock_backend().await;
    let uri = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_path_buf();

    // Act & Assert
    tokio::task::spawn_blocking(move || {
        isolated_cmd(&dir_path)
            .env("TVH_URL", &uri)
            .env("TVH_AUTH", "none")
            .env("TVH_STREAM_URL", "http://tvh:9981")
            .arg("lineup")
            .assert()
            .success()
            .stdout(predicate::str::contains("\"GuideNumber\": \"5\""))
            .stdout(predicate::str::contains("\"GuideName\": \"Radio One\""))
            .stdout(predicate::str::contains("Test Card").not());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_epg_writes_output_file() {
    // Arrange
    let mock_server = mock_backend().await;
    let uri = mock_server.uri();
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_path_buf();
    let output = dir.path().join("epg.xml");
    let output_arg = output.clone();

    // Act
    tokio::task::spawn_blocking(move || {
        isolated_cmd(&dir_path)
            .env("TVH_URL", &uri)
            .env("TVH_AUTH", "none")
            .args(["epg", "--output"])
            .arg(&output_arg)
            .assert()
            .success();
    })
    .await
    .unwrap();

    // Assert
    let xml = std::fs::read_to_string(&output).unwrap();
    assert!(xml.contains("<channel id=\"101\">"));
    assert!(xml.contains("channel=\"201\""));
}
