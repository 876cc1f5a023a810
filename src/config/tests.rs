use super::settings::{PartialHubSettings, PartialSettings, Settings};
use super::load_config_from;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.hub.max_connections, 1000);
    assert_eq!(settings.hub.mailbox_capacity, 64);
    assert_eq!(settings.hub.inbound_capacity, 256);
    assert_eq!(settings.storage.path, "chathub_db");
    assert_eq!(settings.log.level, "info");
    assert_eq!(settings.listen_addr(), "127.0.0.1:8080");
}

#[test]
fn test_zero_capacities_are_clamped() {
    let partial = PartialSettings {
        hub: Some(PartialHubSettings {
            max_connections: None,
            mailbox_capacity: Some(0),
            inbound_capacity: Some(0),
        }),
        ..Default::default()
    };

    let settings = Settings::merged_with(partial);
    assert_eq!(settings.hub.mailbox_capacity, 1);
    assert_eq!(settings.hub.inbound_capacity, 1);
    assert_eq!(settings.hub.max_connections, 1000);
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("absent");

    let settings = load_config_from(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.hub.mailbox_capacity, 64);
}

#[test]
#[serial]
fn test_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [hub]
        max_connections = 10
        mailbox_capacity = 4
    "#;
    fs::write(tmp.path().join("chathub.toml"), toml).unwrap();

    let path = tmp.path().join("chathub");
    let settings = load_config_from(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.hub.max_connections, 10);
    assert_eq!(settings.hub.mailbox_capacity, 4);
    // untouched keys keep their defaults
    assert_eq!(settings.hub.inbound_capacity, 256);
    assert_eq!(settings.storage.path, "chathub_db");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("chathub.toml"),
        "[server]\nport = 9000\n",
    )
    .unwrap();
    let path = tmp.path().join("chathub");

    temp_env::with_vars(
        [
            ("CHATHUB_SERVER__PORT", Some("9100")),
            ("CHATHUB_HUB__MAILBOX_CAPACITY", Some("2")),
            ("CHATHUB_LOG__LEVEL", Some("debug")),
        ],
        || {
            let settings = load_config_from(path.to_str().unwrap()).unwrap();
            assert_eq!(settings.server.port, 9100);
            assert_eq!(settings.hub.mailbox_capacity, 2);
            assert_eq!(settings.log.level, "debug");
        },
    );
}
