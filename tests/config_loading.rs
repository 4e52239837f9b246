// tests/config_loading.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use sharepush::config::{load_and_validate, ConfigFile};
use sharepush::errors::SharepushError;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(result: Result<ConfigFile, SharepushError>, needle: &str) {
    match result {
        Err(SharepushError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message '{msg}' should mention '{needle}'");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn demo_config_is_parsed_correctly() -> TestResult {
    init_tracing();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/sharepush.toml"))?;

    assert_eq!(cfg.watch.root, PathBuf::from("/srv/samba/drop"));
    assert!(cfg.watch.recursive);
    assert_eq!(cfg.watch.exclude.len(), 2);
    assert_eq!(cfg.debounce.gap, 10);
    assert_eq!(cfg.dispatch.destinations, vec!["hello", "test"]);
    assert_eq!(cfg.dispatch.tail_delay, Duration::from_secs(5));
    assert!(!cfg.dispatch.notify_per_file_failure);

    // Defaults fill in what the file leaves out.
    assert_eq!(cfg.publish.program, "dacli");
    assert_eq!(cfg.publish.metadata, "use=demo");
    assert_eq!(cfg.publish.timeout, Duration::from_secs(300));
    assert_eq!(cfg.notify.udp.as_deref(), Some("localhost:1234"));
    assert!(cfg.notify.tcp.is_none());
    Ok(())
}

#[test]
fn empty_destination_list_is_rejected() {
    let file = write_config(
        r#"
[watch]
root = "/tmp/foo"

[dispatch]
destinations = []

[publish]
endpoint = "e"
tenant = "t"
user = "u"
password = "p"
"#,
    );

    expect_config_error(load_and_validate(file.path()), "at least one container");
}

#[test]
fn missing_dispatch_section_is_a_toml_error() {
    let file = write_config(
        r#"
[watch]
root = "/tmp/foo"

[publish]
endpoint = "e"
tenant = "t"
user = "u"
password = "p"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SharepushError::TomlError(_)) => {}
        other => panic!("Expected TomlError, got: {:?}", other),
    }
}

#[test]
fn zero_gap_is_rejected() {
    let raw = ConfigFileBuilder::new().with_gap(0).raw();
    expect_config_error(ConfigFile::try_from(raw), "gap");
}

#[test]
fn bad_duration_names_the_field() {
    let raw = ConfigFileBuilder::new().with_tail_delay("soon").raw();
    expect_config_error(ConfigFile::try_from(raw), "tail_delay");

    let raw = ConfigFileBuilder::new().with_tick("0s").raw();
    expect_config_error(ConfigFile::try_from(raw), "tick");
}

#[test]
fn oversized_duration_is_a_config_error() {
    let raw = ConfigFileBuilder::new().with_tail_delay("9999999999999999h").raw();
    expect_config_error(ConfigFile::try_from(raw), "[dispatch].tail_delay");
}

#[test]
fn blank_destination_is_rejected() {
    let raw = ConfigFileBuilder::new().with_destinations(&["hello", "  "]).raw();
    expect_config_error(ConfigFile::try_from(raw), "destinations[1]");
}

#[test]
fn invalid_exclude_glob_is_rejected() {
    let raw = ConfigFileBuilder::new().with_exclude("a[").raw();
    match ConfigFile::try_from(raw) {
        Err(SharepushError::PatternError(_)) => {}
        other => panic!("Expected PatternError, got: {:?}", other),
    }
}

#[test]
fn builder_defaults_are_valid() {
    let cfg = ConfigFileBuilder::new()
        .with_udp("127.0.0.1:9")
        .with_per_file_failure_notifications(true)
        .build();
    assert_eq!(cfg.debounce.tick, Duration::from_secs(1));
    assert!(cfg.dispatch.notify_per_file_failure);
    assert_eq!(cfg.dispatch.pre_upload_delay, Duration::ZERO);
}
