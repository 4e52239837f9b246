// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Sample configuration printed by `--print-default-config`.
pub const DEFAULT_CONFIG_TOML: &str = r#"[watch]
root = "/tmp/foo"
recursive = false
exclude = []

[debounce]
gap = 10
tick = "1s"

[dispatch]
destinations = ["hello", "test"]
pre_upload_delay = "2s"
post_upload_delay = "2s"
tail_delay = "5s"
notify_per_file_failure = false

[publish]
program = "dacli"
endpoint = "10.2.162.110"
tenant = "da"
user = "system"
password = "123456"
metadata = "use=demo"
timeout = "5m"

[notify]
udp = "localhost:1234"
tcp = "localhost:1234"
"#;

/// Load a configuration file and return the raw, unvalidated model.
///
/// Use [`load_and_validate`] unless you need to inspect a config that may be
/// invalid.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from path, parse durations and check invariants
/// (non-empty destination list, gap >= 1, valid exclude globs, ...).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sharepush/sharepush.toml";

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let raw = load_from_str(DEFAULT_CONFIG_TOML).unwrap();
        let cfg = ConfigFile::try_from(raw).unwrap();

        assert_eq!(cfg.debounce.gap, 10);
        assert_eq!(cfg.debounce.tick, Duration::from_secs(1));
        assert_eq!(cfg.dispatch.destinations, vec!["hello", "test"]);
        assert_eq!(cfg.publish.timeout, Duration::from_secs(300));
        assert_eq!(cfg.notify.udp.as_deref(), Some("localhost:1234"));
    }
}
