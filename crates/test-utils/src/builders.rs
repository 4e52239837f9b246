#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use sharepush::config::{
    ConfigFile, DispatchSettings, NotifySection, RawConfigFile, RawDebounceSection,
    RawDispatchSection, RawPublishSection, WatchSection,
};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from a valid config with two destinations and zero delays.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSection {
                    root: PathBuf::from("/tmp/sharepush-test"),
                    recursive: false,
                    exclude: Vec::new(),
                },
                debounce: RawDebounceSection {
                    gap: 3,
                    tick: "1s".to_string(),
                },
                dispatch: RawDispatchSection {
                    destinations: vec!["hello".to_string(), "test".to_string()],
                    pre_upload_delay: "0ms".to_string(),
                    post_upload_delay: "0ms".to_string(),
                    tail_delay: "0ms".to_string(),
                    notify_per_file_failure: false,
                },
                publish: RawPublishSection {
                    program: "dacli".to_string(),
                    endpoint: "127.0.0.1".to_string(),
                    tenant: "da".to_string(),
                    user: "system".to_string(),
                    password: "secret".to_string(),
                    metadata: "use=demo".to_string(),
                    timeout: "5s".to_string(),
                },
                notify: NotifySection::default(),
            },
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.watch.root = root.into();
        self
    }

    pub fn with_exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn with_gap(mut self, gap: u64) -> Self {
        self.config.debounce.gap = gap;
        self
    }

    pub fn with_tick(mut self, tick: &str) -> Self {
        self.config.debounce.tick = tick.to_string();
        self
    }

    pub fn with_destinations(mut self, destinations: &[&str]) -> Self {
        self.config.dispatch.destinations = destinations.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_tail_delay(mut self, delay: &str) -> Self {
        self.config.dispatch.tail_delay = delay.to_string();
        self
    }

    pub fn with_per_file_failure_notifications(mut self, on: bool) -> Self {
        self.config.dispatch.notify_per_file_failure = on;
        self
    }

    pub fn with_udp(mut self, addr: &str) -> Self {
        self.config.notify.udp = Some(addr.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch settings with the given destinations and no delays.
pub fn instant_dispatch(destinations: &[&str]) -> DispatchSettings {
    DispatchSettings {
        destinations: destinations.iter().map(|d| d.to_string()).collect(),
        pre_upload_delay: Duration::ZERO,
        post_upload_delay: Duration::ZERO,
        tail_delay: Duration::ZERO,
        notify_per_file_failure: false,
    }
}
