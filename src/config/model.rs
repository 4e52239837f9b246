// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration exactly as read from the TOML file.
///
/// ```toml
/// [watch]
/// root = "/srv/share"
///
/// [debounce]
/// gap = 10
/// tick = "1s"
///
/// [dispatch]
/// destinations = ["hello", "test"]
///
/// [publish]
/// endpoint = "10.2.162.110"
/// tenant = "da"
/// user = "system"
/// password = "123456"
///
/// [notify]
/// udp = "localhost:1234"
/// ```
///
/// Durations are still strings here; [`ConfigFile`] holds the parsed form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub watch: WatchSection,

    #[serde(default)]
    pub debounce: RawDebounceSection,

    pub dispatch: RawDispatchSection,

    pub publish: RawPublishSection,

    #[serde(default)]
    pub notify: NotifySection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory whose changes are published.
    pub root: PathBuf,

    /// Also watch sub-directories of `root`.
    #[serde(default)]
    pub recursive: bool,

    /// Glob patterns; events for matching paths never reach the debouncer.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// `[debounce]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDebounceSection {
    /// Number of quiet ticks before a batch is emitted.
    #[serde(default = "default_gap")]
    pub gap: u64,

    #[serde(default = "default_tick")]
    pub tick: String,
}

impl Default for RawDebounceSection {
    fn default() -> Self {
        Self {
            gap: default_gap(),
            tick: default_tick(),
        }
    }
}

fn default_gap() -> u64 {
    10
}

fn default_tick() -> String {
    "1s".to_string()
}

/// `[dispatch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDispatchSection {
    /// Remote containers, alternated between batches.
    pub destinations: Vec<String>,

    #[serde(default = "default_phase_delay")]
    pub pre_upload_delay: String,

    #[serde(default = "default_phase_delay")]
    pub post_upload_delay: String,

    #[serde(default = "default_tail_delay")]
    pub tail_delay: String,

    /// Emit `upload-error` for every failed file instead of once per batch.
    #[serde(default)]
    pub notify_per_file_failure: bool,
}

fn default_phase_delay() -> String {
    "2s".to_string()
}

fn default_tail_delay() -> String {
    "5s".to_string()
}

/// `[publish]` section: how to invoke the external publish command.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPublishSection {
    #[serde(default = "default_program")]
    pub program: String,

    pub endpoint: String,
    pub tenant: String,
    pub user: String,
    pub password: String,

    /// Tag attached to every uploaded object (`--xdata`).
    #[serde(default = "default_metadata")]
    pub metadata: String,

    #[serde(default = "default_command_timeout")]
    pub timeout: String,
}

fn default_program() -> String {
    "dacli".to_string()
}

fn default_metadata() -> String {
    "use=demo".to_string()
}

fn default_command_timeout() -> String {
    "5m".to_string()
}

/// `[notify]` section. Both transports are optional and may be combined.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct NotifySection {
    #[serde(default)]
    pub udp: Option<String>,

    #[serde(default)]
    pub tcp: Option<String>,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on a non-empty destination list and parsed durations.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub debounce: DebounceSettings,
    pub dispatch: DispatchSettings,
    pub publish: PublishSettings,
    pub notify: NotifySection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceSettings {
    pub gap: u64,
    pub tick: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    pub destinations: Vec<String>,
    pub pre_upload_delay: Duration,
    pub post_upload_delay: Duration,
    pub tail_delay: Duration,
    pub notify_per_file_failure: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub program: String,
    pub endpoint: String,
    pub tenant: String,
    pub user: String,
    pub password: String,
    pub metadata: String,
    pub timeout: Duration,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        watch: WatchSection,
        debounce: DebounceSettings,
        dispatch: DispatchSettings,
        publish: PublishSettings,
        notify: NotifySection,
    ) -> Self {
        Self {
            watch,
            debounce,
            dispatch,
            publish,
            notify,
        }
    }
}
