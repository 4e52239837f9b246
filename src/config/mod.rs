// src/config/mod.rs

//! Configuration loading and validation for sharepush.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Parse durations and check invariants (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{
    load_and_validate, load_from_path, load_from_str, DEFAULT_CONFIG_PATH,
    DEFAULT_CONFIG_TOML,
};
pub use model::{
    ConfigFile, DebounceSettings, DispatchSettings, NotifySection, PublishSettings,
    RawConfigFile, RawDebounceSection, RawDispatchSection, RawPublishSection, WatchSection,
};
