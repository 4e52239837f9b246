// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharepushError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Invalid exclude pattern: {0}")]
    PatternError(#[from] globset::Error),

    #[error("Command '{program}' exited with code {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("Command '{program}' timed out after {timeout:?}")]
    CommandTimedOut { program: String, timeout: Duration },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SharepushError>;
