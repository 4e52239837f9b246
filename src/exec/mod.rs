// src/exec/mod.rs

//! External publish command layer.
//!
//! - [`backend`] provides the `PublishBackend` trait the dispatcher uses.
//! - [`command`] implements it by running the configured CLI through
//!   `tokio::process::Command`, one invocation per upload and per sync.

pub mod backend;
pub mod command;

pub use backend::{PublishBackend, PublishFuture};
pub use command::CommandPublisher;
