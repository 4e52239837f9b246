// src/exec/backend.rs

//! Pluggable publish backend abstraction.
//!
//! The dispatcher talks to a `PublishBackend` instead of spawning processes
//! itself. Production uses [`CommandPublisher`](super::CommandPublisher);
//! tests provide a fake that records calls and fails on demand.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

/// Future returned by backend operations.
pub type PublishFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// The two remote operations the workflow needs.
pub trait PublishBackend: Send + Sync {
    /// Upload one file into `destination`.
    fn upload<'a>(&'a self, file: &'a str, destination: &'a str) -> PublishFuture<'a>;

    /// Synchronize `destination` after a batch of uploads.
    fn synchronize<'a>(&'a self, destination: &'a str) -> PublishFuture<'a>;
}
