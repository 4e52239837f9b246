// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the watch
//!   root.
//! - Reducing raw events to created / removed / metadata-changed.
//! - Dropping events for paths matching `[watch].exclude`.
//!
//! It does **not** debounce; that is the engine's job.

pub mod event;
pub mod filter;
pub mod watcher;

pub use event::classify;
pub use filter::ExcludeFilter;
pub use watcher::{spawn_watcher, WatcherHandle};
