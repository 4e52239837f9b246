// src/engine/mod.rs

//! Debounce engine for sharepush.
//!
//! This module turns raw watch events into batches:
//! - [`debounce`] holds the pure, synchronous state machine.
//! - [`runtime`] is the async shell reacting to events, ticks and shutdown.
//! - [`activity`] exposes "did anything change lately" to the dispatcher.
//! - [`shutdown`] is the signal both long-lived units stop on.

use crate::types::ChangeEvent;

/// Capacity of the watcher -> dispatcher batch channel.
pub const HANDOFF_CAPACITY: usize = 1;

/// Events flowing from the file watcher into the debounce runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A relevant change under the watch root.
    Changed(ChangeEvent),
    /// The underlying watch reported an error; the watch itself continues.
    Failed(String),
}

pub mod activity;
pub mod debounce;
pub mod runtime;
pub mod shutdown;

pub use activity::{activity_channel, ActivityMark, ActivityMonitor, ActivityProbe};
pub use debounce::{DebounceCommand, DebounceStep, Debouncer, TICK_SAFETY_BOUND};
pub use runtime::WatchRuntime;
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
