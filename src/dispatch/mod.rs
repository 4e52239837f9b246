// src/dispatch/mod.rs

//! Batch dispatcher.
//!
//! Receives one [`Batch`](crate::types::Batch) at a time from the debounce
//! runtime, picks a destination container ([`selector`]) and runs the
//! upload / synchronize / tail workflow ([`workflow`]), reporting progress
//! through the status notifier.

pub mod selector;
pub mod workflow;

pub use selector::DestinationSelector;
pub use workflow::{CycleReport, Dispatcher};
