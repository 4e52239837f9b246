// src/engine/activity.rs

//! Activity signal shared between the watcher and the dispatcher.
//!
//! The watcher records every change event on an [`ActivityMonitor`]; the
//! dispatcher takes an [`ActivityMark`] before its tail wait and asks the
//! [`ActivityProbe`] afterwards whether anything happened in between. The
//! value is a generation counter behind a `tokio::sync::watch` channel, so the
//! read is synchronized and no event between mark and check can be missed.

use tokio::sync::watch;

/// Create a connected monitor/probe pair.
pub fn activity_channel() -> (ActivityMonitor, ActivityProbe) {
    let (tx, rx) = watch::channel(0u64);
    (ActivityMonitor { tx }, ActivityProbe { rx })
}

/// Write side, owned by the watcher runtime.
#[derive(Debug)]
pub struct ActivityMonitor {
    tx: watch::Sender<u64>,
}

impl ActivityMonitor {
    pub fn record(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }
}

/// Opaque snapshot of the activity generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityMark(u64);

/// Read side, owned by the dispatcher.
#[derive(Debug, Clone)]
pub struct ActivityProbe {
    rx: watch::Receiver<u64>,
}

impl ActivityProbe {
    pub fn mark(&self) -> ActivityMark {
        ActivityMark(*self.rx.borrow())
    }

    /// True if any activity was recorded after `mark` was taken.
    pub fn changed_since(&self, mark: ActivityMark) -> bool {
        *self.rx.borrow() != mark.0
    }
}
