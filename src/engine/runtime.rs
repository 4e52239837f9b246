// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::status::{emit, Notifier};
use crate::types::Batch;

use super::activity::ActivityMonitor;
use super::debounce::{DebounceCommand, DebounceStep, Debouncer};
use super::shutdown::ShutdownSignal;
use super::WatchEvent;

/// Async shell around the [`Debouncer`].
///
/// Suspends on the next of {watch event, tick, shutdown}, feeds it into the
/// debouncer and executes the resulting commands. Handing a batch to the
/// dispatcher may block this loop until the dispatcher is ready again; that
/// is the only backpressure in the system.
pub struct WatchRuntime<N: Notifier> {
    debouncer: Debouncer,
    tick: Duration,
    events_rx: mpsc::UnboundedReceiver<WatchEvent>,
    batch_tx: mpsc::Sender<Batch>,
    notifier: N,
    activity: ActivityMonitor,
    shutdown: ShutdownSignal,
}

impl<N: Notifier> fmt::Debug for WatchRuntime<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRuntime")
            .field("debouncer", &self.debouncer)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl<N: Notifier> WatchRuntime<N> {
    pub fn new(
        debouncer: Debouncer,
        tick: Duration,
        events_rx: mpsc::UnboundedReceiver<WatchEvent>,
        batch_tx: mpsc::Sender<Batch>,
        notifier: N,
        activity: ActivityMonitor,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            debouncer,
            tick,
            events_rx,
            batch_tx,
            notifier,
            activity,
            shutdown,
        }
    }

    /// Main event loop. Returns on shutdown, when the event source closes, or
    /// when the dispatcher has gone away.
    pub async fn run(mut self) -> Result<()> {
        info!(
            gap = self.debouncer.gap(),
            tick = ?self.tick,
            "debounce runtime started"
        );

        let mut ticker = interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let step = tokio::select! {
                biased;

                _ = self.shutdown.triggered() => {
                    info!("shutdown requested; stopping debounce runtime");
                    break;
                }

                event = self.events_rx.recv() => match event {
                    Some(WatchEvent::Changed(change)) => {
                        debug!(file = %change.path, kind = ?change.kind, "change event");
                        self.activity.record();
                        self.debouncer.on_change(change)
                    }
                    Some(WatchEvent::Failed(error)) => self.debouncer.on_error(&error),
                    None => {
                        info!("watch event source closed; stopping debounce runtime");
                        break;
                    }
                },

                _ = ticker.tick() => self.debouncer.on_tick(),
            };

            if !self.execute(step).await {
                break;
            }
        }

        info!("debounce runtime exiting");
        Ok(())
    }

    /// Execute commands from one step. Returns `false` if the loop should stop.
    async fn execute(&mut self, step: DebounceStep) -> bool {
        for command in step.commands {
            match command {
                DebounceCommand::Notify(code) => emit(&self.notifier, code).await,
                DebounceCommand::Dispatch(batch) => {
                    if !self.hand_off(batch).await {
                        return false;
                    }
                }
            }
        }
        true
    }

    async fn hand_off(&mut self, batch: Batch) -> bool {
        info!(files = batch.len(), "handing batch to dispatcher");

        tokio::select! {
            res = self.batch_tx.send(batch) => match res {
                Ok(()) => true,
                Err(err) => {
                    warn!(files = err.0.len(), "dispatcher is gone; dropping batch");
                    false
                }
            },
            _ = self.shutdown.triggered() => {
                info!("shutdown requested while waiting for the dispatcher");
                false
            }
        }
    }
}
