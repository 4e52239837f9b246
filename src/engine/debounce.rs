// src/engine/debounce.rs

//! Pure debounce state machine.
//!
//! The [`Debouncer`] consumes change events, error events and timer ticks and
//! returns [`DebounceStep`]s describing what the IO shell
//! (`engine::runtime::WatchRuntime`) should do next: send a status code, or
//! hand a finished [`Batch`] to the dispatcher.
//!
//! It owns no channels, timers or sockets, so tests drive it one event at a
//! time.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::types::{Batch, ChangeEvent, ChangeKind, PendingStatus, StatusCode};

/// Idle tick count above which the timer is clamped back down.
pub const TICK_SAFETY_BOUND: u64 = 2000;

/// Command produced by the debouncer, executed by the IO shell in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebounceCommand {
    /// Send this status code to the notification sink.
    Notify(StatusCode),
    /// Hand this batch to the dispatcher (may block until it is accepted).
    Dispatch(Batch),
}

/// Result of feeding one input into the debouncer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebounceStep {
    pub commands: Vec<DebounceCommand>,
}

impl DebounceStep {
    fn push(&mut self, command: DebounceCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Status codes in this step, in emission order.
    pub fn notifications(&self) -> Vec<StatusCode> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DebounceCommand::Notify(code) => Some(*code),
                DebounceCommand::Dispatch(_) => None,
            })
            .collect()
    }

    /// The batch handed off in this step, if any.
    pub fn batch(&self) -> Option<&Batch> {
        self.commands.iter().find_map(|c| match c {
            DebounceCommand::Dispatch(batch) => Some(batch),
            DebounceCommand::Notify(_) => None,
        })
    }
}

/// Coalesces a noisy stream of file events into discrete batches.
///
/// A batch is emitted on the tick where the timer reaches `1 + gap`, i.e.
/// one tick after the configured quiet period, provided anything is pending.
#[derive(Debug)]
pub struct Debouncer {
    gap: u64,
    pending: HashMap<String, PendingStatus>,
    timer: u64,
    active: bool,
}

impl Debouncer {
    pub fn new(gap: u64) -> Self {
        Self {
            gap,
            pending: HashMap::new(),
            timer: 0,
            active: false,
        }
    }

    pub fn gap(&self) -> u64 {
        self.gap
    }

    /// Current value of the quiet-tick counter.
    pub fn timer(&self) -> u64 {
        self.timer
    }

    /// Whether activity was observed since the last tick.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn status_of(&self, path: &str) -> Option<PendingStatus> {
        self.pending.get(path).copied()
    }

    /// Tick value at which a batch is emitted.
    pub fn emit_threshold(&self) -> u64 {
        self.gap + 1
    }

    /// Upper bound the timer is never left above.
    ///
    /// Never below `gap + 2`, otherwise a very large gap could be clamped past
    /// its own threshold and never fire.
    pub fn safety_bound(&self) -> u64 {
        TICK_SAFETY_BOUND.max(self.gap + 2)
    }

    /// Handle a change event for a single path.
    pub fn on_change(&mut self, event: ChangeEvent) -> DebounceStep {
        let mut step = DebounceStep::default();

        if !self.active && event.kind != ChangeKind::Removed {
            step.push(DebounceCommand::Notify(StatusCode::StreamStart));
        }
        self.active = true;
        self.timer = 0;

        let status = PendingStatus::from(event.kind);
        debug!(file = %event.path, kind = ?event.kind, ?status, "pending file updated");
        self.pending.insert(event.path, status);

        step
    }

    /// Handle an error reported by the event source. Never fatal.
    pub fn on_error(&mut self, error: &str) -> DebounceStep {
        warn!(error = %error, "file watch error; restarting quiet period");

        self.timer = 0;
        self.active = false;

        DebounceStep {
            commands: vec![DebounceCommand::Notify(StatusCode::SystemError)],
        }
    }

    /// Handle one timer tick.
    pub fn on_tick(&mut self) -> DebounceStep {
        let mut step = DebounceStep::default();

        self.timer += 1;
        // Activity seen during the previous tick has been accounted for.
        self.active = false;

        if self.timer == self.emit_threshold() && !self.pending.is_empty() {
            step.push(DebounceCommand::Notify(StatusCode::StreamDone));

            let files: Vec<String> = self
                .pending
                .drain()
                .filter(|(_, status)| *status != PendingStatus::Absent)
                .map(|(path, _)| path)
                .collect();

            if files.is_empty() {
                debug!("quiet period reached but every pending file was removed");
            } else {
                debug!(files = files.len(), "quiet period reached; emitting batch");
                step.push(DebounceCommand::Dispatch(Batch::new(files)));
            }
        }

        if self.timer > self.safety_bound() {
            self.timer = self.gap + 2;
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn idle(debouncer: &mut Debouncer, ticks: u64) -> Vec<DebounceStep> {
        (0..ticks).map(|_| debouncer.on_tick()).collect()
    }

    #[test]
    fn first_event_of_a_tick_starts_the_stream() {
        let mut d = Debouncer::new(3);

        let step = d.on_change(ChangeEvent::created("a"));
        assert_eq!(step.notifications(), vec![StatusCode::StreamStart]);
        assert!(d.is_active());

        let step = d.on_change(ChangeEvent::created("b"));
        assert!(step.is_empty(), "still active within the same tick");
    }

    #[test]
    fn removal_alone_does_not_start_the_stream() {
        let mut d = Debouncer::new(3);

        let step = d.on_change(ChangeEvent::removed("ghost"));
        assert!(step.is_empty());
        assert!(d.is_active());
        assert_eq!(d.status_of("ghost"), Some(PendingStatus::Absent));
    }

    #[test]
    fn removal_first_in_a_tick_silences_stream_start_until_the_next_tick() {
        let mut d = Debouncer::new(3);

        assert!(d.on_change(ChangeEvent::removed("x")).is_empty());
        assert!(d.on_change(ChangeEvent::created("y")).is_empty());
        assert_eq!(d.status_of("y"), Some(PendingStatus::Created));

        d.on_tick();
        let step = d.on_change(ChangeEvent::created("z"));
        assert_eq!(step.notifications(), vec![StatusCode::StreamStart]);
    }

    #[test]
    fn batch_is_emitted_one_tick_after_the_gap() {
        let mut d = Debouncer::new(3);
        d.on_change(ChangeEvent::created("a"));
        d.on_change(ChangeEvent::created("b"));

        let steps = idle(&mut d, 3);
        assert!(steps.iter().all(DebounceStep::is_empty));

        let step = d.on_tick();
        assert_eq!(step.notifications(), vec![StatusCode::StreamDone]);
        let files: HashSet<_> = step.batch().unwrap().files.iter().cloned().collect();
        assert_eq!(files, HashSet::from(["a".to_string(), "b".to_string()]));
        assert_eq!(d.pending_len(), 0);
    }

    #[test]
    fn removed_files_are_dropped_but_still_close_the_cycle() {
        let mut d = Debouncer::new(1);
        d.on_change(ChangeEvent::created("a"));
        d.on_change(ChangeEvent::removed("a"));

        let steps = idle(&mut d, 2);
        assert!(steps[0].is_empty());
        assert_eq!(steps[1].notifications(), vec![StatusCode::StreamDone]);
        assert!(steps[1].batch().is_none());
        assert_eq!(d.pending_len(), 0);
    }

    #[test]
    fn errors_restart_the_quiet_period() {
        let mut d = Debouncer::new(2);
        d.on_change(ChangeEvent::metadata_changed("a"));
        idle(&mut d, 2);

        let step = d.on_error("inotify queue overflow");
        assert_eq!(step.notifications(), vec![StatusCode::SystemError]);
        assert_eq!(d.timer(), 0);
        assert!(!d.is_active());

        let steps = idle(&mut d, 3);
        assert!(steps[1].batch().is_none());
        assert_eq!(steps[2].batch().unwrap().files, vec!["a".to_string()]);
    }

    #[test]
    fn timer_is_clamped_while_idle() {
        let mut d = Debouncer::new(3);
        idle(&mut d, TICK_SAFETY_BOUND + 50);
        assert!(d.timer() <= d.safety_bound());
        assert_eq!(d.timer(), 5 + 49);
    }

    #[test]
    fn huge_gap_still_fires() {
        let gap = TICK_SAFETY_BOUND * 2;
        let mut d = Debouncer::new(gap);
        d.on_change(ChangeEvent::created("a"));

        let emitted = idle(&mut d, gap + 1)
            .into_iter()
            .filter(|s| s.batch().is_some())
            .count();
        assert_eq!(emitted, 1);
    }
}
