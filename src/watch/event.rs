// src/watch/event.rs

//! Reduction of raw `notify` events to [`ChangeEvent`]s.

use notify::event::{AccessKind, AccessMode, ModifyKind, RenameMode};
use notify::{Event, EventKind};

use crate::types::{ChangeEvent, ChangeKind};

/// Map one `notify` event to zero or more change events.
///
/// - creation → `Created`
/// - removal → `Removed`
/// - metadata change, or a file closed after writing → `MetadataChanged`
/// - rename: the old name is `Removed`, the new name is `Created`
///
/// Plain data writes and reads are ignored; a file only becomes "settled"
/// through its metadata or close events.
pub fn classify(event: &Event) -> Vec<ChangeEvent> {
    let to_events = |kind: ChangeKind| -> Vec<ChangeEvent> {
        event
            .paths
            .iter()
            .map(|p| ChangeEvent::new(p.to_string_lossy().into_owned(), kind))
            .collect()
    };

    match event.kind {
        EventKind::Create(_) => to_events(ChangeKind::Created),
        EventKind::Remove(_) => to_events(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Metadata(_)) => to_events(ChangeKind::MetadataChanged),
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            to_events(ChangeKind::MetadataChanged)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => to_events(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => to_events(ChangeKind::Created),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut out = Vec::new();
            if let Some(from) = event.paths.first() {
                out.push(ChangeEvent::removed(from.to_string_lossy().into_owned()));
            }
            if let Some(to) = event.paths.get(1) {
                out.push(ChangeEvent::created(to.to_string_lossy().into_owned()));
            }
            out
        }
        _ => Vec::new(),
    }
}
