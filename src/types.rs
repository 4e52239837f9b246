// src/types.rs

//! Contracts shared between the watcher/debouncer and the dispatcher.

use std::fmt;
use std::str::FromStr;

/// Kind of filesystem change, already reduced from the raw `notify` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Removed,
    MetadataChanged,
}

/// A single change observed under the watch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn created(path: impl Into<String>) -> Self {
        Self::new(path, ChangeKind::Created)
    }

    pub fn removed(path: impl Into<String>) -> Self {
        Self::new(path, ChangeKind::Removed)
    }

    pub fn metadata_changed(path: impl Into<String>) -> Self {
        Self::new(path, ChangeKind::MetadataChanged)
    }
}

/// Per-file state inside one debounce cycle.
///
/// `Absent` entries are kept in the pending map (so a later tick still sees
/// activity for the cycle) but never make it into a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStatus {
    Absent,
    Created,
    Settled,
}

impl From<ChangeKind> for PendingStatus {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Created => PendingStatus::Created,
            ChangeKind::Removed => PendingStatus::Absent,
            ChangeKind::MetadataChanged => PendingStatus::Settled,
        }
    }
}

/// Batch priority. Only the default level is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    #[default]
    Normal,
}

/// Files accumulated during one debounce cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    pub priority: Priority,
    pub files: Vec<String>,
}

impl Batch {
    pub fn new(files: Vec<String>) -> Self {
        Self {
            priority: Priority::default(),
            files,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Status codes sent to the notification sink, one per phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    WaitStart,
    StreamStart,
    StreamDone,
    UploadStart,
    UploadDone,
    UploadError,
    SyncStart,
    SyncDone,
    SyncError,
    TailStart,
    TailEnd,
    SystemError,
}

impl StatusCode {
    pub const ALL: [StatusCode; 12] = [
        StatusCode::WaitStart,
        StatusCode::StreamStart,
        StatusCode::StreamDone,
        StatusCode::UploadStart,
        StatusCode::UploadDone,
        StatusCode::UploadError,
        StatusCode::SyncStart,
        StatusCode::SyncDone,
        StatusCode::SyncError,
        StatusCode::TailStart,
        StatusCode::TailEnd,
        StatusCode::SystemError,
    ];

    /// Wire representation of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCode::WaitStart => "wait-start",
            StatusCode::StreamStart => "stream-start",
            StatusCode::StreamDone => "stream-done",
            StatusCode::UploadStart => "upload-start",
            StatusCode::UploadDone => "upload-done",
            StatusCode::UploadError => "upload-error",
            StatusCode::SyncStart => "sync-start",
            StatusCode::SyncDone => "sync-done",
            StatusCode::SyncError => "sync-error",
            StatusCode::TailStart => "tail-start",
            StatusCode::TailEnd => "tail-end",
            StatusCode::SystemError => "system-error",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        StatusCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == wanted)
            .ok_or_else(|| format!("unknown status code: {wanted}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_parse_from_their_wire_form() {
        for code in StatusCode::ALL {
            assert_eq!(code.as_str().parse::<StatusCode>(), Ok(code));
        }
        assert_eq!(" Sync-Error ".parse::<StatusCode>(), Ok(StatusCode::SyncError));
        assert!("hello".parse::<StatusCode>().is_err());
    }

    #[test]
    fn removal_maps_to_absent() {
        assert_eq!(PendingStatus::from(ChangeKind::Removed), PendingStatus::Absent);
        assert_eq!(PendingStatus::from(ChangeKind::Created), PendingStatus::Created);
        assert_eq!(
            PendingStatus::from(ChangeKind::MetadataChanged),
            PendingStatus::Settled
        );
    }
}
