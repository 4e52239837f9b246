// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::WatchSection;
use crate::engine::WatchEvent;
use crate::errors::Result;
use crate::watch::event::classify;
use crate::watch::filter::ExcludeFilter;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// releases the subscription and closes the event channel.
pub struct WatcherHandle {
    root: PathBuf,
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish()
    }
}

/// Subscribe to changes under `[watch].root` and forward them as
/// [`WatchEvent`]s.
///
/// Failing to set up the subscription is returned as an error: the debouncer
/// has nothing to do without its event source. Errors reported later by the
/// watch are forwarded as `WatchEvent::Failed` and are not fatal.
pub fn spawn_watcher(
    section: &WatchSection,
    events_tx: mpsc::UnboundedSender<WatchEvent>,
) -> Result<WatcherHandle> {
    let root = section
        .root
        .canonicalize()
        .unwrap_or_else(|_| section.root.clone());

    let filter = ExcludeFilter::new(root.clone(), &section.exclude)?;

    // Called synchronously on notify's own thread.
    let handler = move |res: notify::Result<Event>| {
        let events: Vec<WatchEvent> = match res {
            Ok(event) => classify(&event)
                .into_iter()
                .filter(|change| !filter.is_excluded(Path::new(&change.path)))
                .map(WatchEvent::Changed)
                .collect(),
            Err(err) => vec![WatchEvent::Failed(err.to_string())],
        };

        for event in events {
            if let Err(err) = events_tx.send(event) {
                // We can't log via tracing here easily, so fallback to stderr.
                eprintln!("sharepush: failed to forward watch event: {err}");
                return;
            }
        }
    };

    let mut watcher = RecommendedWatcher::new(handler, Config::default())?;

    let mode = if section.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&root, mode)?;

    info!(root = ?root, recursive = section.recursive, "file watcher started");

    Ok(WatcherHandle {
        root,
        _inner: watcher,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;
    use crate::types::ChangeKind;

    fn section(root: PathBuf, exclude: &[&str]) -> WatchSection {
        WatchSection {
            root,
            recursive: false,
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn missing_root_fails_at_startup() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let res = spawn_watcher(&section(PathBuf::from("/definitely/not/here"), &[]), tx);
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn created_file_is_forwarded_and_excluded_file_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = spawn_watcher(&section(dir.path().to_path_buf(), &["*.tmp"]), tx).unwrap();

        std::fs::write(dir.path().join("skip.tmp"), b"x").unwrap();
        std::fs::write(dir.path().join("keep.txt"), b"x").unwrap();

        let found = timeout(Duration::from_secs(5), async {
            while let Some(event) = rx.recv().await {
                if let WatchEvent::Changed(change) = event {
                    assert!(!change.path.ends_with("skip.tmp"));
                    if change.path.ends_with("keep.txt") && change.kind == ChangeKind::Created {
                        return true;
                    }
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        assert!(found, "expected a Created event for keep.txt");
    }
}
