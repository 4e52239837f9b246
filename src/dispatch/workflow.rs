// src/dispatch/workflow.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::DispatchSettings;
use crate::engine::{ActivityProbe, ShutdownSignal};
use crate::errors::Result;
use crate::exec::PublishBackend;
use crate::status::{emit, Notifier};
use crate::types::{Batch, StatusCode};

use super::selector::DestinationSelector;

/// What happened to one batch. Returned for logging and tests; batches are
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub destination: String,
    pub uploaded: usize,
    pub failed: Vec<String>,
    pub synced: bool,
    /// `false` when activity during the tail wait suppressed `tail-end`.
    pub returned_idle: bool,
}

/// Drives each batch through the publish workflow:
///
/// 1. select destination
/// 2. `upload-start`, pre-upload delay
/// 3. upload every file (failures are logged, the loop continues)
/// 4. post-upload delay, `upload-done`
/// 5. `sync-start`, synchronize, then `sync-done` or `sync-error`
/// 6. `tail-start`, tail delay, then `tail-end` + `wait-start` unless new
///    activity started meanwhile
///
/// One batch at a time; a shutdown only takes effect between batches.
pub struct Dispatcher<P: PublishBackend, N: Notifier> {
    settings: DispatchSettings,
    selector: DestinationSelector,
    backend: P,
    notifier: N,
    activity: ActivityProbe,
}

impl<P: PublishBackend, N: Notifier> fmt::Debug for Dispatcher<P, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("settings", &self.settings)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl<P: PublishBackend, N: Notifier> Dispatcher<P, N> {
    pub fn new(
        settings: DispatchSettings,
        backend: P,
        notifier: N,
        activity: ActivityProbe,
    ) -> Result<Self> {
        let selector = DestinationSelector::new(settings.destinations.clone())?;
        Ok(Self {
            settings,
            selector,
            backend,
            notifier,
            activity,
        })
    }

    pub fn last_destination(&self) -> Option<&str> {
        self.selector.last()
    }

    /// Consume batches until shutdown or until the sending side is dropped.
    pub async fn run(
        mut self,
        mut batch_rx: mpsc::Receiver<Batch>,
        mut shutdown: ShutdownSignal,
    ) -> Result<()> {
        info!(
            destinations = ?self.selector.destinations(),
            "dispatcher started"
        );

        loop {
            let batch = tokio::select! {
                biased;

                _ = shutdown.triggered() => {
                    info!("shutdown requested; stopping dispatcher");
                    break;
                }

                batch = batch_rx.recv() => match batch {
                    Some(batch) => batch,
                    None => {
                        info!("batch channel closed; stopping dispatcher");
                        break;
                    }
                },
            };

            let report = self.process_batch(batch).await;
            info!(
                destination = %report.destination,
                uploaded = report.uploaded,
                failed = report.failed.len(),
                synced = report.synced,
                "batch finished"
            );
        }

        info!("dispatcher exiting");
        Ok(())
    }

    /// Run one batch through every phase. Never fails: errors become
    /// notifications and log lines.
    pub async fn process_batch(&mut self, batch: Batch) -> CycleReport {
        let destination = self.selector.select().to_string();
        info!(
            destination = %destination,
            files = batch.len(),
            priority = ?batch.priority,
            "dispatching batch"
        );

        let failed = self.upload_phase(&batch, &destination).await;
        let synced = self.sync_phase(&destination).await;
        let returned_idle = self.tail_phase().await;

        CycleReport {
            uploaded: batch.len() - failed.len(),
            destination,
            failed,
            synced,
            returned_idle,
        }
    }

    async fn upload_phase(&self, batch: &Batch, destination: &str) -> Vec<String> {
        emit(&self.notifier, StatusCode::UploadStart).await;
        sleep(self.settings.pre_upload_delay).await;

        let mut failed = Vec::new();
        for file in batch.files.iter() {
            match self.backend.upload(file, destination).await {
                Ok(()) => debug!(file = %file, destination = %destination, "uploaded"),
                Err(err) => {
                    error!(
                        file = %file,
                        destination = %destination,
                        error = %err,
                        "upload failed; continuing with next file"
                    );
                    if self.settings.notify_per_file_failure {
                        emit(&self.notifier, StatusCode::UploadError).await;
                    }
                    failed.push(file.clone());
                }
            }
        }

        if !failed.is_empty() && !self.settings.notify_per_file_failure {
            emit(&self.notifier, StatusCode::UploadError).await;
        }

        sleep(self.settings.post_upload_delay).await;
        emit(&self.notifier, StatusCode::UploadDone).await;

        failed
    }

    async fn sync_phase(&self, destination: &str) -> bool {
        emit(&self.notifier, StatusCode::SyncStart).await;

        match self.backend.synchronize(destination).await {
            Ok(()) => {
                emit(&self.notifier, StatusCode::SyncDone).await;
                true
            }
            Err(err) => {
                error!(destination = %destination, error = %err, "synchronize failed");
                emit(&self.notifier, StatusCode::SyncError).await;
                false
            }
        }
    }

    async fn tail_phase(&self) -> bool {
        // Mark first: activity while tail-start is in flight must count.
        let mark = self.activity.mark();
        emit(&self.notifier, StatusCode::TailStart).await;

        sleep(self.settings.tail_delay).await;

        if self.activity.changed_since(mark) {
            warn!("new file activity during tail wait; not reporting idle");
            return false;
        }

        emit(&self.notifier, StatusCode::TailEnd).await;
        emit(&self.notifier, StatusCode::WaitStart).await;
        true
    }
}
