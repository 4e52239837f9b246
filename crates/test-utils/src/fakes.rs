use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use sharepush::errors::{Result, SharepushError};
use sharepush::exec::{PublishBackend, PublishFuture};
use sharepush::status::Notifier;
use sharepush::types::StatusCode;

/// A notifier that records every status code in emission order.
///
/// Clones share the same log, so a test can keep one clone and hand the
/// other to the component under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<StatusCode>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codes(&self) -> Vec<StatusCode> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.sent.lock().unwrap().push(code);
        Box::pin(async { Ok(()) })
    }
}

/// One recorded call on the fake publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishCall {
    Upload { file: String, destination: String },
    Sync { destination: String },
}

/// A publish backend that records calls and fails on demand.
#[derive(Debug, Clone, Default)]
pub struct FakePublisher {
    calls: Arc<Mutex<Vec<PublishCall>>>,
    failing_files: Arc<Mutex<HashSet<String>>>,
    failing_sync: Arc<Mutex<bool>>,
}

impl FakePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads of `file` fail.
    pub fn fail_upload_of(&self, file: &str) {
        self.failing_files.lock().unwrap().insert(file.to_string());
    }

    /// Make every synchronize call fail (or succeed again).
    pub fn fail_sync(&self, fail: bool) {
        *self.failing_sync.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Destinations passed to `synchronize`, in call order.
    pub fn synced_destinations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PublishCall::Sync { destination } => Some(destination),
                PublishCall::Upload { .. } => None,
            })
            .collect()
    }

    /// Files passed to `upload`, in call order.
    pub fn uploaded_files(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PublishCall::Upload { file, .. } => Some(file),
                PublishCall::Sync { .. } => None,
            })
            .collect()
    }
}

fn fake_failure(program: &str) -> SharepushError {
    SharepushError::CommandFailed {
        program: program.to_string(),
        code: 1,
    }
}

impl PublishBackend for FakePublisher {
    fn upload<'a>(&'a self, file: &'a str, destination: &'a str) -> PublishFuture<'a> {
        self.calls.lock().unwrap().push(PublishCall::Upload {
            file: file.to_string(),
            destination: destination.to_string(),
        });
        let fail = self.failing_files.lock().unwrap().contains(file);
        Box::pin(async move {
            if fail {
                Err(fake_failure("fake-upload"))
            } else {
                Ok(())
            }
        })
    }

    fn synchronize<'a>(&'a self, destination: &'a str) -> PublishFuture<'a> {
        self.calls.lock().unwrap().push(PublishCall::Sync {
            destination: destination.to_string(),
        });
        let fail = *self.failing_sync.lock().unwrap();
        Box::pin(async move {
            if fail {
                Err(fake_failure("fake-sync"))
            } else {
                Ok(())
            }
        })
    }
}
