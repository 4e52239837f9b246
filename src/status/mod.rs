// src/status/mod.rs

//! Status-notification sink.
//!
//! Workflow code only talks to the [`Notifier`] trait ("send code C"). The
//! transports are best-effort and connectionless from the caller's point of
//! view: nothing is read back, and failures are logged by [`emit`] rather
//! than propagated.
//!
//! - [`udp`] sends one datagram per code (the primary transport).
//! - [`tcp`] opens a short-lived connection per code.
//! - [`FanoutNotifier`] forwards to several transports.
//! - [`LogNotifier`] only logs; used when no endpoint is configured.

pub mod tcp;
pub mod udp;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::NotifySection;
use crate::errors::Result;
use crate::types::StatusCode;

pub use tcp::TcpNotifier;
pub use udp::UdpNotifier;

/// Capability to send a single status code somewhere.
pub trait Notifier: Send + Sync {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        (**self).notify(code)
    }
}

/// Send `code`, logging (not returning) any transport failure.
pub async fn emit<N: Notifier + ?Sized>(notifier: &N, code: StatusCode) {
    if let Err(err) = notifier.notify(code).await {
        warn!(code = %code, error = %err, "failed to send status notification");
    }
}

/// Notifier that only writes the code to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(code = %code, "status");
            Ok(())
        })
    }
}

/// Forwards every code to all inner notifiers.
///
/// Every transport is attempted; the last failure (if any) is returned.
pub struct FanoutNotifier {
    targets: Vec<Box<dyn Notifier>>,
}

impl std::fmt::Debug for FanoutNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutNotifier")
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl FanoutNotifier {
    pub fn new(targets: Vec<Box<dyn Notifier>>) -> Self {
        Self { targets }
    }
}

impl Notifier for FanoutNotifier {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let mut last_err = None;
            for target in self.targets.iter() {
                if let Err(err) = target.notify(code).await {
                    warn!(code = %code, error = %err, "notification transport failed");
                    last_err = Some(err);
                }
            }
            match last_err {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }
}

/// Build the notifier described by `[notify]`.
pub fn build_notifier(section: &NotifySection) -> Arc<dyn Notifier> {
    let mut targets = transports(section);

    match targets.len() {
        0 => {
            info!("no notification endpoint configured; status codes are only logged");
            Arc::new(LogNotifier)
        }
        1 => Arc::from(targets.remove(0)),
        _ => Arc::new(FanoutNotifier::new(targets)),
    }
}

fn transports(section: &NotifySection) -> Vec<Box<dyn Notifier>> {
    let mut targets: Vec<Box<dyn Notifier>> = Vec::new();

    if let Some(ref addr) = section.udp {
        info!(addr = %addr, "sending status notifications via udp");
        targets.push(Box::new(UdpNotifier::new(addr.clone())));
    }
    if let Some(ref addr) = section.tcp {
        info!(addr = %addr, "sending status notifications via tcp");
        targets.push(Box::new(TcpNotifier::new(addr.clone())));
    }

    targets
}
