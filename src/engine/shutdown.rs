// src/engine/shutdown.rs

//! Process-wide shutdown signal observed by both long-lived units.

use tokio::sync::watch;

pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Cloneable receiver side. A dropped trigger counts as shutdown.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolves once shutdown has been requested. Cancel-safe.
    pub async fn triggered(&mut self) {
        // `wait_for` only errors when the trigger is gone.
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}
