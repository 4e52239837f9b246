// src/status/udp.rs

use std::future::Future;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::pin::Pin;

use anyhow::{anyhow, Context};
use tokio::net::{lookup_host, UdpSocket};
use tracing::debug;

use crate::errors::Result;
use crate::status::Notifier;
use crate::types::StatusCode;

/// Sends each status code as a single UDP datagram.
///
/// A fresh socket is bound per send; nothing is ever read back.
#[derive(Debug, Clone)]
pub struct UdpNotifier {
    addr: String,
}

impl UdpNotifier {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    async fn send(&self, code: StatusCode) -> Result<()> {
        let target = lookup_host(self.addr.as_str())
            .await
            .with_context(|| format!("resolving udp notify address '{}'", self.addr))?
            .next()
            .ok_or_else(|| anyhow!("udp notify address '{}' resolved to nothing", self.addr))?;

        let local: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await?;
        socket.send_to(code.as_str().as_bytes(), target).await?;
        debug!(code = %code, %target, "status sent via udp");
        Ok(())
    }
}

impl Notifier for UdpNotifier {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.send(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn datagram_carries_the_status_code() {
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let notifier = UdpNotifier::new(addr.to_string());
        notifier.notify(StatusCode::SyncDone).await.unwrap();

        let mut buf = [0u8; 64];
        let (n, _) = listener.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"sync-done");
    }
}
