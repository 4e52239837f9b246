// src/status/tcp.rs

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::errors::Result;
use crate::status::Notifier;
use crate::types::StatusCode;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Opens a connection per status code, writes it, and closes.
#[derive(Debug, Clone)]
pub struct TcpNotifier {
    addr: String,
}

impl TcpNotifier {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    async fn send(&self, code: StatusCode) -> Result<()> {
        let mut stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(self.addr.as_str()))
            .await
            .with_context(|| format!("connecting to tcp notify address '{}' timed out", self.addr))?
            .with_context(|| format!("connecting to tcp notify address '{}'", self.addr))?;

        stream.write_all(code.as_str().as_bytes()).await?;
        stream.shutdown().await?;
        debug!(code = %code, addr = %self.addr, "status sent via tcp");
        Ok(())
    }
}

impl Notifier for TcpNotifier {
    fn notify(&self, code: StatusCode) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.send(code))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn connection_carries_the_status_code() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let reader = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = String::new();
            socket.read_to_string(&mut buf).await.unwrap();
            buf
        });

        TcpNotifier::new(addr.to_string())
            .notify(StatusCode::TailEnd)
            .await
            .unwrap();

        assert_eq!(reader.await.unwrap(), "tail-end");
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let res = TcpNotifier::new(addr.to_string())
            .notify(StatusCode::WaitStart)
            .await;
        assert!(res.is_err());
    }
}
