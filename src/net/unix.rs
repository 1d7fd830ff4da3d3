//! Unix domain socket connector for the backend client.
//!
//! # Responsibilities
//! - Dial the configured socket for every new pooled connection
//! - Enforce the dial timeout
//! - Adapt `tokio::net::UnixStream` to hyper's I/O traits
//!
//! # Design Decisions
//! - The destination URI handed in by the client is ignored; the socket path
//!   is fixed at construction so no request can redirect the dial

use std::fmt;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::http::Uri;
use hyper::rt::{Read, ReadBufCursor, Write};
use hyper_util::client::legacy::connect::{Connected, Connection};
use hyper_util::rt::TokioIo;
use tokio::net::UnixStream;
use tower::Service;

/// Connector that always dials the same Unix socket.
#[derive(Debug, Clone)]
pub struct UnixConnector {
    socket_path: Arc<PathBuf>,
    dial_timeout: Duration,
}

impl UnixConnector {
    pub fn new(socket_path: impl Into<PathBuf>, dial_timeout: Duration) -> Self {
        Self {
            socket_path: Arc::new(socket_path.into()),
            dial_timeout,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    async fn dial(socket_path: Arc<PathBuf>, dial_timeout: Duration) -> io::Result<UnixSocketStream> {
        let connect = UnixStream::connect(socket_path.as_path());
        let stream = within_dial_timeout(&socket_path, dial_timeout, connect).await?;

        tracing::trace!(socket = %socket_path.display(), "Backend connection established");
        Ok(UnixSocketStream::new(stream))
    }
}

async fn within_dial_timeout<F>(socket_path: &Path, dial_timeout: Duration, connect: F) -> io::Result<UnixStream>
where
    F: Future<Output = io::Result<UnixStream>>,
{
    tokio::time::timeout(dial_timeout, connect).await.map_err(|_| {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("dial {} timed out after {:?}", socket_path.display(), dial_timeout),
        )
    })?
}

impl Service<Uri> for UnixConnector {
    type Response = UnixSocketStream;
    type Error = io::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _destination: Uri) -> Self::Future {
        Box::pin(Self::dial(Arc::clone(&self.socket_path), self.dial_timeout))
    }
}

/// A connected backend socket usable by hyper.
pub struct UnixSocketStream {
    io: TokioIo<UnixStream>,
}

impl UnixSocketStream {
    fn new(stream: UnixStream) -> Self {
        Self {
            io: TokioIo::new(stream),
        }
    }
}

impl fmt::Debug for UnixSocketStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnixSocketStream").finish_non_exhaustive()
    }
}

impl Connection for UnixSocketStream {
    fn connected(&self) -> Connected {
        Connected::new()
    }
}

impl Read for UnixSocketStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: ReadBufCursor<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().io).poll_read(cx, buf)
    }
}

impl Write for UnixSocketStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().io).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().io).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().io).poll_shutdown(cx)
    }

    fn is_write_vectored(&self) -> bool {
        self.io.is_write_vectored()
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().io).poll_write_vectored(cx, bufs)
    }
}
