//! Duplex channel to a FEAP server.

use tracing::{debug, info, warn};

use crate::internal::transport::{self, Connected, Link, SubprocessTransport};
use crate::types::{Endpoint, Error, Result, TransportKind};

/// A duplex byte channel to one FEAP server.
///
/// Carries two sub-protocols over the same stream, chosen by the caller's
/// convention: newline-terminated text lines and big-endian fixed-width
/// numeric arrays with out-of-band counts.
///
/// Every operation takes `&mut self` and completes one whole request before
/// returning. Writes are flushed before they return so the server sees a
/// request before we wait on its reply.
///
/// # Example
///
/// ```rust,no_run
/// use matfeap_channel::Channel;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut channel = Channel::connect_tcp("localhost", 3490).await?;
///
///     channel.send("param").await?;
///     let reply = channel.read_line().await?;
///     println!("server said: {}", reply);
///
///     channel.write_float_array(&[1.0, 2.0, 3.0]).await?;
///     let ids = channel.read_int_array(3).await?;
///     println!("ids: {:?}", ids);
///
///     channel.close().await?;
///     Ok(())
/// }
/// ```
pub struct Channel {
    kind: TransportKind,
    inner: Option<Connected>,
}

impl Channel {
    /// Connect to a server listening on a TCP port.
    ///
    /// # Errors
    /// [`Error::Connection`] if the host does not resolve or the connection is refused.
    pub async fn connect_tcp(host: &str, port: u16) -> Result<Self> {
        Ok(Self::from_connected(transport::socket::connect_tcp(host, port).await?))
    }

    /// Connect to a server listening on a UNIX-domain socket.
    ///
    /// # Errors
    /// [`Error::Connection`] if nothing is listening at `path`.
    #[cfg(unix)]
    pub async fn connect_unix(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::from_connected(transport::socket::connect_unix(path.as_ref()).await?))
    }

    /// Launch `command_line` and talk to it over its stdin and stdout.
    ///
    /// # Errors
    /// [`Error::Spawn`] if the command line is empty, its program cannot be
    /// found, or the process fails to start.
    pub async fn spawn(command_line: &str) -> Result<Self> {
        let mut subprocess = SubprocessTransport::new(command_line)?;
        subprocess.connect()?;
        Ok(Self::from_connected(subprocess.split()?))
    }

    /// Open whichever transport `endpoint` describes.
    pub async fn open(endpoint: &Endpoint) -> Result<Self> {
        match endpoint {
            Endpoint::Tcp { host, port } => Self::connect_tcp(host, *port).await,
            #[cfg(unix)]
            Endpoint::Unix { path } => Self::connect_unix(path).await,
            #[cfg(not(unix))]
            Endpoint::Unix { path } => Err(Error::InvalidConfig(format!(
                "local sockets are not supported on this platform: {}",
                path.display()
            ))),
            Endpoint::Command { command } => Self::spawn(command).await,
        }
    }

    fn from_connected(connected: Connected) -> Self {
        Self {
            kind: connected.link.kind(),
            inner: Some(connected),
        }
    }

    /// Which transport this channel was opened on.
    pub fn transport_kind(&self) -> TransportKind {
        self.kind
    }

    /// False once [`close`](Self::close) has run.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Process ID of the spawned server, for process channels that are still open.
    pub fn id(&self) -> Option<u32> {
        match self.inner.as_ref().map(|c| &c.link) {
            Some(Link::Process(handle)) => handle.id(),
            _ => None,
        }
    }

    fn connected(&mut self) -> Result<&mut Connected> {
        self.inner
            .as_mut()
            .ok_or_else(|| Error::StreamClosed("channel is closed".to_string()))
    }

    /// Read one line, without its `'\n'`.
    ///
    /// A `'\r'` before the newline is kept. The bytes are decoded as UTF-8
    /// and invalid sequences become U+FFFD. Legacy MATFEAP clients read each
    /// byte as one Latin-1 character, so a peer sending non-ASCII Latin-1
    /// text needs [`read_line_bytes`](Self::read_line_bytes) instead.
    ///
    /// # Errors
    /// [`Error::StreamClosed`] if the stream ends before a newline.
    pub async fn read_line(&mut self) -> Result<String> {
        self.connected()?.read.read_line().await
    }

    /// Read one line as raw bytes, without its `'\n'`.
    pub async fn read_line_bytes(&mut self) -> Result<Vec<u8>> {
        self.connected()?.read.read_line_bytes().await
    }

    /// Send `text` as one line.
    ///
    /// The text goes out UTF-8 encoded. Legacy clients wrote one Latin-1 byte
    /// per character; use [`send_bytes`](Self::send_bytes) to reproduce that
    /// for non-ASCII text.
    ///
    /// # Errors
    /// [`Error::StreamClosed`] if the channel is closed or the peer has gone away.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.connected()?.write.send(text).await
    }

    /// Send `bytes` followed by `'\n'`, unmodified.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.connected()?.write.send_bytes(bytes).await
    }

    /// Read exactly `count` big-endian 32-bit integers.
    ///
    /// # Errors
    /// [`Error::StreamClosed`] if the stream ends first; a short array is never returned.
    pub async fn read_int_array(&mut self, count: usize) -> Result<Vec<i32>> {
        self.connected()?.read.read_int_array(count).await
    }

    /// Read exactly `count` big-endian doubles.
    ///
    /// # Errors
    /// [`Error::StreamClosed`] if the stream ends first.
    pub async fn read_float_array(&mut self, count: usize) -> Result<Vec<f64>> {
        self.connected()?.read.read_float_array(count).await
    }

    /// Write `values` as big-endian 32-bit integers. The count is not sent.
    pub async fn write_int_array(&mut self, values: &[i32]) -> Result<()> {
        self.connected()?.write.write_int_array(values).await
    }

    /// Write doubles narrowed to 32-bit integers.
    ///
    /// This is the integer write older MATFEAP clients perform: each value is
    /// truncated toward zero, NaN becomes 0 and out-of-range values saturate.
    /// Use it when a peer expects exactly those bytes.
    pub async fn write_truncated_int_array(&mut self, values: &[f64]) -> Result<()> {
        self.connected()?.write.write_truncated_int_array(values).await
    }

    /// Write `values` as big-endian doubles. The count is not sent.
    pub async fn write_float_array(&mut self, values: &[f64]) -> Result<()> {
        self.connected()?.write.write_float_array(values).await
    }

    /// Release the transport.
    ///
    /// Shuts down the output stream, drops the input stream, then closes the
    /// socket or asks the server process to terminate (SIGTERM on unix)
    /// without waiting for it.
    /// Every step runs even if an earlier one fails; the first failure is
    /// returned. Closing an already closed channel does nothing.
    pub async fn close(&mut self) -> Result<()> {
        let Some(Connected {
            read,
            mut write,
            link,
        }) = self.inner.take()
        else {
            debug!("close() on a channel that is already closed");
            return Ok(());
        };

        let mut first_error: Option<Error> = None;
        let mut record = |err: Error| {
            if first_error.is_none() {
                first_error = Some(err);
            } else {
                warn!("Additional failure while closing channel: {}", err);
            }
        };

        if let Err(e) = write.shutdown().await {
            record(e);
        }
        drop(write);
        drop(read);

        match link {
            Link::Socket { peer, .. } => {
                info!("Closed {} channel to {}", self.kind, peer);
            }
            Link::Process(mut handle) => {
                let pid = handle.id();
                match handle.try_wait() {
                    Ok(Some(status)) => {
                        info!(?pid, %status, "FEAP server process already exited");
                    }
                    Ok(None) => match handle.terminate() {
                        Ok(()) => info!(?pid, "Requested FEAP server process termination"),
                        Err(e) => record(e),
                    },
                    Err(e) => record(e),
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for Channel {
    /// A process channel that was never closed still asks its server to stop.
    fn drop(&mut self) {
        let Some(Connected {
            link: Link::Process(handle),
            ..
        }) = self.inner.as_mut()
        else {
            return;
        };
        if let Ok(None) = handle.try_wait() {
            if let Err(e) = handle.terminate() {
                warn!("Failed to terminate FEAP server on drop: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("kind", &self.kind)
            .field("open", &self.is_open())
            .finish()
    }
}
