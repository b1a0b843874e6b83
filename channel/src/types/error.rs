//! Error types for the MATFEAP channel.

use std::io;

use thiserror::Error;

/// Errors raised by a [`Channel`](crate::Channel) and its transports.
#[derive(Debug, Error)]
pub enum Error {
    /// The TCP or UNIX-domain connection could not be established.
    #[error("Failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The server process could not be launched.
    #[error("Failed to spawn `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The stream ended early, the peer went away, or the channel was closed.
    #[error("Stream closed: {0}")]
    StreamClosed(String),

    /// Any other transport failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Endpoint configuration could not be understood.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Classify a read failure. Running out of bytes is a closed stream.
    pub(crate) fn on_read(err: io::Error, what: &str) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => {
                Error::StreamClosed(format!("end of stream while reading {}", what))
            }
            _ => Error::Io(err),
        }
    }

    /// Classify a write failure. A severed pipe or socket is a closed stream.
    pub(crate) fn on_write(err: io::Error, what: &str) -> Self {
        match err.kind() {
            io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected | io::ErrorKind::WriteZero => {
                Error::StreamClosed(format!("peer went away while writing {}: {}", what, err))
            }
            _ => Error::Io(err),
        }
    }

    /// True for [`Error::StreamClosed`].
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, Error::StreamClosed(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
