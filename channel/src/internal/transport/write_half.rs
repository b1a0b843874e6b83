//! Write half of a channel.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use super::read_half::{FLOAT_WIDTH, INT_WIDTH, byte_len};
use crate::types::{Error, Result};

/// Writer over the peer's input.
///
/// Every method flushes before returning; a peer waiting on our request must
/// see all of it before we start reading its reply.
pub struct WriteHalf<W: AsyncWrite + Unpin + Send> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> WriteHalf<W> {
    /// Create a new write half from an AsyncWrite.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write `bytes` followed by a single `'\n'`.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut line = Vec::with_capacity(bytes.len() + 1);
        line.extend_from_slice(bytes);
        line.push(b'\n');
        self.write_flushed(&line, "a line").await?;
        trace!(bytes = bytes.len(), "sent line");
        Ok(())
    }

    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.send_bytes(text.as_bytes()).await
    }

    /// Write each value as a big-endian `i32`. No count goes on the wire.
    pub async fn write_int_array(&mut self, values: &[i32]) -> Result<()> {
        let mut raw = Vec::with_capacity(byte_len(values.len(), INT_WIDTH)?);
        for value in values {
            raw.extend_from_slice(&value.to_be_bytes());
        }
        self.write_flushed(&raw, "an integer array").await?;
        trace!(count = values.len(), "wrote integer array");
        Ok(())
    }

    /// Narrow each double to `i32` and write it as an integer.
    ///
    /// Truncates toward zero, saturates at the `i32` bounds and maps NaN to 0.
    pub async fn write_truncated_int_array(&mut self, values: &[f64]) -> Result<()> {
        let narrowed: Vec<i32> = values.iter().map(|&v| v as i32).collect();
        self.write_int_array(&narrowed).await
    }

    /// Write each value as a big-endian IEEE-754 double. No count goes on the wire.
    pub async fn write_float_array(&mut self, values: &[f64]) -> Result<()> {
        let mut raw = Vec::with_capacity(byte_len(values.len(), FLOAT_WIDTH)?);
        for value in values {
            raw.extend_from_slice(&value.to_be_bytes());
        }
        self.write_flushed(&raw, "a float array").await?;
        trace!(count = values.len(), "wrote float array");
        Ok(())
    }

    /// Flush what is pending and shut the stream down.
    ///
    /// For a socket this sends FIN; for a pipe it is a flush, and the pipe
    /// closes when the half is dropped.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer
            .shutdown()
            .await
            .map_err(|e| Error::on_write(e, "the shutdown"))
    }

    async fn write_flushed(&mut self, raw: &[u8], what: &str) -> Result<()> {
        self.writer
            .write_all(raw)
            .await
            .map_err(|e| Error::on_write(e, what))?;
        self.writer
            .flush()
            .await
            .map_err(|e| Error::on_write(e, what))?;
        Ok(())
    }
}
