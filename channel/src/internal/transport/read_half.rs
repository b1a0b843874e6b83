//! Read half of a channel.
//!
//! Line reads and array reads share one `BufReader`, so bytes buffered ahead
//! by a line read are still there for the array read that follows it.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tracing::trace;

use crate::types::{Error, Result};

/// Width of an integer on the wire.
pub const INT_WIDTH: usize = 4;
/// Width of a double on the wire.
pub const FLOAT_WIDTH: usize = 8;
/// Arrays are buffered at most this many bytes ahead of the data received.
const READ_CHUNK: usize = 64 * 1024;

/// Buffered reader over the peer's output.
pub struct ReadHalf<R: AsyncRead + Unpin + Send> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin + Send> ReadHalf<R> {
    /// Create a new read half from an AsyncRead.
    ///
    /// # Arguments
    ///
    /// * `reader` - socket read half or a child's stdout
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read up to and including the next `'\n'`; return the bytes before it.
    ///
    /// Running out of input before the terminator is an error even if some
    /// bytes arrived. `'\r'` is left in place.
    pub async fn read_line_bytes(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        self.reader
            .read_until(b'\n', &mut line)
            .await
            .map_err(|e| Error::on_read(e, "a line"))?;

        if line.last() != Some(&b'\n') {
            return Err(Error::StreamClosed(format!(
                "end of stream after {} bytes of an unterminated line",
                line.len()
            )));
        }
        line.pop();

        trace!(bytes = line.len(), "read line");
        Ok(line)
    }

    /// [`read_line_bytes`](Self::read_line_bytes) decoded as UTF-8, with
    /// invalid sequences replaced.
    pub async fn read_line(&mut self) -> Result<String> {
        let bytes = self.read_line_bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read `count` big-endian `i32` values.
    pub async fn read_int_array(&mut self, count: usize) -> Result<Vec<i32>> {
        let raw = self.read_exact_elements(count, INT_WIDTH, "an integer array").await?;
        Ok(decode_ints(&raw))
    }

    /// Read `count` big-endian IEEE-754 doubles.
    pub async fn read_float_array(&mut self, count: usize) -> Result<Vec<f64>> {
        let raw = self.read_exact_elements(count, FLOAT_WIDTH, "a float array").await?;
        Ok(decode_floats(&raw))
    }

    async fn read_exact_elements(&mut self, count: usize, width: usize, what: &str) -> Result<Vec<u8>> {
        let len = byte_len(count, width)?;
        let mut raw = Vec::with_capacity(len.min(READ_CHUNK));
        while raw.len() < len {
            let start = raw.len();
            raw.resize(start + (len - start).min(READ_CHUNK), 0);
            self.reader
                .read_exact(&mut raw[start..])
                .await
                .map_err(|e| Error::on_read(e, what))?;
        }
        trace!(count, bytes = len, "read {}", what);
        Ok(raw)
    }
}

/// Total wire size of `count` elements of `width` bytes.
///
/// Fails when no buffer of that size could exist.
pub(crate) fn byte_len(count: usize, width: usize) -> Result<usize> {
    count
        .checked_mul(width)
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} elements of {} bytes overflow the address space", count, width),
            ))
        })
}

fn decode_ints(raw: &[u8]) -> Vec<i32> {
    raw.chunks_exact(INT_WIDTH)
        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn decode_floats(raw: &[u8]) -> Vec<f64> {
    raw.chunks_exact(FLOAT_WIDTH)
        .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect()
}
