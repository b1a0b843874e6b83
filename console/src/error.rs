use std::io;

use thiserror::Error;

/// Failures while running a console script.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A script line could not be understood.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The channel to the server failed.
    #[error("channel error: {0}")]
    Channel(#[from] matfeap_channel::Error),

    /// Reading the script or writing results failed.
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
