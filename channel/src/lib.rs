//! MATFEAP channel - client transport for FEAP servers.
//!
//! A [`Channel`] is a duplex byte stream to a FEAP process, reached over TCP,
//! a UNIX-domain socket, or by launching the process and using its stdio.
//! Two sub-protocols share the stream:
//!
//! - **Lines**: commands and replies as `'\n'`-terminated text
//! - **Arrays**: big-endian `i32` and `f64` values, back to back, with the
//!   element count agreed out of band
//!
//! # Example
//!
//! ```rust,no_run
//! use matfeap_channel::{Channel, Endpoint};
//!
//! # async fn example() -> matfeap_channel::Result<()> {
//! let endpoint = Endpoint::from_env()?;
//! let mut channel = Channel::open(&endpoint).await?;
//! channel.send("tplo").await?;
//! let status = channel.read_line().await?;
//! # let _ = status;
//! channel.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Endpoint description and error types
//! - [`internal`] - Transport implementations
//! - [`channel`] - The channel itself

pub mod channel;
pub mod internal;
pub mod types;

pub use channel::Channel;
pub use types::*;
