//! Transports behind a channel.
//!
//! Each constructor yields the same [`Connected`] bundle, so nothing past
//! construction needs to know which transport it is talking to.

mod process_handle;
mod read_half;
pub mod socket;
pub mod subprocess;
mod write_half;

use tokio::io::{AsyncRead, AsyncWrite};

pub use process_handle::ProcessHandle;
pub use read_half::ReadHalf;
pub use subprocess::SubprocessTransport;
pub use write_half::WriteHalf;

use crate::types::TransportKind;

/// Boxed input stream of any transport.
pub type BoxedReader = Box<dyn AsyncRead + Unpin + Send>;
/// Boxed output stream of any transport.
pub type BoxedWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// What remains of the transport once its streams have been taken.
pub enum Link {
    /// The socket closes when both halves are dropped.
    Socket { kind: TransportKind, peer: String },
    Process(ProcessHandle),
}

impl Link {
    pub fn kind(&self) -> TransportKind {
        match self {
            Link::Socket { kind, .. } => *kind,
            Link::Process(_) => TransportKind::Process,
        }
    }
}

/// An established transport.
pub struct Connected {
    pub read: ReadHalf<BoxedReader>,
    pub write: WriteHalf<BoxedWriter>,
    pub link: Link,
}
