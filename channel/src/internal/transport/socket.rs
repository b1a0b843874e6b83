//! Socket transports: TCP and UNIX-domain stream sockets.

use tokio::net::TcpStream;
use tracing::{debug, info};

use super::{Connected, Link, ReadHalf, WriteHalf};
use crate::types::{Error, Result, TransportKind};

/// Connect to a server listening on `(host, port)`.
///
/// Hostname resolution happens here, so a DNS failure is a connection error
/// like a refused port.
pub async fn connect_tcp(host: &str, port: u16) -> Result<Connected> {
    let addr = format!("{}:{}", host, port);
    debug!("Connecting to FEAP server at {}", addr);

    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| Error::Connection {
            addr: addr.clone(),
            source,
        })?;
    // Requests are small and every write is followed by a read.
    stream.set_nodelay(true).map_err(|source| Error::Connection {
        addr: addr.clone(),
        source,
    })?;

    let (read, write) = stream.into_split();
    info!("Connected to FEAP server at {}", addr);

    Ok(Connected {
        read: ReadHalf::new(Box::new(read)),
        write: WriteHalf::new(Box::new(write)),
        link: Link::Socket {
            kind: TransportKind::Tcp,
            peer: addr,
        },
    })
}

/// Connect to a server listening on a UNIX-domain socket at `path`.
#[cfg(unix)]
pub async fn connect_unix(path: &std::path::Path) -> Result<Connected> {
    use tokio::net::UnixStream;

    let addr = path.display().to_string();
    debug!("Connecting to FEAP server at local socket {}", addr);

    let stream = UnixStream::connect(path)
        .await
        .map_err(|source| Error::Connection {
            addr: addr.clone(),
            source,
        })?;

    let (read, write) = stream.into_split();
    info!("Connected to FEAP server at local socket {}", addr);

    Ok(Connected {
        read: ReadHalf::new(Box::new(read)),
        write: WriteHalf::new(Box::new(write)),
        link: Link::Socket {
            kind: TransportKind::Unix,
            peer: addr,
        },
    })
}
