//! Endpoint description for opening a channel.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{Error, Result};

/// Port the FEAP server listens on when `MATFEAP_PORT` is unset.
pub const DEFAULT_PORT: u16 = 3490;
/// Host used when `MATFEAP_HOST` is unset.
pub const DEFAULT_HOST: &str = "localhost";

pub const HOST_ENV_VAR: &str = "MATFEAP_HOST";
pub const PORT_ENV_VAR: &str = "MATFEAP_PORT";
pub const SOCKNAME_ENV_VAR: &str = "MATFEAP_SOCKNAME";
pub const COMMAND_ENV_VAR: &str = "MATFEAP_COMMAND";

/// Where the remote FEAP process lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Endpoint {
    /// A server listening on a TCP port.
    Tcp { host: String, port: u16 },
    /// A server listening on a UNIX-domain socket.
    Unix { path: PathBuf },
    /// A server launched as a child process and driven over its stdio.
    Command { command: String },
}

/// Transport variant of an open channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Tcp,
    Unix,
    Process,
}

impl Endpoint {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Endpoint::Tcp {
            host: host.into(),
            port,
        }
    }

    pub fn unix(path: impl Into<PathBuf>) -> Self {
        Endpoint::Unix { path: path.into() }
    }

    pub fn command(command: impl Into<String>) -> Self {
        Endpoint::Command {
            command: command.into(),
        }
    }

    /// Build an endpoint from the process environment.
    ///
    /// `MATFEAP_COMMAND` wins over `MATFEAP_SOCKNAME`, which wins over TCP.
    /// TCP uses `MATFEAP_HOST` (default `localhost`) and `MATFEAP_PORT`
    /// (default 3490), the same defaults the server uses.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Endpoint::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(command) = present(COMMAND_ENV_VAR) {
            return Ok(Endpoint::command(command));
        }

        if let Some(path) = present(SOCKNAME_ENV_VAR) {
            return Ok(Endpoint::unix(path));
        }

        let host = present(HOST_ENV_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match present(PORT_ENV_VAR) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                Error::InvalidConfig(format!("{}={:?} is not a port: {}", PORT_ENV_VAR, raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Endpoint::Tcp { host, port })
    }

    /// The transport this endpoint opens.
    pub fn kind(&self) -> TransportKind {
        match self {
            Endpoint::Tcp { .. } => TransportKind::Tcp,
            Endpoint::Unix { .. } => TransportKind::Unix,
            Endpoint::Command { .. } => TransportKind::Process,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp { host, port } => write!(f, "tcp://{}:{}", host, port),
            Endpoint::Unix { path } => write!(f, "unix://{}", path.display()),
            Endpoint::Command { command } => write!(f, "exec:{}", command),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Tcp => "tcp",
            TransportKind::Unix => "unix",
            TransportKind::Process => "process",
        };
        f.write_str(name)
    }
}
