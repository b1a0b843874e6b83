//! Type definitions for the MATFEAP channel.

pub mod endpoint;
pub mod error;

pub use endpoint::{
    COMMAND_ENV_VAR, DEFAULT_HOST, DEFAULT_PORT, Endpoint, HOST_ENV_VAR, PORT_ENV_VAR,
    SOCKNAME_ENV_VAR, TransportKind,
};
pub use error::{Error, Result};
