//! Script-driven console for a MATFEAP channel.

pub mod error;
pub mod runner;
pub mod script;

pub use error::{ConsoleError, Result};
pub use runner::run_script;
pub use script::Directive;
