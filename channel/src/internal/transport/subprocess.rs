//! Subprocess transport: a FEAP server driven over its stdin and stdout.

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use super::{Connected, Link, ProcessHandle, ReadHalf, WriteHalf};
use crate::types::{Error, Result};

/// Subprocess transport for a command line.
pub struct SubprocessTransport {
    command_line: String,
    program: PathBuf,
    args: Vec<String>,
    process: Option<Child>,
}

impl SubprocessTransport {
    /// Parse `command_line` and locate its program.
    ///
    /// The line is split on whitespace: the first word is the program, the
    /// rest are its arguments. No shell quoting is interpreted.
    pub fn new(command_line: &str) -> Result<Self> {
        let mut words = command_line.split_whitespace();
        let name = words.next().ok_or_else(|| Error::Spawn {
            command: command_line.to_string(),
            reason: "empty command line".to_string(),
        })?;

        let program = which::which(name).map_err(|e| Error::Spawn {
            command: command_line.to_string(),
            reason: format!("{} not found: {}", name, e),
        })?;

        Ok(Self {
            command_line: command_line.to_string(),
            program,
            args: words.map(str::to_string).collect(),
            process: None,
        })
    }

    /// Build the command with piped stdin/stdout.
    ///
    /// Stderr is inherited so the server's diagnostics reach the terminal
    /// without mixing into the protocol stream.
    fn build_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.stdin(Stdio::piped());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::inherit());
        command
    }

    /// Start the process.
    pub fn connect(&mut self) -> Result<()> {
        if self.process.is_some() {
            return Ok(());
        }

        debug!("Starting FEAP server: {:?} {:?}", self.program, self.args);
        let child = self.build_command().spawn().map_err(|e| Error::Spawn {
            command: self.command_line.clone(),
            reason: e.to_string(),
        })?;

        info!(pid = ?child.id(), "FEAP server process started");
        self.process = Some(child);
        Ok(())
    }

    /// Split the running process into channel halves and a handle.
    ///
    /// The read half is the child's stdout, the write half its stdin.
    pub fn split(mut self) -> Result<Connected> {
        let mut child = self.process.take().ok_or_else(|| Error::Spawn {
            command: self.command_line.clone(),
            reason: "process not started".to_string(),
        })?;

        let stdin = child.stdin.take().ok_or_else(|| Error::Spawn {
            command: self.command_line.clone(),
            reason: "stdin not available".to_string(),
        })?;

        let stdout = child.stdout.take().ok_or_else(|| Error::Spawn {
            command: self.command_line.clone(),
            reason: "stdout not available".to_string(),
        })?;

        Ok(Connected {
            read: ReadHalf::new(Box::new(stdout)),
            write: WriteHalf::new(Box::new(stdin)),
            link: Link::Process(ProcessHandle::new(child)),
        })
    }
}
