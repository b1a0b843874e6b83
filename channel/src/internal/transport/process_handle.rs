//! Process handle for managing subprocess lifecycle.

use crate::types::{Error, Result};
use tokio::process::Child;

/// Handle for the spawned server process.
///
/// Owns the `Child` after its stdio has been taken, so the only thing left to
/// do with it is ask it to stop.
pub struct ProcessHandle {
    child: Child,
}

impl ProcessHandle {
    /// Create a new process handle from a Child process.
    pub fn new(child: Child) -> Self {
        Self { child }
    }

    /// Ask the process to terminate without waiting for it to exit.
    ///
    /// On unix this sends SIGTERM so the server can flush and clean up.
    /// Elsewhere it falls back to a forced kill.
    #[cfg(unix)]
    pub fn terminate(&mut self) -> Result<()> {
        // No pid means the child has already been reaped.
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        let pid = libc::pid_t::try_from(pid).map_err(|_| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("pid {} out of range", pid),
            ))
        })?;

        // SAFETY: kill(2) has no memory effects; the pid belongs to our unreaped child.
        if unsafe { libc::kill(pid, libc::SIGTERM) } == -1 {
            return Err(Error::Io(std::io::Error::last_os_error()));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn terminate(&mut self) -> Result<()> {
        self.child.start_kill().map_err(Error::Io)
    }

    /// Check if the process has exited without blocking.
    pub fn try_wait(&mut self) -> Result<Option<std::process::ExitStatus>> {
        self.child.try_wait().map_err(Error::Io)
    }

    /// Get the process ID.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}
