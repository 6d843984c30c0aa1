//! Session lock file

use pinst_errors::{Error, ServiceError};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive lock backed by a file holding the owner's pid
///
/// Only the handle that created the file removes it.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    held: bool,
}

#[cfg(target_os = "linux")]
fn process_alive(pid: u32) -> bool {
    Path::new("/proc").join(pid.to_string()).exists()
}

// without procfs every recorded owner counts as alive
#[cfg(not(target_os = "linux"))]
fn process_alive(_pid: u32) -> bool {
    true
}

impl LockFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            held: false,
        }
    }

    /// Create the lock file; `Ok(false)` if a live process holds it
    ///
    /// A file left behind by a process that no longer exists is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created for any other reason.
    pub fn try_acquire(&mut self) -> Result<bool, Error> {
        if self.held {
            return Ok(true);
        }
        if self.create()? {
            return Ok(true);
        }
        match self.owner() {
            Some(pid) if !process_alive(pid) => {
                warn!(path = %self.path.display(), pid, "removing stale lock file");
                match std::fs::remove_file(&self.path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(self.error(&e)),
                }
                self.create()
            }
            _ => {
                debug!(path = %self.path.display(), "lock file exists");
                Ok(false)
            }
        }
    }

    fn create(&mut self) -> Result<bool, Error> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(self.error(&e)),
        };
        self.held = true;
        writeln!(file, "{}", std::process::id()).map_err(|e| self.error(&e))?;
        Ok(true)
    }

    /// Pid recorded in an existing lock file
    fn owner(&self) -> Option<u32> {
        std::fs::read_to_string(&self.path)
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Remove the lock file if this handle created it
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn release(&mut self) -> Result<(), Error> {
        if !self.held {
            return Ok(());
        }
        self.held = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.error(&e)),
        }
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, err: &std::io::Error) -> Error {
        ServiceError::LockFile {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
        .into()
    }
}
