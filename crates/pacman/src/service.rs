//! [`PrivilegedService`] implementation driving pacman

use crate::lock::LockFile;
use crate::worker::{run_transaction, PacmanCommand};
use pinst_config::ServiceConfig;
use pinst_errors::{Error, ServiceError};
use pinst_events::EventSender;
use pinst_ops::{PrivilegedService, StartRequest};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Pacman-backed privileged service handle
#[derive(Debug)]
pub struct PacmanService {
    command: PacmanCommand,
    lock: LockFile,
    db_lock: PathBuf,
    events: Option<EventSender>,
    worker: Option<JoinHandle<()>>,
}

impl PacmanService {
    #[must_use]
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            command: PacmanCommand {
                escalation: config.escalation.clone(),
                pacman: config.pacman.clone(),
            },
            lock: LockFile::new(&config.lock_file),
            db_lock: config.db_lock.clone(),
            events: None,
            worker: None,
        }
    }

    fn worker_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl PrivilegedService for PacmanService {
    fn get_lock(&mut self) -> Result<bool, Error> {
        if self.db_lock.exists() {
            debug!(path = %self.db_lock.display(), "pacman database is locked");
            return Ok(false);
        }
        self.lock.try_acquire()
    }

    fn subscribe(&mut self, sender: EventSender) {
        self.events = Some(sender);
    }

    fn start(&mut self, request: &StartRequest) -> Result<(), Error> {
        if self.worker_running() {
            return Err(ServiceError::Busy.into());
        }
        let events = self.events.take().ok_or(ServiceError::NotSubscribed)?;
        let command = self.command.clone();
        let request = request.clone();

        let handle = thread::Builder::new()
            .name("pinst-transaction".to_string())
            .spawn(move || run_transaction(&command, &request, &events))
            .map_err(|e| ServiceError::SpawnFailed {
                command: "transaction worker".to_string(),
                message: e.to_string(),
            })?;
        self.worker = Some(handle);
        info!("transaction worker started");
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), Error> {
        self.lock.release()
    }

    fn quit_daemon(&mut self) -> Result<(), Error> {
        self.events = None;
        match self.worker.take() {
            Some(handle) if handle.is_finished() => {
                handle.join().map_err(|_| ServiceError::CallFailed {
                    call: "quit_daemon".to_string(),
                    message: "transaction worker panicked".to_string(),
                })?;
            }
            Some(handle) => {
                debug!("transaction worker still running, detaching");
                drop(handle);
            }
            None => {}
        }
        Ok(())
    }
}
