//! In-process stand-in for the privileged service
//!
//! Every handle returned by [`MockDaemon::connect`] talks to the same shared
//! state, so two sessions compete for one lock like real clients do.

#![allow(dead_code)]

use pinst_errors::{Error, ServiceError};
use pinst_events::{DaemonEvent, EventSender};
use pinst_ops::{PrivilegedService, StartRequest};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MockState {
    locked_by: Option<usize>,
    next_handle: usize,
    sender: Option<EventSender>,
    script: Vec<DaemonEvent>,
    close_after_script: bool,
    fail_start: bool,
    fail_lock: bool,
    fail_unlock: bool,
    starts: Vec<StartRequest>,
    unlock_calls: usize,
    quit_calls: usize,
}

#[derive(Clone, Default)]
pub struct MockDaemon {
    state: Arc<Mutex<MockState>>,
}

impl MockDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events replayed synchronously from `start`
    pub fn with_script(events: Vec<DaemonEvent>) -> Self {
        let daemon = Self::new();
        daemon.state().script = events;
        daemon
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn close_after_script(&self) {
        self.state().close_after_script = true;
    }

    pub fn fail_start(&self) {
        self.state().fail_start = true;
    }

    pub fn fail_lock(&self) {
        self.state().fail_lock = true;
    }

    pub fn fail_unlock(&self) {
        self.state().fail_unlock = true;
    }

    pub fn connect(&self) -> MockHandle {
        let mut state = self.state();
        state.next_handle += 1;
        MockHandle {
            id: state.next_handle,
            state: Arc::clone(&self.state),
        }
    }

    /// Send an event to the current subscriber
    pub fn emit(&self, event: DaemonEvent) {
        if let Some(sender) = &self.state().sender {
            let _ = sender.send(event);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state().locked_by.is_some()
    }

    pub fn starts(&self) -> Vec<StartRequest> {
        self.state().starts.clone()
    }

    pub fn unlock_calls(&self) -> usize {
        self.state().unlock_calls
    }

    pub fn quit_calls(&self) -> usize {
        self.state().quit_calls
    }
}

pub struct MockHandle {
    id: usize,
    state: Arc<Mutex<MockState>>,
}

impl PrivilegedService for MockHandle {
    fn get_lock(&mut self) -> Result<bool, Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_lock {
            state.locked_by = Some(self.id);
            return Err(ServiceError::CallFailed {
                call: "GetLock".into(),
                message: "no reply".into(),
            }
            .into());
        }
        match state.locked_by {
            Some(_) => Ok(false),
            None => {
                state.locked_by = Some(self.id);
                Ok(true)
            }
        }
    }

    fn subscribe(&mut self, sender: EventSender) {
        self.state.lock().unwrap().sender = Some(sender);
    }

    fn start(&mut self, request: &StartRequest) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.starts.push(request.clone());
        if state.fail_start {
            return Err(ServiceError::CallFailed {
                call: "StartTransaction".into(),
                message: "rejected".into(),
            }
            .into());
        }
        let script = state.script.clone();
        if let Some(sender) = &state.sender {
            for event in script {
                let _ = sender.send(event);
            }
        }
        if state.close_after_script {
            state.sender = None;
        }
        Ok(())
    }

    fn unlock(&mut self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.unlock_calls += 1;
        if state.locked_by == Some(self.id) {
            state.locked_by = None;
        }
        if state.fail_unlock {
            return Err(ServiceError::CallFailed {
                call: "Unlock".into(),
                message: "no reply".into(),
            }
            .into());
        }
        Ok(())
    }

    fn quit_daemon(&mut self) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.quit_calls += 1;
        state.sender = None;
        Ok(())
    }
}
