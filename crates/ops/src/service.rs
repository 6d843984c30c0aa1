//! Privileged service interface

use pinst_errors::Error;
use pinst_events::EventSender;
use pinst_types::ActionSet;
use serde::{Deserialize, Serialize};

/// Arguments of a transaction start call
///
/// `build`, `ignore_pkgs` and `overwrite_files` are never filled from operator
/// text; they are part of the call signature backends accept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub install: Vec<String>,
    pub remove: Vec<String>,
    pub load: Vec<String>,
    pub build: Vec<String>,
    pub ignore_pkgs: Vec<String>,
    pub overwrite_files: Vec<String>,
}

impl StartRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.install.is_empty()
            && self.remove.is_empty()
            && self.load.is_empty()
            && self.build.is_empty()
    }
}

impl From<&ActionSet> for StartRequest {
    fn from(actions: &ActionSet) -> Self {
        Self {
            install: actions.install.clone(),
            remove: actions.remove.clone(),
            load: actions.load.clone(),
            ..Self::default()
        }
    }
}

/// Handle to a system service that performs package transactions with
/// elevated privileges
///
/// A handle is owned by exactly one [`crate::TransactionSession`]. All calls
/// are synchronous; progress is reported asynchronously through the sender
/// given to [`PrivilegedService::subscribe`].
pub trait PrivilegedService: Send {
    /// Try to take the global service lock
    ///
    /// `Ok(false)` means another client holds it.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached.
    fn get_lock(&mut self) -> Result<bool, Error>;

    /// Route all following events to `sender`
    fn subscribe(&mut self, sender: EventSender);

    /// Begin a transaction; completion is signalled by a terminal event
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction could not be started.
    fn start(&mut self, request: &StartRequest) -> Result<(), Error>;

    /// Release the service lock
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached.
    fn unlock(&mut self) -> Result<(), Error>;

    /// Ask the service to shut down once idle
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached.
    fn quit_daemon(&mut self) -> Result<(), Error>;
}

impl<S: PrivilegedService + ?Sized> PrivilegedService for Box<S> {
    fn get_lock(&mut self) -> Result<bool, Error> {
        (**self).get_lock()
    }

    fn subscribe(&mut self, sender: EventSender) {
        (**self).subscribe(sender);
    }

    fn start(&mut self, request: &StartRequest) -> Result<(), Error> {
        (**self).start(request)
    }

    fn unlock(&mut self) -> Result<(), Error> {
        (**self).unlock()
    }

    fn quit_daemon(&mut self) -> Result<(), Error> {
        (**self).quit_daemon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_actions() {
        let actions = pinst_types::parse("vlc -vi /tmp/a.pkg.tar.zst");
        let request = StartRequest::from(&actions);
        assert_eq!(request.install, vec!["vlc"]);
        assert_eq!(request.remove, vec!["vi"]);
        assert_eq!(request.load, vec!["/tmp/a.pkg.tar.zst"]);
        assert!(request.build.is_empty());
        assert!(request.ignore_pkgs.is_empty());
        assert!(request.overwrite_files.is_empty());
        assert!(!request.is_empty());
    }

    #[test]
    fn test_empty_request() {
        assert!(StartRequest::default().is_empty());
    }
}
