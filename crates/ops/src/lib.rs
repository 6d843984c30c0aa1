#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Transaction orchestration for pinst
//!
//! This crate sits between the CLI and a privileged service backend. It owns
//! the session lifecycle (lock, run, release) and the commit boundary that
//! turns session failures into operator-visible messages.

mod commit;
mod service;
mod session;

pub use commit::{commit, failure_message, BUSY_MESSAGE};
pub use service::{PrivilegedService, StartRequest};
pub use session::{SessionState, TransactionOutcome, TransactionSession};
