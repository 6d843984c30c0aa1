#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Pacman backend for the privileged service interface
//!
//! Transactions run `pacman` through a privilege escalation command
//! (`pkexec` by default) on a dedicated worker thread. Pacman's output is
//! classified line by line into service events.

mod database;
mod lock;
mod output;
mod service;
mod worker;

pub use database::PacmanDatabase;
pub use lock::LockFile;
pub use output::{strip_ansi, OutputLine, OutputParser};
pub use service::PacmanService;
pub use worker::{Operation, PacmanCommand};
