//! Transaction worker
//!
//! Runs the pacman sub-operations of one [`StartRequest`] in order and turns
//! their output into service events. Always ends with `Finished`.

use crate::output::OutputParser;
use pinst_events::{EventEmitter, EventSender};
use pinst_ops::StartRequest;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use tracing::{debug, info, warn};

/// Pacman sub-operation, run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Remove,
    Install,
    Load,
}

impl Operation {
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Self::Remove => "-R",
            Self::Install => "-S",
            Self::Load => "-U",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Install => "install",
            Self::Load => "load",
        }
    }

    fn targets(self, request: &StartRequest) -> &[String] {
        match self {
            Self::Remove => &request.remove,
            Self::Install => &request.install,
            Self::Load => &request.load,
        }
    }
}

/// How pacman is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacmanCommand {
    /// Escalation program; empty runs pacman directly
    pub escalation: String,
    pub pacman: PathBuf,
}

impl PacmanCommand {
    /// Program and argument list for one sub-operation
    #[must_use]
    pub fn argv(&self, operation: Operation, request: &StartRequest) -> (PathBuf, Vec<String>) {
        let mut args = Vec::new();
        let program = if self.escalation.trim().is_empty() {
            self.pacman.clone()
        } else {
            args.push(self.pacman.display().to_string());
            PathBuf::from(self.escalation.trim())
        };

        args.push(operation.flag().to_string());
        args.extend(["--noconfirm", "--color", "never"].map(String::from));
        if operation != Operation::Remove {
            if !request.ignore_pkgs.is_empty() {
                args.push("--ignore".to_string());
                args.push(request.ignore_pkgs.join(","));
            }
            for glob in &request.overwrite_files {
                args.push("--overwrite".to_string());
                args.push(glob.clone());
            }
        }
        args.extend(operation.targets(request).iter().cloned());
        (program, args)
    }
}

/// Run every non-empty sub-operation of `request`, reporting through `events`
pub fn run_transaction(command: &PacmanCommand, request: &StartRequest, events: &EventSender) {
    if !request.build.is_empty() {
        events.emit_warning(format!(
            "building packages is not supported, skipping: {}",
            request.build.join(" ")
        ));
    }

    let operations: Vec<Operation> = [Operation::Remove, Operation::Install, Operation::Load]
        .into_iter()
        .filter(|op| !op.targets(request).is_empty())
        .collect();

    if operations.is_empty() {
        events.emit_action("Nothing to do");
    }

    for operation in operations {
        if let Err((message, details)) = run_operation(command, operation, request, events) {
            warn!(operation = operation.label(), %message, "transaction step failed");
            events.emit_error(message, details);
            events.emit_finished(false);
            return;
        }
    }

    info!("transaction finished");
    events.emit_finished(true);
}

fn run_operation(
    command: &PacmanCommand,
    operation: Operation,
    request: &StartRequest,
    events: &EventSender,
) -> Result<(), (String, Vec<String>)> {
    let (program, args) = command.argv(operation, request);
    debug!(program = %program.display(), ?args, "spawning pacman");

    let mut child = Command::new(&program)
        .args(&args)
        .env("LC_ALL", "C")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            (
                format!("{} failed: cannot run {}: {e}", operation.label(), program.display()),
                Vec::new(),
            )
        })?;

    // both pipes feed one ordered line stream
    let (line_tx, line_rx) = mpsc::channel::<String>();
    let mut readers = Vec::new();
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_reader(stdout, line_tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_reader(stderr, line_tx.clone()));
    }
    drop(line_tx);

    let mut parser = OutputParser::new();
    for line in line_rx {
        parser.feed(&line, events);
    }
    for reader in readers {
        let _ = reader.join();
    }

    let status = child.wait().map_err(|e| {
        (
            format!("{} failed: {e}", operation.label()),
            parser.take_errors(),
        )
    })?;

    if status.success() {
        Ok(())
    } else {
        Err((
            format!("{} failed ({})", operation.label(), describe_status(status)),
            parser.take_errors(),
        ))
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    pipe: R,
    lines: mpsc::Sender<String>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        // keep reading until EOF so the child never writes into a closed pipe
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if lines.send(line).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!(error = %e, "output pipe read failed");
                    break;
                }
            }
        }
    })
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
