//! Console rendering of transaction messages

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use pinst_events::{MessageSink, Severity};
use pinst_types::ActionSet;
use std::time::Duration;

/// Log line for `text` as shown in the running log
pub fn render_line(text: &str, severity: Severity) -> String {
    let line = severity.decorate(text);
    match severity {
        Severity::Info => style(line).bold().to_string(),
        Severity::Section => style(line).cyan().bold().to_string(),
        Severity::Detail | Severity::Plain => line,
        Severity::Critical => style(line).red().bold().to_string(),
        Severity::Warning => style(line).yellow().to_string(),
    }
}

/// [`MessageSink`] writing to the terminal
///
/// Interactive sinks keep a spinner status line below the running log and
/// stop for acknowledgment after every Critical message.
pub struct ConsoleSink {
    interactive: bool,
    spinner: Option<ProgressBar>,
    stderr: Term,
}

impl ConsoleSink {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            spinner: None,
            stderr: Term::stderr(),
        }
    }

    /// Show the status line
    pub fn start_status(&mut self, message: &str) {
        if !self.interactive {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Remove the status line
    pub fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn print(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.println(line),
            None => println!("{line}"),
        }
    }

    fn acknowledge(&self) {
        let prompt = || {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt("Press Enter to continue")
                .allow_empty(true)
                .report(false)
                .interact_text()
        };
        let result = match &self.spinner {
            Some(spinner) => spinner.suspend(prompt),
            None => prompt(),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "acknowledgment prompt failed");
        }
    }
}

impl MessageSink for ConsoleSink {
    fn post(&mut self, text: &str, severity: Severity) {
        self.print(&render_line(text, severity));

        match severity {
            Severity::Info | Severity::Detail => {
                if let Some(spinner) = &self.spinner {
                    spinner.set_message(text.to_string());
                }
            }
            Severity::Critical => {
                let _ = self.stderr.write_line(&severity.decorate(text));
                if self.interactive {
                    self.acknowledge();
                }
            }
            Severity::Section | Severity::Warning | Severity::Plain => {}
        }
    }
}

impl Drop for ConsoleSink {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Ask the operator to confirm the parsed actions
pub fn confirm_actions(actions: &ActionSet) -> Result<bool, dialoguer::Error> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Commit {actions}?"))
        .default(true)
        .interact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line_prefixes() {
        console::set_colors_enabled(false);
        assert_eq!(render_line("x", Severity::Critical), "!!! x");
        assert_eq!(render_line("x", Severity::Warning), "! x");
        assert_eq!(render_line("End.", Severity::Plain), "End.");
    }

    #[test]
    fn test_non_interactive_sink() {
        let mut sink = ConsoleSink::new(false);
        sink.start_status("Committing");
        assert!(sink.spinner.is_none());
        sink.post("resolving dependencies...", Severity::Info);
        sink.finish();
    }
}
