//! Edit and commit loop

use crate::display::{confirm_actions, ConsoleSink};
use crate::error::CliError;
use dialoguer::Editor;
use pinst_config::Config;
use pinst_pacman::PacmanService;
use pinst_types::ActionBuffer;
use tracing::{info, warn};

/// How the loop talks to the operator
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    /// A terminal is attached
    pub interactive: bool,
    pub edit: bool,
    pub confirm: bool,
}

/// What the operator did with the buffer
enum Edited {
    Changed(String),
    Cancelled,
}

/// Edit, confirm and commit until a transaction ran or the operator quits
///
/// Returns the process exit code.
pub async fn edit_and_commit(
    buffer: &mut ActionBuffer,
    config: &Config,
    interaction: Interaction,
) -> Result<i32, CliError> {
    let editing = interaction.edit && interaction.interactive;

    loop {
        if editing {
            match edit(buffer, config)? {
                Edited::Changed(text) => buffer.set_text(text)?,
                Edited::Cancelled => {
                    println!("Cancelled.");
                    return Ok(0);
                }
            }
        }

        if !buffer.has_tokens() {
            println!("Nothing to do.");
            return Ok(0);
        }

        let actions = buffer.actions();
        if interaction.confirm && interaction.interactive && !confirm_actions(&actions)? {
            if editing {
                continue;
            }
            println!("Cancelled.");
            return Ok(0);
        }

        let mut sink = ConsoleSink::new(interaction.interactive);
        sink.start_status("Waiting for the package manager...");
        let service = PacmanService::new(&config.service);
        let result = pinst_ops::commit(buffer, service, &mut sink).await;
        sink.finish();

        match result {
            Ok(outcome) => {
                info!(
                    finished = ?outcome.finished,
                    errors = outcome.errors,
                    warnings = outcome.warnings,
                    "transaction ended"
                );
                return Ok(if outcome.is_success() { 0 } else { 1 });
            }
            Err(e) if editing => {
                warn!(error = %e, "commit failed, returning to the editor");
            }
            Err(e) => {
                warn!(error = %e, "commit failed");
                return Ok(1);
            }
        }
    }
}

fn edit(buffer: &ActionBuffer, config: &Config) -> Result<Edited, CliError> {
    let mut editor = Editor::new();
    editor.extension(".txt");
    if let Some(command) = &config.general.editor {
        editor.executable(command);
    }
    match editor.edit(buffer.text())? {
        Some(text) => Ok(Edited::Changed(text)),
        None => Ok(Edited::Cancelled),
    }
}
