//! pinst - edit-and-commit package installer
//!
//! Seeds an action buffer from the command line, lets the operator edit it
//! and commits the result through a pacman-backed transaction session.

mod cli;
mod display;
mod error;
mod installer;
mod logging;

use crate::cli::Cli;
use crate::error::CliError;
use crate::installer::Interaction;
use clap::Parser;
use console::Term;
use pinst_config::{Config, Geometry, GeometryStore};
use pinst_pacman::PacmanDatabase;
use pinst_types::{ActionBuffer, ColorChoice};
use std::process;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Help is checked before parsing: every other hyphen token is a removal
    if cli::wants_help(&args) {
        print!("{}", cli::USAGE);
        process::exit(0);
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    logging::init_tracing(cli.debug);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<i32, CliError> {
    info!("Starting pinst v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => Term::stdout().features().colors_supported(),
    };
    console::set_colors_enabled(colors_enabled);
    console::set_colors_enabled_stderr(colors_enabled);

    let geometry_store = match GeometryStore::default_location() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Geometry will not be persisted: {}", e);
            None
        }
    };
    let geometry = match &geometry_store {
        Some(store) => store.load().await,
        None => Geometry::default(),
    };
    debug!(?geometry, "loaded geometry");

    let interaction = Interaction {
        interactive: console::user_attended(),
        edit: !cli.no_edit,
        confirm: config.general.confirm,
    };

    let database = PacmanDatabase::new(&config.service.pacman);
    let mut buffer = ActionBuffer::seed(&cli.tokens, |name| database.describe(name));

    let result = installer::edit_and_commit(&mut buffer, &config, interaction).await;

    if let Some(store) = &geometry_store {
        let current = current_geometry(geometry);
        if let Err(e) = store.save(&current).await {
            warn!("Failed to save geometry: {}", e);
        }
    }

    result
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, cli: &Cli) {
    if let Some(color) = cli.color {
        config.general.color = color;
    }
    if cli.yes {
        config.general.confirm = false;
    }
}

/// Terminal size in columns and rows; position is kept as loaded
fn current_geometry(previous: Geometry) -> Geometry {
    match Term::stdout().size_checked() {
        Some((rows, cols)) => Geometry {
            position: previous.position,
            size: (u32::from(cols), u32::from(rows)),
        },
        None => previous,
    }
}
