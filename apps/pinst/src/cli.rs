//! Command line interface definition

use clap::Parser;
use pinst_types::ColorChoice;
use std::path::PathBuf;

/// Usage text printed for `-h`/`--help`
pub const USAGE: &str = "\
pinst [options] [list of packages]
  for remove add -
  for a package file give its path or a file:/ uri
  example: pinst vlc -vi

options (before the package list):
  --config PATH   use alternate config file
  --debug         write debug logs to the state directory
  --color WHEN    always, auto or never
  --no-edit       commit the given packages without opening the editor
  --yes           do not ask for confirmation
";

/// pinst - edit a list of package actions, then commit it through pacman
///
/// Help and version flags are handled before clap sees the arguments:
/// every other hyphen token is a removal.
#[derive(Parser, Debug)]
#[command(name = "pinst")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging to a file
    #[arg(long)]
    pub debug: bool,

    /// Color output control
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Commit the seeded buffer without opening the editor
    #[arg(long)]
    pub no_edit: bool,

    /// Do not ask for confirmation
    #[arg(long)]
    pub yes: bool,

    /// Package names, `-name` to remove, paths or `file:/` uris to load
    #[arg(value_name = "PACKAGES", allow_hyphen_values = true, trailing_var_arg = true)]
    pub tokens: Vec<String>,
}

/// Whether any argument after the program name asks for help
pub fn wants_help<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .skip(1)
        .any(|arg| matches!(arg.as_ref(), "-h" | "--help"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wants_help() {
        assert!(wants_help(&["pinst", "vlc", "-h"]));
        assert!(wants_help(&["pinst", "--help"]));
        assert!(!wants_help(&["pinst", "vlc", "-vi"]));
        // the program name is not a token
        assert!(!wants_help(&["-h"]));
    }

    #[test]
    fn test_hyphen_tokens_are_values() {
        let cli = Cli::try_parse_from(["pinst", "vlc", "-vi", "file:/tmp/a.zst"]).unwrap();
        assert_eq!(cli.tokens, vec!["vlc", "-vi", "file:/tmp/a.zst"]);
    }

    #[test]
    fn test_leading_hyphen_token() {
        let cli = Cli::try_parse_from(["pinst", "-vi"]).unwrap();
        assert_eq!(cli.tokens, vec!["-vi"]);
    }

    #[test]
    fn test_options_before_tokens() {
        let cli =
            Cli::try_parse_from(["pinst", "--no-edit", "--color", "never", "vlc"]).unwrap();
        assert!(cli.no_edit);
        assert_eq!(cli.color, Some(ColorChoice::Never));
        assert_eq!(cli.tokens, vec!["vlc"]);
    }
}
