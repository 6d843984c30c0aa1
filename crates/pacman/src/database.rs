//! Package description lookup

use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Read-only queries against the pacman sync and local databases
#[derive(Debug, Clone)]
pub struct PacmanDatabase {
    pacman: PathBuf,
}

impl PacmanDatabase {
    #[must_use]
    pub fn new(pacman: impl Into<PathBuf>) -> Self {
        Self {
            pacman: pacman.into(),
        }
    }

    /// Description of `name` from the sync databases, else the local one
    #[must_use]
    pub fn describe(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        ["-Si", "-Qi"]
            .into_iter()
            .find_map(|query| self.query(query, name))
    }

    fn query(&self, query: &str, name: &str) -> Option<String> {
        let output = Command::new(&self.pacman)
            .args([query, name])
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(output) if output.status.success() => {
                parse_description(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(_) => None,
            Err(e) => {
                debug!(pacman = %self.pacman.display(), error = %e, "description lookup failed");
                None
            }
        }
    }
}

/// Extract the `Description` field of `pacman -Si`/`-Qi` output
#[must_use]
pub fn parse_description(info: &str) -> Option<String> {
    info.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() != "Description" {
            return None;
        }
        let value = value.trim();
        (!value.is_empty() && value != "None").then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description() {
        let info = "Repository      : extra\n\
                    Name            : vlc\n\
                    Version         : 3.0.21-1\n\
                    Description     : Multi-platform MPEG, VCD/DVD, and DivX player\n\
                    Architecture    : x86_64\n";
        assert_eq!(
            parse_description(info).as_deref(),
            Some("Multi-platform MPEG, VCD/DVD, and DivX player")
        );
    }

    #[test]
    fn test_no_description() {
        assert_eq!(parse_description("Name : vlc\n"), None);
        assert_eq!(parse_description("Description : None\n"), None);
    }

    #[test]
    fn test_missing_binary() {
        let db = PacmanDatabase::new("/nonexistent/pacman");
        assert_eq!(db.describe("vlc"), None);
        assert_eq!(db.describe(""), None);
    }
}
