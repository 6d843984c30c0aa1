//! Action parsing
//!
//! Operator text is a whitespace separated list of tokens, optionally followed
//! by human readable descriptions in parentheses. Each token maps to exactly
//! one category by prefix:
//!
//! - `-name` removes `name`
//! - `/path` loads a package file verbatim
//! - `file:/path` loads a package file (fixed six character prefix strip)
//! - anything else installs by name

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a package removal
pub const REMOVE_PREFIX: char = '-';

/// Prefix of an absolute package file path
pub const PATH_PREFIX: char = '/';

/// URI style prefix of a package file
pub const FILE_URI_PREFIX: &str = "file:/";

/// Category a single token contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Install,
    Remove,
    Load,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Remove => write!(f, "remove"),
            Self::Load => write!(f, "load"),
        }
    }
}

/// One classified operator token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    /// Package name for install/remove, file path for load
    pub target: String,
}

impl Action {
    /// Classify a single whitespace-free token.
    ///
    /// A lone `-` yields an empty remove target and `file:/tmp/x` loads
    /// `tmp/x`; both are kept as observed rather than corrected.
    #[must_use]
    pub fn classify(token: &str) -> Self {
        if let Some(name) = token.strip_prefix(REMOVE_PREFIX) {
            Self {
                kind: ActionKind::Remove,
                target: name.to_string(),
            }
        } else if token.starts_with(PATH_PREFIX) {
            Self {
                kind: ActionKind::Load,
                target: token.to_string(),
            }
        } else if token.starts_with(FILE_URI_PREFIX) {
            Self {
                kind: ActionKind::Load,
                target: token[FILE_URI_PREFIX.len()..].to_string(),
            }
        } else {
            Self {
                kind: ActionKind::Install,
                target: token.to_string(),
            }
        }
    }

    /// Name used to look up a package description for this token
    #[must_use]
    pub fn lookup_name(token: &str) -> &str {
        token.strip_prefix(REMOVE_PREFIX).unwrap_or(token)
    }
}

/// Structured operator intent, in token order per category
///
/// Duplicates are kept: this is an ordered multiset, not a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    pub install: Vec<String>,
    pub remove: Vec<String>,
    pub load: Vec<String>,
}

impl ActionSet {
    /// Create an empty action set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classified action to its category
    pub fn push(&mut self, action: Action) {
        match action.kind {
            ActionKind::Install => self.install.push(action.target),
            ActionKind::Remove => self.remove.push(action.target),
            ActionKind::Load => self.load.push(action.target),
        }
    }

    /// Total number of entries across all categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.install.len() + self.remove.len() + self.load.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, entries) in [
            (ActionKind::Install, &self.install),
            (ActionKind::Remove, &self.remove),
            (ActionKind::Load, &self.load),
        ] {
            if entries.is_empty() {
                continue;
            }
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{kind}: {}", entries.join(" "))?;
        }
        if first {
            write!(f, "nothing to do")?;
        }
        Ok(())
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = Self::new();
        for action in iter {
            set.push(action);
        }
        set
    }
}

/// Parse operator text into an [`ActionSet`].
///
/// Parenthesized descriptions are removed before tokenizing. Matching is
/// line bounded and greedy: on each line everything from the first `(` to the
/// last `)` goes.
#[must_use]
pub fn parse(text: &str) -> ActionSet {
    strip_descriptions(text)
        .split_whitespace()
        .map(Action::classify)
        .collect()
}

fn strip_descriptions(text: &str) -> String {
    text.split('\n')
        .map(|line| match (line.find('('), line.rfind(')')) {
            (Some(open), Some(close)) if close > open => {
                let mut kept = String::with_capacity(line.len());
                kept.push_str(&line[..open]);
                kept.push_str(&line[close + 1..]);
                kept
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_and_remove() {
        let set = parse("vlc -vi");
        assert_eq!(set.install, vec!["vlc"]);
        assert_eq!(set.remove, vec!["vi"]);
        assert!(set.load.is_empty());
    }

    #[test]
    fn test_descriptions_removed() {
        let set = parse("foo (some description) bar");
        assert_eq!(set.install, vec!["foo", "bar"]);

        let set = parse("foo(tight)bar");
        assert_eq!(set.install, vec!["foobar"]);
    }

    #[test]
    fn test_descriptions_per_line() {
        let text = "vlc    (a media player)\n-vi    (the editor)\n/tmp/x.pkg.tar.zst";
        let set = parse(text);
        assert_eq!(set.install, vec!["vlc"]);
        assert_eq!(set.remove, vec!["vi"]);
        assert_eq!(set.load, vec!["/tmp/x.pkg.tar.zst"]);
    }

    #[test]
    fn test_unbalanced_parenthesis_kept() {
        let set = parse("foo (bar");
        assert_eq!(set.install, vec!["foo", "(bar"]);
    }

    #[test]
    fn test_load_paths() {
        assert_eq!(parse("/tmp/pkg.zst").load, vec!["/tmp/pkg.zst"]);
        assert_eq!(parse("file:/tmp/pkg.zst").load, vec!["tmp/pkg.zst"]);
    }

    #[test]
    fn test_lone_dash() {
        let set = parse("-");
        assert_eq!(set.remove, vec![String::new()]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicates_preserved() {
        let set = parse("foo foo -bar -bar");
        assert_eq!(set.install, vec!["foo", "foo"]);
        assert_eq!(set.remove, vec!["bar", "bar"]);
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(parse("").to_string(), "nothing to do");
        assert_eq!(
            parse("vlc -vi /a.zst").to_string(),
            "install: vlc; remove: vi; load: /a.zst"
        );
    }

    #[test]
    fn test_lookup_name() {
        assert_eq!(Action::lookup_name("-vi"), "vi");
        assert_eq!(Action::lookup_name("vlc"), "vlc");
    }
}
