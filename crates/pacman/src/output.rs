//! Classification of pacman output lines

use pinst_events::EventEmitter;

/// One meaningful line of pacman output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// `error: ...`
    Error(String),
    /// `warning: ...`
    Warning(String),
    /// `:: ...`
    Section(String),
    /// `(n/m) ...`
    Progress { status: String, text: String },
    Text(String),
}

impl OutputLine {
    /// Classify a single line; blank lines yield `None`
    #[must_use]
    pub fn classify(line: &str) -> Option<Self> {
        let line = line.trim_end();
        if line.trim().is_empty() {
            return None;
        }
        if let Some(rest) = line.strip_prefix("error:") {
            return Some(Self::Error(rest.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix("warning:") {
            return Some(Self::Warning(rest.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix("::") {
            return Some(Self::Section(rest.trim().to_string()));
        }
        if let Some((status, text)) = split_counter(line) {
            return Some(Self::Progress {
                status: status.to_string(),
                text: text.to_string(),
            });
        }
        Some(Self::Text(line.trim().to_string()))
    }
}

/// `"(1/3) installing vlc"` -> `("1/3", "installing vlc")`
fn split_counter(line: &str) -> Option<(&str, &str)> {
    let inner_start = line.trim_start().strip_prefix('(')?;
    let close = inner_start.find(')')?;
    let counter = &inner_start[..close];
    let (current, total) = counter.split_once('/')?;
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_number(current.trim()) || !is_number(total.trim()) {
        return None;
    }
    Some((counter.trim(), inner_start[close + 1..].trim()))
}

/// Stateful line parser for one pacman invocation
///
/// Error lines are held back as details for the final `Error` event; all
/// other lines are emitted immediately.
#[derive(Debug, Default)]
pub struct OutputParser {
    hook_section: Option<String>,
    errors: Vec<String>,
}

impl OutputParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw output line
    pub fn feed(&mut self, raw: &str, emitter: &impl EventEmitter) {
        let cleaned = strip_ansi(raw);
        let Some(line) = OutputLine::classify(&cleaned) else {
            return;
        };
        match line {
            OutputLine::Error(detail) => self.errors.push(detail),
            OutputLine::Warning(message) => emitter.emit_warning(message),
            OutputLine::Section(text) => {
                self.hook_section = text
                    .to_ascii_lowercase()
                    .contains("hook")
                    .then(|| text.clone());
                emitter.emit_action(text);
            }
            OutputLine::Progress { status, text } => match &self.hook_section {
                Some(section) => emitter.emit_hook_progress(section.clone(), text, status),
                None => emitter.emit_action_progress(text, status),
            },
            OutputLine::Text(text) => emitter.emit_action(text),
        }
    }

    /// Collected `error:` lines, leaving the parser empty
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    #[must_use]
    pub fn in_hooks(&self) -> bool {
        self.hook_section.is_some()
    }
}

/// Remove terminal escape sequences
#[must_use]
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            if c != '\r' {
                out.push(c);
            }
            continue;
        }
        match chars.next() {
            // CSI: parameters and intermediates up to a final byte
            Some('[') => {
                for c in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&c) {
                        break;
                    }
                }
            }
            // OSC: terminated by BEL or ST
            Some(']') => {
                while let Some(c) = chars.next() {
                    if c == '\u{07}' {
                        break;
                    }
                    if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinst_events::{channel, DaemonEvent};

    #[test]
    fn test_classify() {
        assert_eq!(
            OutputLine::classify("error: target not found: vlcc"),
            Some(OutputLine::Error("target not found: vlcc".into()))
        );
        assert_eq!(
            OutputLine::classify("warning: vlc-3.0 is up to date -- reinstalling"),
            Some(OutputLine::Warning("vlc-3.0 is up to date -- reinstalling".into()))
        );
        assert_eq!(
            OutputLine::classify(":: Processing package changes..."),
            Some(OutputLine::Section("Processing package changes...".into()))
        );
        assert_eq!(
            OutputLine::classify("(1/2) installing vlc"),
            Some(OutputLine::Progress {
                status: "1/2".into(),
                text: "installing vlc".into()
            })
        );
        assert_eq!(
            OutputLine::classify("resolving dependencies..."),
            Some(OutputLine::Text("resolving dependencies...".into()))
        );
        assert_eq!(OutputLine::classify("   "), None);
    }

    #[test]
    fn test_parenthesized_text_is_not_progress() {
        assert_eq!(
            OutputLine::classify("(optional) extra"),
            Some(OutputLine::Text("(optional) extra".into()))
        );
    }

    #[test]
    fn test_hook_mode() {
        let (tx, mut rx) = channel();
        let mut parser = OutputParser::new();
        parser.feed("(1/1) installing vlc", &tx);
        parser.feed(":: Running post-transaction hooks...", &tx);
        parser.feed("(1/2) Arming ConditionNeedsUpdate...", &tx);
        parser.feed("error: something broke", &tx);
        assert!(parser.in_hooks());

        assert_eq!(
            rx.try_recv().unwrap(),
            DaemonEvent::ActionProgress {
                action: "installing vlc".into(),
                status: "1/1".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            DaemonEvent::Action("Running post-transaction hooks...".into())
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            DaemonEvent::HookProgress {
                action: "Running post-transaction hooks...".into(),
                details: "Arming ConditionNeedsUpdate...".into(),
                status: "1/2".into()
            }
        );
        assert!(rx.try_recv().is_err());
        assert_eq!(parser.take_errors(), vec!["something broke"]);
        assert!(parser.take_errors().is_empty());
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\u{1b}[1;31merror:\u{1b}[0m x"), "error: x");
        assert_eq!(strip_ansi("\u{1b}]0;title\u{07}done\r"), "done");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
