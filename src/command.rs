//! Command table and parser for the terminal prompt
//!
//! Parsing is pure: it turns one submitted line into a [`Command`]. What a
//! command does is decided by [`crate::session::Session`].

use regex::Regex;
use std::sync::OnceLock;

/// Descriptions shown by HELP and after the introduction, in display order
pub const COMMANDS: &[&str] = &[
    "LINKEDIN - Connect with me on LinkedIn",
    "MESSAGE -name <name> -message <message> - Send me a message",
    "WHOAMI - Show current user name",
    "SETNAME <name> - Set your user name",
    "BACKGROUND - Toggle the animated background",
    "PATTERN [name] - List or switch background patterns",
    "HELP - Show available commands",
    "CLEAR - Clear the terminal",
];

/// A parsed prompt submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Message { name: String, message: String },
    /// MESSAGE without both flags
    MessageUsage,
    SetName(String),
    /// SETNAME without an argument
    SetNameUsage,
    /// PATTERN, optionally naming a preset
    Pattern(Option<String>),
    LinkedIn,
    WhoAmI,
    Background,
    Help,
    Clear,
    /// Anything else, carrying the trimmed input
    Unknown(String),
}

fn name_flag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)-name\s+([^-]+)").expect("valid regex"))
}

fn message_flag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)-message\s+(.+)").expect("valid regex"))
}

fn setname_arg() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)SETNAME\s+(.+)").expect("valid regex"))
}

fn pattern_arg() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)PATTERN\s+(.+)").expect("valid regex"))
}

/// First capture group of `re` in `text`, trimmed, if non-empty
fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse one submitted line. Returns `None` for blank input.
///
/// Verbs are case-insensitive. The prefix verbs (MESSAGE, SETNAME, PATTERN)
/// are checked before the exact-match ones.
pub fn parse(raw: &str) -> Option<Command> {
    let sanitized = raw.trim();
    if sanitized.is_empty() {
        return None;
    }
    let upper = sanitized.to_uppercase();

    let command = if upper.starts_with("MESSAGE") {
        match (
            capture(name_flag(), sanitized),
            capture(message_flag(), sanitized),
        ) {
            (Some(name), Some(message)) => Command::Message { name, message },
            _ => Command::MessageUsage,
        }
    } else if upper.starts_with("SETNAME") {
        capture(setname_arg(), sanitized)
            .map(Command::SetName)
            .unwrap_or(Command::SetNameUsage)
    } else if upper.starts_with("PATTERN") {
        Command::Pattern(capture(pattern_arg(), sanitized))
    } else {
        match upper.as_str() {
            "LINKEDIN" => Command::LinkedIn,
            "WHOAMI" => Command::WhoAmI,
            "BACKGROUND" => Command::Background,
            "HELP" => Command::Help,
            "CLEAR" => Command::Clear,
            _ => Command::Unknown(sanitized.to_string()),
        }
    };
    Some(command)
}

/// "Available commands:" followed by each table entry, indented
pub fn command_listing() -> Vec<String> {
    std::iter::once("Available commands:".to_string())
        .chain(COMMANDS.iter().map(|entry| format!("  {entry}")))
        .collect()
}
