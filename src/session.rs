//! Terminal session: transcript, prompt input and command dispatch
//!
//! `Session` is the interpreter behind the prompt. Submitting a line echoes
//! it, appends the command's output and returns at most one [`Effect`] for the
//! caller to carry out. The session never performs I/O itself.

use crate::background::{BackgroundSelection, Preset};
use crate::command::{self, Command};
use crate::model::transcript::{Transcript, TranscriptLine};
use crate::services::relay::MessagePayload;

/// Name used until one is stored or set
pub const DEFAULT_USER_NAME: &str = "guest";

pub const MESSAGE_USAGE: &str = "Usage: MESSAGE -name <name> -message <message>";
pub const MESSAGE_EXAMPLE: &str = "Example: MESSAGE -name John -message Hello Jake!";
pub const SETNAME_USAGE: &str = "Usage: SETNAME <name>";
pub const SEND_FAILED: &str = "Failed to send message. Please try again later.";

/// Side effect requested by a submitted command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenLink(String),
    SendMessage(MessagePayload),
    /// Persist the display name
    PersistName(String),
    /// Mount, unmount or switch the background
    BackgroundChanged(BackgroundSelection),
    /// A preset was chosen explicitly; restarts auto-cycling
    PresetSelected(BackgroundSelection),
    /// Shake the window (unknown command)
    Shake,
}

#[derive(Debug, Clone)]
pub struct Session {
    transcript: Transcript,
    input: String,
    user_name: String,
    /// Host part of the prompt
    host: String,
    profile_url: String,
    background: BackgroundSelection,
}

impl Session {
    pub fn new(host: String, profile_url: String, background: BackgroundSelection) -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            user_name: DEFAULT_USER_NAME.to_string(),
            host,
            profile_url,
            background,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Replace the display name without any output (e.g. from storage)
    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.user_name = name.into();
    }

    pub fn background(&self) -> BackgroundSelection {
        self.background
    }

    /// Follow a preset change made outside the prompt (auto-cycling)
    pub fn set_background_preset(&mut self, preset: Preset) {
        self.background.preset = preset;
    }

    /// `<name>@<host>:~$`
    pub fn prompt(&self) -> String {
        format!("{}@{}:~$", self.user_name, self.host)
    }

    /// The scripted command shown at the top of the introduction
    pub fn intro_echo(&self) -> String {
        format!("{} cat introduction.txt", self.prompt())
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Submit the input buffer. Blank input does nothing.
    pub fn submit(&mut self) -> Option<Effect> {
        let raw = std::mem::take(&mut self.input);
        let Some(command) = command::parse(&raw) else {
            self.input = raw;
            return None;
        };

        tracing::debug!("Dispatching {:?}", command);
        self.transcript.push(TranscriptLine::Input {
            prompt: self.prompt(),
            text: raw,
        });
        self.dispatch(command)
    }

    fn dispatch(&mut self, command: Command) -> Option<Effect> {
        match command {
            Command::Message { name, message } => {
                Some(Effect::SendMessage(MessagePayload { name, message }))
            }
            Command::MessageUsage => {
                self.transcript.push_output(MESSAGE_USAGE);
                self.transcript.push_output(MESSAGE_EXAMPLE);
                None
            }
            Command::SetName(name) => {
                self.transcript
                    .push_output(format!("User name set to: {name}"));
                self.user_name = name.clone();
                Some(Effect::PersistName(name))
            }
            Command::SetNameUsage => {
                self.transcript.push_output(SETNAME_USAGE);
                None
            }
            Command::Pattern(None) => {
                self.list_patterns();
                None
            }
            Command::Pattern(Some(name)) => match Preset::from_name(&name) {
                Some(preset) => {
                    self.background = BackgroundSelection {
                        enabled: true,
                        preset,
                    };
                    self.transcript
                        .push_output(format!("Background pattern set to: {}", preset.name()));
                    Some(Effect::PresetSelected(self.background))
                }
                None => {
                    self.transcript.push_output(format!(
                        "Unknown pattern: {name}. Available: {}",
                        Preset::names()
                    ));
                    None
                }
            },
            Command::LinkedIn => {
                self.transcript.push_output("Opening LinkedIn profile...");
                Some(Effect::OpenLink(self.profile_url.clone()))
            }
            Command::WhoAmI => {
                self.transcript
                    .push_output(format!("Current user: {}", self.user_name));
                None
            }
            Command::Background => {
                self.background.enabled = !self.background.enabled;
                self.transcript.push_output(if self.background.enabled {
                    "Background enabled."
                } else {
                    "Background disabled."
                });
                Some(Effect::BackgroundChanged(self.background))
            }
            Command::Help => {
                self.transcript
                    .extend(command::command_listing().into_iter().map(TranscriptLine::Output));
                None
            }
            Command::Clear => {
                self.transcript.clear();
                None
            }
            Command::Unknown(text) => {
                self.transcript.push_output(format!(
                    "Command not found: {text}. Type HELP for available commands."
                ));
                Some(Effect::Shake)
            }
        }
    }

    fn list_patterns(&mut self) {
        self.transcript.push_output("Background patterns:");
        for preset in Preset::ALL {
            let marker = if self.background.enabled && preset == self.background.preset {
                "*"
            } else {
                " "
            };
            self.transcript
                .push_output(format!(" {marker} {}", preset.name()));
        }
        if !self.background.enabled {
            self.transcript
                .push_output("Background is disabled. Type BACKGROUND to enable it.");
        }
    }

    /// Report the outcome of a message delivery
    pub fn message_delivered(&mut self, name: &str, delivered: bool) {
        if delivered {
            self.transcript
                .push_output(format!("Message sent successfully! Thanks {name}!"));
        } else {
            self.transcript.push_output(SEND_FAILED);
        }
    }
}
