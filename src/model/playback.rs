//! Introductory typing playback
//!
//! Types the introduction text into the transcript one character at a time,
//! then lists the available commands. Every step is scheduled relative to the
//! previous one, so a late tick catches up to exactly the state the
//! schedule prescribes for `now`.

use super::transcript::{Transcript, TranscriptLine};
use std::time::{Duration, Instant};

/// Transcript entry that the typed text is written into
const TYPED_ENTRY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    NotStarted,
    /// Command echo shown, waiting for the introduction text
    CommandEcho,
    /// Next step writes the first `ch` characters of line `line`
    Typing { line: usize, ch: usize },
    /// Text fully typed, command listing due
    CommandsPending,
    Complete,
}

#[derive(Debug, Clone)]
pub struct IntroPlayback {
    phase: PlaybackPhase,
    lines: Option<Vec<String>>,
    char_delay: Duration,
    commands_pause: Duration,
    next_at: Option<Instant>,
}

impl IntroPlayback {
    pub fn new(char_delay: Duration, commands_pause: Duration) -> Self {
        Self {
            phase: PlaybackPhase::NotStarted,
            lines: None,
            char_delay,
            commands_pause,
            next_at: None,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == PlaybackPhase::Complete
    }

    /// True while steps are scheduled
    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    /// Show the command echo. Typing begins once the text is available.
    pub fn start(&mut self, echo: String, transcript: &mut Transcript, now: Instant) {
        if self.phase != PlaybackPhase::NotStarted {
            return;
        }
        transcript.clear();
        transcript.push(TranscriptLine::Command(echo));
        self.phase = PlaybackPhase::CommandEcho;
        if self.lines.is_some() {
            self.begin_typing(now);
        }
    }

    /// Provide the introduction text (or the error text that replaces it)
    pub fn set_text(&mut self, text: &str, now: Instant) {
        if self.lines.is_some() {
            return;
        }
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        self.lines = Some(lines);
        if self.phase == PlaybackPhase::CommandEcho {
            self.begin_typing(now);
        }
    }

    fn begin_typing(&mut self, now: Instant) {
        tracing::debug!("Intro playback typing started");
        self.phase = PlaybackPhase::Typing { line: 0, ch: 0 };
        self.next_at = Some(now);
    }

    /// Run every step due at or before `now`. `listing` is appended after the
    /// typed text, surrounded by blank lines.
    ///
    /// Returns true if the transcript changed.
    pub fn advance(&mut self, now: Instant, transcript: &mut Transcript, listing: &[String]) -> bool {
        let mut changed = false;
        while let Some(due) = self.next_at {
            if due > now {
                break;
            }
            changed |= self.step(due, transcript, listing);
        }
        changed
    }

    fn step(&mut self, due: Instant, transcript: &mut Transcript, listing: &[String]) -> bool {
        let Self {
            phase,
            lines,
            char_delay,
            commands_pause,
            next_at,
        } = self;
        let lines = lines.as_deref().unwrap_or_default();

        match *phase {
            PlaybackPhase::Typing { line, .. } if line >= lines.len() => {
                *phase = PlaybackPhase::CommandsPending;
                *next_at = Some(due + *commands_pause);
                false
            }
            PlaybackPhase::Typing { line, ch } => {
                let current = &lines[line];
                if ch <= current.chars().count() {
                    let mut text = lines[..line].join("\n");
                    if line > 0 {
                        text.push('\n');
                    }
                    text.extend(current.chars().take(ch));
                    transcript.replace_or_push(TYPED_ENTRY, TranscriptLine::Output(text));
                    *phase = PlaybackPhase::Typing { line, ch: ch + 1 };
                    *next_at = Some(due + *char_delay);
                    true
                } else {
                    *phase = PlaybackPhase::Typing {
                        line: line + 1,
                        ch: 0,
                    };
                    *next_at = Some(due + *char_delay * 2);
                    false
                }
            }
            PlaybackPhase::CommandsPending => {
                transcript.push_output("");
                transcript.extend(listing.iter().cloned().map(TranscriptLine::Output));
                transcript.push_output("");
                *phase = PlaybackPhase::Complete;
                *next_at = None;
                tracing::debug!("Intro playback complete");
                true
            }
            PlaybackPhase::NotStarted | PlaybackPhase::CommandEcho | PlaybackPhase::Complete => {
                *next_at = None;
                false
            }
        }
    }

    /// Logical duration from the start of typing until `Complete`
    pub fn total_duration(&self) -> Option<Duration> {
        let lines = self.lines.as_ref()?;
        let steps: u32 = lines
            .iter()
            .map(|line| line.chars().count() as u32 + 3)
            .sum();
        Some(self.char_delay * steps + self.commands_pause)
    }
}
