//! Terminal mode management
//!
//! termfolio needs raw mode and the alternate screen to draw at all, mouse
//! capture for dragging and the window buttons, and bracketed paste so a
//! pasted command lands in the prompt in one piece. [`TerminalModes`]
//! records the modes that were actually switched on and reverts them in
//! reverse order.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{self, stdout, Write};

/// One terminal setting that is switched on at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Raw,
    AlternateScreen,
    MouseCapture,
    BracketedPaste,
}

impl Mode {
    /// Order of activation; teardown runs the other way
    const STARTUP: [Mode; 4] = [
        Mode::Raw,
        Mode::AlternateScreen,
        Mode::MouseCapture,
        Mode::BracketedPaste,
    ];

    /// Without these there is nothing to draw on
    fn required(self) -> bool {
        matches!(self, Mode::Raw | Mode::AlternateScreen)
    }

    fn turn_on(self) -> io::Result<()> {
        match self {
            Mode::Raw => enable_raw_mode(),
            Mode::AlternateScreen => stdout().execute(EnterAlternateScreen).map(drop),
            Mode::MouseCapture => stdout().execute(EnableMouseCapture).map(drop),
            Mode::BracketedPaste => stdout().execute(EnableBracketedPaste).map(drop),
        }
    }

    fn turn_off(self) -> io::Result<()> {
        match self {
            Mode::Raw => disable_raw_mode(),
            Mode::AlternateScreen => stdout().execute(LeaveAlternateScreen).map(drop),
            Mode::MouseCapture => stdout().execute(DisableMouseCapture).map(drop),
            Mode::BracketedPaste => stdout().execute(DisableBracketedPaste).map(drop),
        }
    }
}

#[derive(Debug, Default)]
pub struct TerminalModes {
    /// Modes switched on so far, in activation order
    active: Vec<Mode>,
}

impl TerminalModes {
    /// Switch every mode on. A failing required mode reverts what was done
    /// and returns the error; optional modes only log a warning.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::default();

        for mode in Mode::STARTUP {
            match mode.turn_on() {
                Ok(()) => {
                    tracing::debug!("Enabled {:?}", mode);
                    modes.active.push(mode);
                }
                Err(e) if mode.required() => {
                    tracing::error!("Failed to enable {:?}: {}", mode, e);
                    modes.undo();
                    return Err(e.into());
                }
                Err(e) => tracing::warn!("Failed to enable {:?}, continuing without it: {}", mode, e),
            }
        }

        Ok(modes)
    }

    pub fn is_active(&self, mode: Mode) -> bool {
        self.active.contains(&mode)
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn undo(&mut self) {
        let _ = stdout().execute(Show);
        while let Some(mode) = self.active.pop() {
            if let Err(e) = mode.turn_off() {
                tracing::debug!("Failed to disable {:?}: {}", mode, e);
            }
        }
        let _ = stdout().flush();
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Restore the terminal without a `TerminalModes` at hand (panic hook)
pub fn emergency_cleanup() {
    let _ = stdout().execute(Show);
    for mode in Mode::STARTUP.into_iter().rev() {
        let _ = mode.turn_off();
    }
    let _ = stdout().flush();
}
