//! Animated background behind the terminal window
//!
//! The renderer is an opaque collaborator behind [`BackgroundRenderer`]: the
//! rest of the application only starts it with a preset, stops it, and tells
//! it about resizes. [`Background`] keeps the renderer in step with the
//! session's [`BackgroundSelection`] and owns the auto-cycle timer.

mod procedural;

pub use procedural::ProceduralBackground;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

/// One of the fixed background configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Voronoi,
    Oscillator,
    Noise,
    Plasma,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Voronoi,
        Preset::Oscillator,
        Preset::Noise,
        Preset::Plasma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Voronoi => "voronoi",
            Preset::Oscillator => "oscillator",
            Preset::Noise => "noise",
            Preset::Plasma => "plasma",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Preset> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    /// The preset after this one, wrapping around
    pub fn next(self) -> Preset {
        let index = Self::ALL
            .iter()
            .position(|p| *p == self)
            .unwrap_or_default();
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Comma-separated list of all preset names
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Whether the background is mounted, and with which preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundSelection {
    pub enabled: bool,
    pub preset: Preset,
}

/// Narrow interface to a background renderer
pub trait BackgroundRenderer: Send {
    /// Start (or switch to) the given preset
    fn start(&mut self, preset: Preset);

    /// Stop rendering; `render` draws nothing until the next `start`
    fn stop(&mut self);

    /// Inform the renderer of the new drawing surface size
    fn resize(&mut self, width: u16, height: u16);

    /// The preset currently running, if any
    fn active_preset(&self) -> Option<Preset>;

    /// Draw one frame into `area`, `elapsed` since the renderer was created
    fn render(&self, buf: &mut Buffer, area: Rect, elapsed: Duration);

    fn is_running(&self) -> bool {
        self.active_preset().is_some()
    }
}

/// Switches to the next preset on a fixed interval while armed
#[derive(Debug, Clone)]
pub struct PresetCycler {
    interval: Option<Duration>,
    next_at: Option<Instant>,
}

impl PresetCycler {
    /// A zero interval disables cycling entirely
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: (!interval.is_zero()).then_some(interval),
            next_at: None,
        }
    }

    /// (Re)start the timer from `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_at = self.interval.map(|interval| now + interval);
    }

    pub fn disarm(&mut self) {
        self.next_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_at.is_some()
    }

    /// Returns true once per elapsed interval
    pub fn poll(&mut self, now: Instant) -> bool {
        match (self.next_at, self.interval) {
            (Some(due), Some(interval)) if now >= due => {
                self.next_at = Some(now + interval);
                true
            }
            _ => false,
        }
    }
}

/// Keeps a renderer in sync with the selection and drives auto-cycling
pub struct Background {
    renderer: Box<dyn BackgroundRenderer>,
    cycler: PresetCycler,
    started_at: Instant,
}

impl Background {
    pub fn new(
        renderer: Box<dyn BackgroundRenderer>,
        cycle_interval: Duration,
        now: Instant,
    ) -> Self {
        Self {
            renderer,
            cycler: PresetCycler::new(cycle_interval),
            started_at: now,
        }
    }

    /// Mount, unmount or switch the renderer to match `selection`.
    ///
    /// Returns true if anything changed.
    pub fn apply(&mut self, selection: BackgroundSelection, now: Instant) -> bool {
        if !selection.enabled {
            if self.renderer.is_running() {
                tracing::debug!("Stopping background renderer");
                self.renderer.stop();
                self.cycler.disarm();
                return true;
            }
            return false;
        }

        if self.renderer.active_preset() == Some(selection.preset) {
            return false;
        }

        tracing::debug!("Starting background preset {}", selection.preset.name());
        self.renderer.start(selection.preset);
        self.cycler.arm(now);
        true
    }

    /// Explicit preset choice: start (or keep) the preset and restart the
    /// auto-cycle countdown from `now` even when nothing else changed.
    pub fn select(&mut self, selection: BackgroundSelection, now: Instant) {
        self.apply(selection, now);
        if selection.enabled {
            self.cycler.arm(now);
        }
    }

    /// Advance the auto-cycle timer; returns the preset to switch to when it fires
    pub fn poll_cycle(&mut self, now: Instant) -> Option<Preset> {
        if !self.renderer.is_running() {
            return None;
        }
        if self.cycler.poll(now) {
            self.renderer.active_preset().map(Preset::next)
        } else {
            None
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.renderer.resize(width, height);
    }

    pub fn is_running(&self) -> bool {
        self.renderer.is_running()
    }

    pub fn active_preset(&self) -> Option<Preset> {
        self.renderer.active_preset()
    }

    pub fn render(&self, buf: &mut Buffer, area: Rect, now: Instant) {
        if self.renderer.is_running() {
            let elapsed = now.saturating_duration_since(self.started_at);
            self.renderer.render(buf, area, elapsed);
        }
    }
}
