//! Window lifecycle state machine
//!
//! `WindowState` is a reducer: pointer and keyboard gestures arrive as
//! [`WindowAction`]s via [`WindowState::apply`], timed transitions happen in
//! [`WindowState::advance`]. The caller supplies the viewport and the current
//! logical instant, so the whole machine is deterministic under test.
//!
//! `position` always holds the normal-mode top-left corner. Maximizing,
//! minimizing and closing never touch it, which is what lets restore and
//! re-entry put the window back exactly where it was.

use super::animation::{Animation, AnimationKind, Transform};
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};

/// How long the window stays hidden between the exit and re-entry animations
pub const CLOSED_HIDDEN_FOR: Duration = Duration::from_millis(1500);

/// Width of the dock affordance shown while minimized
const DOCK_WIDTH: u16 = 24;

/// Cells each header button occupies
const BUTTON_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Normal,
    Maximized,
    Minimized,
    Closed,
}

/// Gestures and commands the window reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    /// Pointer pressed; starts a drag if it lands on the header away from
    /// the buttons
    PressHeader { column: u16, row: u16 },
    DragTo { column: u16, row: u16 },
    Release,
    Minimize,
    ToggleMaximize,
    Close,
    Restore,
    Shake,
    /// The viewport changed size (the new viewport is passed to `apply`)
    Resize,
}

/// What a pointer position lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowHit {
    Close,
    Minimize,
    Maximize,
    Header,
    Content,
}

/// Where the close sequence is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseSequence {
    Exiting,
    Hidden { reenter_at: Instant },
}

/// Offset between the pointer and the window's top-left at press time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grab {
    dx: u16,
    dy: u16,
}

/// Cell rectangles of the window's parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    pub frame: Rect,
    /// Top border row, carrying the buttons and the title
    pub header: Rect,
    pub close: Rect,
    pub minimize: Rect,
    pub maximize: Rect,
    /// Inside the borders, below the header
    pub content: Rect,
}

impl WindowLayout {
    pub fn new(frame: Rect) -> Self {
        let header = Rect::new(frame.x, frame.y, frame.width, frame.height.min(1));
        let button = |index: u16| {
            let x = frame.x.saturating_add(1 + index * BUTTON_WIDTH);
            let width = BUTTON_WIDTH.min(frame.right().saturating_sub(x));
            Rect::new(x, frame.y, width, header.height)
        };
        let content = Rect::new(
            frame.x.saturating_add(1),
            frame.y.saturating_add(1),
            frame.width.saturating_sub(2),
            frame.height.saturating_sub(2),
        );
        Self {
            frame,
            header,
            close: button(0),
            minimize: button(1),
            maximize: button(2),
            content,
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<WindowHit> {
        let pos = Position::new(column, row);
        if !self.frame.contains(pos) {
            return None;
        }
        if self.close.contains(pos) {
            Some(WindowHit::Close)
        } else if self.minimize.contains(pos) {
            Some(WindowHit::Minimize)
        } else if self.maximize.contains(pos) {
            Some(WindowHit::Maximize)
        } else if self.header.contains(pos) {
            Some(WindowHit::Header)
        } else {
            Some(WindowHit::Content)
        }
    }
}

/// The dock affordance: a single row centred on the bottom line
pub fn dock_rect(viewport: Rect) -> Rect {
    let width = DOCK_WIDTH.min(viewport.width);
    let x = viewport.x + (viewport.width - width) / 2;
    let y = viewport.bottom().saturating_sub(1).max(viewport.y);
    Rect::new(x, y, width, viewport.height.min(1))
}

#[derive(Debug, Clone)]
pub struct WindowState {
    mode: WindowMode,
    /// Normal-mode top-left corner
    position: (u16, u16),
    /// Configured size; shrunk to fit small viewports when laid out
    size: (u16, u16),
    drag: Option<Grab>,
    animation: Option<Animation>,
    /// Rectangle the window was showing when it started to minimize or close
    leaving_from: Option<Rect>,
    close: Option<CloseSequence>,
}

impl WindowState {
    /// A window centred in `viewport`, playing its entrance animation
    pub fn new(width: u16, height: u16, viewport: Rect, now: Instant) -> Self {
        let mut state = Self {
            mode: WindowMode::Normal,
            position: (0, 0),
            size: (width, height),
            drag: None,
            animation: Some(Animation::new(AnimationKind::Entrance, now)),
            leaving_from: None,
            close: None,
        };
        state.center(viewport);
        state
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn position(&self) -> (u16, u16) {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_minimized(&self) -> bool {
        self.mode == WindowMode::Minimized
    }

    pub fn animation(&self) -> Option<AnimationKind> {
        self.animation.map(|a| a.kind())
    }

    /// True while something time-driven is still pending
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.close.is_some()
    }

    /// The window size after fitting it into `viewport`
    fn fitted_size(&self, viewport: Rect) -> (u16, u16) {
        (
            self.size.0.min(viewport.width),
            self.size.1.min(viewport.height),
        )
    }

    /// Clamp a candidate top-left so the whole window stays in `viewport`
    fn clamp_position(&self, x: i32, y: i32, viewport: Rect) -> (u16, u16) {
        let (w, h) = self.fitted_size(viewport);
        let min_x = viewport.x as i32;
        let min_y = viewport.y as i32;
        let max_x = (viewport.right() - w) as i32;
        let max_y = (viewport.bottom() - h) as i32;
        (x.clamp(min_x, max_x) as u16, y.clamp(min_y, max_y) as u16)
    }

    fn center(&mut self, viewport: Rect) {
        let (w, h) = self.fitted_size(viewport);
        self.position = (
            viewport.x + (viewport.width - w) / 2,
            viewport.y + (viewport.height - h) / 2,
        );
    }

    /// Normal-mode rectangle in `viewport`
    pub fn normal_rect(&self, viewport: Rect) -> Rect {
        let (w, h) = self.fitted_size(viewport);
        let (x, y) = self.clamp_position(self.position.0 as i32, self.position.1 as i32, viewport);
        Rect::new(x, y, w, h)
    }

    /// Maximized rectangle: the viewport minus the dock row
    pub fn maximized_rect(viewport: Rect) -> Rect {
        Rect::new(
            viewport.x,
            viewport.y,
            viewport.width,
            viewport.height.saturating_sub(1).max(1).min(viewport.height),
        )
    }

    /// Resting rectangle for the current mode, `None` when hidden
    pub fn frame(&self, viewport: Rect) -> Option<Rect> {
        match self.mode {
            WindowMode::Normal => Some(self.normal_rect(viewport)),
            WindowMode::Maximized => Some(Self::maximized_rect(viewport)),
            WindowMode::Minimized | WindowMode::Closed => None,
        }
    }

    /// Interactive layout; `None` when the window cannot be interacted with
    pub fn layout(&self, viewport: Rect) -> Option<WindowLayout> {
        self.frame(viewport).map(WindowLayout::new)
    }

    /// Rectangle and transform to draw this frame, `None` when nothing shows
    pub fn visible_frame(&self, viewport: Rect, now: Instant) -> Option<(Rect, Transform)> {
        let base = match (self.frame(viewport), self.leaving_from) {
            (Some(rect), _) => rect,
            (None, Some(rect)) if self.animation.is_some() => rect,
            _ => return None,
        };
        let transform = self
            .animation
            .map(|anim| anim.sample(now, base, viewport))
            .unwrap_or(Transform::IDENTITY);
        transform.visible.then_some((base, transform))
    }

    /// Whether the dock should be shown
    pub fn dock_visible(&self) -> bool {
        self.mode == WindowMode::Minimized
    }

    pub fn apply(&mut self, action: WindowAction, viewport: Rect, now: Instant) {
        tracing::trace!("window action {:?} in mode {:?}", action, self.mode);
        match action {
            WindowAction::PressHeader { column, row } => {
                if self.mode != WindowMode::Normal {
                    return;
                }
                let layout = WindowLayout::new(self.normal_rect(viewport));
                if layout.hit(column, row) == Some(WindowHit::Header) {
                    self.position = (layout.frame.x, layout.frame.y);
                    self.drag = Some(Grab {
                        dx: column - layout.frame.x,
                        dy: row - layout.frame.y,
                    });
                }
            }
            WindowAction::DragTo { column, row } => {
                if let Some(grab) = self.drag {
                    self.position = self.clamp_position(
                        column as i32 - grab.dx as i32,
                        row as i32 - grab.dy as i32,
                        viewport,
                    );
                }
            }
            WindowAction::Release => {
                self.drag = None;
            }
            WindowAction::Minimize => {
                if !matches!(self.mode, WindowMode::Normal | WindowMode::Maximized) {
                    return;
                }
                tracing::debug!("Minimizing window");
                self.leaving_from = self.frame(viewport);
                self.drag = None;
                self.mode = WindowMode::Minimized;
                self.animation = Some(Animation::new(AnimationKind::Minimize, now));
            }
            WindowAction::Restore => {
                if self.mode != WindowMode::Minimized {
                    return;
                }
                tracing::debug!("Restoring window to {:?}", self.position);
                self.mode = WindowMode::Normal;
                self.leaving_from = None;
                self.animation = Some(Animation::new(AnimationKind::Restore, now));
            }
            WindowAction::ToggleMaximize => {
                self.drag = None;
                self.mode = match self.mode {
                    WindowMode::Normal => WindowMode::Maximized,
                    WindowMode::Maximized => WindowMode::Normal,
                    other => other,
                };
            }
            WindowAction::Close => {
                if !matches!(self.mode, WindowMode::Normal | WindowMode::Maximized) {
                    return;
                }
                tracing::debug!("Closing window");
                self.leaving_from = self.frame(viewport);
                self.drag = None;
                self.mode = WindowMode::Closed;
                self.close = Some(CloseSequence::Exiting);
                self.animation = Some(Animation::new(AnimationKind::Exit, now));
            }
            WindowAction::Shake => {
                if matches!(self.mode, WindowMode::Normal | WindowMode::Maximized) {
                    self.animation = Some(Animation::new(AnimationKind::Shake, now));
                }
            }
            WindowAction::Resize => {
                self.drag = None;
                self.center(viewport);
            }
        }
    }

    /// Finish elapsed animations and run the close sequence.
    ///
    /// Returns true if anything visible changed state.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(anim) = self.animation {
            if anim.is_finished(now) {
                self.animation = None;
                changed = true;
                if anim.kind() == AnimationKind::Exit {
                    self.close = Some(CloseSequence::Hidden {
                        reenter_at: anim.ends_at() + CLOSED_HIDDEN_FOR,
                    });
                }
                if matches!(anim.kind(), AnimationKind::Exit | AnimationKind::Minimize) {
                    self.leaving_from = None;
                }
            }
        }

        if let Some(CloseSequence::Hidden { reenter_at }) = self.close {
            if now >= reenter_at {
                tracing::debug!("Window re-entering at {:?}", self.position);
                self.close = None;
                self.mode = WindowMode::Normal;
                self.animation = Some(Animation::new(AnimationKind::ReEnter, reenter_at));
                changed = true;
                // A long gap between ticks may already be past the re-entry
                self.advance(now);
            }
        }

        changed
    }
}
