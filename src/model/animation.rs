//! Window transition animations
//!
//! An [`Animation`] is a named transition started at a logical instant. It is
//! sampled with the current instant to get a [`Transform`] that the view
//! applies to the window rectangle. Nothing here reads a clock.

use ratatui::layout::Rect;
use std::f32::consts::PI;
use std::time::{Duration, Instant};

/// Horizontal shake keyframes in cells, played after an unknown command
const SHAKE_KEYFRAMES: [f32; 5] = [-2.0, 2.0, -2.0, 2.0, 0.0];

/// The transitions a window can play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// First appearance: scale up from 0.8 with an elastic settle
    Entrance,
    /// Horizontal shake
    Shake,
    /// Shrink and fade before a close
    Exit,
    /// Drop in from above the viewport with overshoot
    ReEnter,
    /// Collapse towards the dock
    Minimize,
    /// Reverse of `Minimize`, with a bounce
    Restore,
}

impl AnimationKind {
    pub fn delay(self) -> Duration {
        match self {
            AnimationKind::Entrance => Duration::from_millis(200),
            _ => Duration::ZERO,
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            AnimationKind::Entrance => Duration::from_millis(1000),
            AnimationKind::Shake => Duration::from_millis(400),
            AnimationKind::Exit => Duration::from_millis(300),
            AnimationKind::ReEnter => Duration::from_millis(800),
            AnimationKind::Minimize => Duration::from_millis(300),
            AnimationKind::Restore => Duration::from_millis(600),
        }
    }

    /// Delay plus duration
    pub fn total(self) -> Duration {
        self.delay() + self.duration()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    kind: AnimationKind,
    started_at: Instant,
}

impl Animation {
    pub fn new(kind: AnimationKind, now: Instant) -> Self {
        Self {
            kind,
            started_at: now,
        }
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn ends_at(&self) -> Instant {
        self.started_at + self.kind.total()
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now >= self.ends_at()
    }

    /// Linear progress in [0, 1]; negative while still in the start delay
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        let delay = self.kind.delay();
        if elapsed < delay {
            return -1.0;
        }
        let t = (elapsed - delay).as_secs_f32() / self.kind.duration().as_secs_f32();
        t.min(1.0)
    }

    /// Sample the transform for a window drawn at `rect` inside `bounds`
    pub fn sample(&self, now: Instant, rect: Rect, bounds: Rect) -> Transform {
        let p = self.progress(now);
        match self.kind {
            AnimationKind::Entrance => {
                if p < 0.0 {
                    return Transform::HIDDEN;
                }
                Transform {
                    scale: 0.8 + 0.2 * elastic_out(p),
                    dim: p < 0.3,
                    ..Transform::IDENTITY
                }
            }
            AnimationKind::Shake => Transform {
                dx: shake_offset(p).round() as i32,
                ..Transform::IDENTITY
            },
            AnimationKind::Exit => Transform {
                scale: 1.0 - 0.2 * ease_in_quad(p),
                dim: true,
                visible: p < 1.0,
                ..Transform::IDENTITY
            },
            AnimationKind::ReEnter => {
                let travel = (rect.y + rect.height) as f32;
                Transform {
                    dy: (-(1.0 - back_out(p)) * travel).round() as i32,
                    ..Transform::IDENTITY
                }
            }
            AnimationKind::Minimize => {
                let q = ease_in_quad(p);
                Transform {
                    scale: 1.0 - 0.9 * q,
                    dy: (q * dock_travel(rect, bounds)).round() as i32,
                    dim: true,
                    visible: p < 1.0,
                    ..Transform::IDENTITY
                }
            }
            AnimationKind::Restore => {
                let q = 1.0 - bounce_out(p);
                Transform {
                    scale: 1.0 - 0.9 * q,
                    dy: (q * dock_travel(rect, bounds)).round() as i32,
                    dim: q > 0.5,
                    ..Transform::IDENTITY
                }
            }
        }
    }
}

/// Distance from the window's centre row to the bottom of the viewport
fn dock_travel(rect: Rect, bounds: Rect) -> f32 {
    let center = rect.y as f32 + rect.height as f32 / 2.0;
    (bounds.bottom() as f32 - center).max(0.0)
}

fn shake_offset(p: f32) -> f32 {
    let segments = (SHAKE_KEYFRAMES.len() - 1) as f32;
    let pos = p.clamp(0.0, 1.0) * segments;
    let index = (pos.floor() as usize).min(SHAKE_KEYFRAMES.len() - 2);
    let local = ease_in_out_sine(pos - index as f32);
    let (from, to) = (SHAKE_KEYFRAMES[index], SHAKE_KEYFRAMES[index + 1]);
    from + (to - from) * local
}

/// Geometric change applied to a window rectangle for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub dx: i32,
    pub dy: i32,
    /// Scale around the rectangle's centre
    pub scale: f32,
    /// Draw with dimmed colours (stands in for partial opacity)
    pub dim: bool,
    pub visible: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        dx: 0,
        dy: 0,
        scale: 1.0,
        dim: false,
        visible: true,
    };

    pub const HIDDEN: Transform = Transform {
        visible: false,
        ..Transform::IDENTITY
    };

    /// Apply to `rect` and clip to `bounds`. `None` when nothing is left to draw.
    pub fn apply(&self, rect: Rect, bounds: Rect) -> Option<Rect> {
        if !self.visible {
            return None;
        }

        let scale = self.scale.clamp(0.0, 1.0);
        let width = (rect.width as f32 * scale).round() as i32;
        let height = (rect.height as f32 * scale).round() as i32;
        if width < 2 || height < 2 {
            return None;
        }

        let cx = rect.x as i32 + rect.width as i32 / 2;
        let cy = rect.y as i32 + rect.height as i32 / 2;
        let left = cx - width / 2 + self.dx;
        let top = cy - height / 2 + self.dy;

        let clip_left = left.max(bounds.left() as i32);
        let clip_top = top.max(bounds.top() as i32);
        let clip_right = (left + width).min(bounds.right() as i32);
        let clip_bottom = (top + height).min(bounds.bottom() as i32);
        if clip_right <= clip_left || clip_bottom <= clip_top {
            return None;
        }

        Some(Rect::new(
            clip_left as u16,
            clip_top as u16,
            (clip_right - clip_left) as u16,
            (clip_bottom - clip_top) as u16,
        ))
    }
}

fn ease_in_quad(t: f32) -> f32 {
    t * t
}

fn ease_in_out_sine(t: f32) -> f32 {
    -((PI * t).cos() - 1.0) / 2.0
}

/// Elastic ease-out (amplitude 1, period 0.5)
fn elastic_out(t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let period = 0.5;
    let s = period / 4.0;
    2f32.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / period).sin() + 1.0
}

/// Ease-out that overshoots past 1 before settling
fn back_out(t: f32) -> f32 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
}

fn bounce_out(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;
    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}
