//! Procedural cell-based background renderer
//!
//! Each preset is a scalar field `f(x, y, t) -> [0, 1]` sampled once per
//! cell and mapped to a shade glyph and a colour ramp.

use super::{BackgroundRenderer, Preset};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use std::time::Duration;

/// Glyphs from darkest to brightest
const SHADES: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Number of moving seeds in the voronoi preset
const VORONOI_SEEDS: usize = 7;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

#[derive(Debug, Clone, Default)]
pub struct ProceduralBackground {
    preset: Option<Preset>,
    /// Last known surface size (width, height)
    size: (u16, u16),
}

impl ProceduralBackground {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the field for `preset` at normalized coordinates
    fn sample(preset: Preset, nx: f32, ny: f32, t: f32) -> f32 {
        let v = match preset {
            Preset::Voronoi => voronoi(nx, ny, t),
            Preset::Oscillator => oscillator(nx, ny, t),
            Preset::Noise => fractal_noise(nx * 6.0 + t * 0.3, ny * 6.0 - t * 0.2),
            Preset::Plasma => plasma(nx, ny, t),
        };
        v.clamp(0.0, 1.0)
    }

    fn palette(preset: Preset) -> ((u8, u8, u8), (u8, u8, u8)) {
        match preset {
            Preset::Voronoi => ((10, 10, 18), (200, 220, 255)),
            Preset::Oscillator => ((5, 20, 10), (90, 255, 160)),
            Preset::Noise => ((20, 8, 24), (230, 120, 255)),
            Preset::Plasma => ((30, 5, 5), (255, 190, 60)),
        }
    }
}

impl BackgroundRenderer for ProceduralBackground {
    fn start(&mut self, preset: Preset) {
        self.preset = Some(preset);
    }

    fn stop(&mut self) {
        self.preset = None;
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
    }

    fn active_preset(&self) -> Option<Preset> {
        self.preset
    }

    fn render(&self, buf: &mut Buffer, area: Rect, elapsed: Duration) {
        let Some(preset) = self.preset else {
            return;
        };
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        // Normalize against the last known surface so the pattern does not
        // jump when only part of the screen is redrawn.
        let width = self.size.0.max(area.width).max(1) as f32;
        let t = elapsed.as_secs_f32();
        let (dark, bright) = Self::palette(preset);

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let nx = x as f32 / width;
                let ny = y as f32 * CELL_ASPECT / width;
                let v = Self::sample(preset, nx, ny, t);

                let shade = SHADES[((v * (SHADES.len() - 1) as f32).round() as usize)
                    .min(SHADES.len() - 1)];
                let color = Color::Rgb(
                    lerp_u8(dark.0, bright.0, v),
                    lerp_u8(dark.1, bright.1, v),
                    lerp_u8(dark.2, bright.2, v),
                );
                buf[(x, y)].set_char(shade).set_fg(color);
            }
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

/// Distance between the two closest moving seeds: bright along cell edges
fn voronoi(nx: f32, ny: f32, t: f32) -> f32 {
    let mut d1 = f32::MAX;
    let mut d2 = f32::MAX;
    for i in 0..VORONOI_SEEDS {
        let fi = i as f32;
        let speed = 0.15 + 0.05 * fi;
        let sx = 0.5 + 0.45 * (t * speed + fi * 1.7).sin();
        let sy = 0.5 + 0.45 * (t * speed * 0.8 + fi * 2.3).cos();
        let d = ((nx - sx).powi(2) + (ny - sy).powi(2)).sqrt();
        if d < d1 {
            d2 = d1;
            d1 = d;
        } else if d < d2 {
            d2 = d;
        }
    }
    let edge = 1.0 - ((d2 - d1) * 12.0).min(1.0);
    (edge * edge).max(0.15 * (1.0 - d1 * 3.0))
}

fn oscillator(nx: f32, ny: f32, t: f32) -> f32 {
    let angle = t.sin() * 0.5;
    let rx = nx * angle.cos() - ny * angle.sin();
    let band = (rx * 48.0 + t * 1.5 + (ny * 7.0 + t).sin() * 2.0).sin();
    0.5 + 0.5 * band
}

fn plasma(nx: f32, ny: f32, t: f32) -> f32 {
    let a = (nx * 10.0 + t).sin();
    let b = (ny * 8.0 - t * 0.7).sin();
    let c = ((nx + ny) * 6.0 + t * 0.5).sin();
    let cx = nx - 0.5 + 0.3 * (t * 0.3).sin();
    let cy = ny - 0.5 + 0.3 * (t * 0.4).cos();
    let d = ((cx * cx + cy * cy).sqrt() * 14.0 - t).sin();
    (a + b + c + d + 4.0) / 8.0
}

/// Integer lattice hash to [0, 1)
fn hash2(ix: i32, iy: i32) -> f32 {
    let mut h = (ix as u32)
        .wrapping_mul(0x27d4_eb2d)
        .wrapping_add((iy as u32).wrapping_mul(0x1656_67b1));
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    (h & 0x00ff_ffff) as f32 / 0x0100_0000 as f32
}

fn value_noise(x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (ix, iy) = (x0 as i32, y0 as i32);

    let smooth = |v: f32| v * v * (3.0 - 2.0 * v);
    let (sx, sy) = (smooth(fx), smooth(fy));

    let top = hash2(ix, iy) + (hash2(ix + 1, iy) - hash2(ix, iy)) * sx;
    let bottom = hash2(ix, iy + 1) + (hash2(ix + 1, iy + 1) - hash2(ix, iy + 1)) * sx;
    top + (bottom - top) * sy
}

fn fractal_noise(x: f32, y: f32) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    for _ in 0..3 {
        total += value_noise(x * frequency, y * frequency) * amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    total / 0.875
}
