//! Glyph shapes and their rasterization into alpha masks.
//!
//! Shapes are described analytically in a unit square (y pointing down) and
//! rasterized with supersampled coverage, so edges get partial alpha the same
//! way a symbol renderer would antialias them. The sampler later keeps only
//! pixels at or above the alpha threshold.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::SwarmError;
use crate::mask::AlphaMask;

/// Subsamples per pixel along each axis.
const SUPERSAMPLE: usize = 4;

// Question mark geometry, unit square coordinates.
const HOOK_CENTER: (f64, f64) = (0.5, 0.30);
const HOOK_OUTER: f64 = 0.24;
const HOOK_INNER: f64 = 0.12;
/// The hook is open between straight down (pi/2) and this angle.
const HOOK_GAP_END: f64 = 0.9 * PI;
const STEM_X: (f64, f64) = (0.44, 0.56);
const STEM_Y: (f64, f64) = (0.42, 0.66);
const DOT_CENTER: (f64, f64) = (0.5, 0.84);
const DOT_RADIUS: f64 = 0.08;

/// A glyph particles can be sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Filled disc spanning the whole box (`circle.fill`).
    Circle,
    /// Question mark glyph (`questionmark`).
    QuestionMark,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Circle, Shape::QuestionMark];

    /// Symbol id used to select this glyph.
    pub fn symbol(self) -> &'static str {
        match self {
            Shape::Circle => "circle.fill",
            Shape::QuestionMark => "questionmark",
        }
    }

    /// Looks up a glyph by symbol id.
    pub fn from_symbol(symbol: &str) -> Result<Self, SwarmError> {
        Shape::ALL
            .into_iter()
            .find(|s| s.symbol() == symbol)
            .ok_or_else(|| SwarmError::UnknownShape(symbol.to_string()))
    }

    /// Whether unit-square point `(u, v)` lies inside the glyph.
    pub fn contains(self, u: f64, v: f64) -> bool {
        match self {
            Shape::Circle => {
                let (dx, dy) = (u - 0.5, v - 0.5);
                dx * dx + dy * dy <= 0.25
            }
            Shape::QuestionMark => in_hook(u, v) || in_stem(u, v) || in_dot(u, v),
        }
    }

    /// Rasterizes the glyph into a `size x size` alpha mask, scaled to fit.
    ///
    /// Returns `SwarmError::InvalidDimensions` for a zero size.
    pub fn rasterize(self, size: usize) -> Result<AlphaMask, SwarmError> {
        let mut mask = AlphaMask::new(size, size)?;
        let step = 1.0 / (size * SUPERSAMPLE) as f64;
        let total = (SUPERSAMPLE * SUPERSAMPLE) as f64;

        for y in 0..size {
            for x in 0..size {
                let mut hits = 0usize;
                for sy in 0..SUPERSAMPLE {
                    for sx in 0..SUPERSAMPLE {
                        let u = ((x * SUPERSAMPLE + sx) as f64 + 0.5) * step;
                        let v = ((y * SUPERSAMPLE + sy) as f64 + 0.5) * step;
                        if self.contains(u, v) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    mask.set(x, y, (hits as f64 / total * 255.0).round() as u8);
                }
            }
        }
        Ok(mask)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Shape {
    type Err = SwarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::from_symbol(s)
    }
}

fn in_hook(u: f64, v: f64) -> bool {
    let (dx, dy) = (u - HOOK_CENTER.0, v - HOOK_CENTER.1);
    let r = (dx * dx + dy * dy).sqrt();
    if !(HOOK_INNER..=HOOK_OUTER).contains(&r) {
        return false;
    }
    let angle = dy.atan2(dx);
    !(angle > PI / 2.0 && angle < HOOK_GAP_END)
}

fn in_stem(u: f64, v: f64) -> bool {
    (STEM_X.0..=STEM_X.1).contains(&u) && (STEM_Y.0..=STEM_Y.1).contains(&v)
}

fn in_dot(u: f64, v: f64) -> bool {
    let (dx, dy) = (u - DOT_CENTER.0, v - DOT_CENTER.1);
    dx * dx + dy * dy <= DOT_RADIUS * DOT_RADIUS
}
