//! Indexed color palettes for drawing particles.
//!
//! A particle's color is picked by its slot in the snapshot
//! (`index % palette.len()`), not by any per-particle property, so the same
//! slot keeps its color across ticks and rebuilds.

use crate::color::Srgb;
use crate::error::SwarmError;

/// Names accepted by [`Palette::from_name`], in display order.
const PALETTE_NAMES: &[&str] = &["muted"];

/// An ordered list of colors indexed cyclically.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from a list of colors. Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, SwarmError> {
        if colors.is_empty() {
            return Err(SwarmError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex strings ("#rrggbb" or "rrggbb").
    pub fn from_hex(hexes: &[&str]) -> Result<Self, SwarmError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, SwarmError> {
        match name {
            "muted" => Ok(Self::muted()),
            other => Err(SwarmError::InvalidPalette(format!(
                "unknown palette '{other}', expected one of: {}",
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    /// Parses either a built-in name or a comma-separated hex list such as
    /// `"#ff0000, #00ff00"`.
    pub fn parse(spec: &str) -> Result<Self, SwarmError> {
        if !spec.contains(',') && !spec.trim_start().starts_with('#') {
            return Self::from_name(spec.trim());
        }
        let hexes: Vec<&str> = spec
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .collect();
        Self::from_hex(&hexes)
    }

    /// Names of all built-in palettes.
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a snapshot slot, cycling through the palette.
    pub fn color_at(&self, index: usize) -> Srgb {
        self.colors[index % self.colors.len()]
    }

    /// The colors in order.
    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    // -- Built-in palettes --

    /// The default five muted pastels: teal, peach, mint, mauve, sage.
    pub fn muted() -> Self {
        Self {
            colors: vec![
                Srgb::new(0.2, 0.7, 0.6),
                Srgb::new(1.0, 0.8, 0.6),
                Srgb::new(0.6, 1.0, 0.8),
                Srgb::new(0.8, 0.6, 0.7),
                Srgb::new(0.6, 0.8, 0.7),
            ],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::muted()
    }
}
