//! Swarm configuration: viewport, particle count, sampling, and timing.
//!
//! A [`SwarmConfig`] captures everything needed to recreate a swarm. Two
//! identical configs with a fixed `seed` produce bit-identical particle sets.
//! Every field has a default, so a partial JSON object is a valid config.

use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SwarmError;
use crate::mask::DEFAULT_ALPHA_THRESHOLD;
use crate::palette::Palette;

/// Visible drawing area in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Center of the listening ring: viewport center raised by `lift`.
    pub fn listening_center(&self, lift: f64) -> DVec2 {
        self.center() - DVec2::new(0.0, lift)
    }

    /// Both sides must be finite and positive.
    pub fn validate(&self) -> Result<(), SwarmError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.width) || !ok(self.height) {
            return Err(SwarmError::InvalidDimensions);
        }
        Ok(())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(390.0, 844.0)
    }
}

/// Configuration for a particle swarm and its frame scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of particles, fixed for the lifetime of the field.
    pub particle_count: usize,
    pub viewport: Viewport,
    /// Edge length of the square box glyphs are rasterized into.
    pub shape_size: usize,
    /// Minimum alpha for a mask pixel to count as inside the glyph.
    pub alpha_threshold: u8,
    /// Rejection attempts per sample before falling back to a known opaque pixel.
    pub max_sample_attempts: usize,
    /// Simulation ticks per second.
    pub tick_hz: f64,
    /// Most ticks run for a single `advance` call; older due ticks are dropped.
    pub max_catch_up: u32,
    /// Snapshot color slots: a built-in palette name or comma-separated hex colors.
    pub palette: String,
    /// PRNG seed; `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Keep each slot's previous position across a rebuild instead of
    /// scattering the new particles randomly.
    pub carry_positions: bool,
    /// How far above the viewport center the listening ring sits.
    pub listening_lift: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            viewport: Viewport::default(),
            shape_size: 360,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            max_sample_attempts: 10_000,
            tick_hz: 120.0,
            max_catch_up: 1,
            palette: "muted".to_string(),
            seed: None,
            carry_positions: false,
            listening_lift: 40.0,
        }
    }
}

impl SwarmConfig {
    /// Parses a (possibly partial) JSON config and validates it.
    pub fn from_json(json: &str) -> Result<Self, SwarmError> {
        let config: SwarmConfig = serde_json::from_str(json)
            .map_err(|e| SwarmError::InvalidConfig(format!("malformed config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), SwarmError> {
        self.viewport.validate()?;
        if self.particle_count == 0 {
            return Err(SwarmError::InvalidConfig(
                "particle_count must be at least 1".into(),
            ));
        }
        if self.shape_size == 0 {
            return Err(SwarmError::InvalidDimensions);
        }
        if self.max_sample_attempts == 0 {
            return Err(SwarmError::InvalidConfig(
                "max_sample_attempts must be at least 1".into(),
            ));
        }
        tick_period(self.tick_hz)?;
        if !self.listening_lift.is_finite() {
            return Err(SwarmError::InvalidConfig(
                "listening_lift must be finite".into(),
            ));
        }
        Palette::parse(&self.palette)?;
        Ok(())
    }

    /// Listening ring center for the configured viewport.
    pub fn listening_center(&self) -> DVec2 {
        self.viewport.listening_center(self.listening_lift)
    }

    /// The configured palette. Falls back to the default for an unparsable
    /// value; `validate` rejects those up front.
    pub fn palette(&self) -> Palette {
        Palette::parse(&self.palette).unwrap_or_default()
    }
}

/// Interval between ticks at `tick_hz`, rounded to the nearest nanosecond.
///
/// Rejects rates that are not positive, or whose period is zero or too long
/// for a `Duration`.
pub fn tick_period(tick_hz: f64) -> Result<Duration, SwarmError> {
    if !tick_hz.is_finite() || tick_hz <= 0.0 {
        return Err(SwarmError::InvalidConfig(format!(
            "tick_hz must be positive, got {tick_hz}"
        )));
    }
    let period = Duration::try_from_secs_f64(1.0 / tick_hz).map_err(|_| {
        SwarmError::InvalidConfig(format!("tick_hz {tick_hz} is too low to schedule"))
    })?;
    if period.is_zero() {
        return Err(SwarmError::InvalidConfig(format!(
            "tick_hz {tick_hz} is too high for nanosecond timing"
        )));
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let c = SwarmConfig::default();
        assert_eq!(c.particle_count, 1000);
        assert_eq!(c.shape_size, 360);
        assert_eq!(c.alpha_threshold, 128);
        assert_eq!(c.tick_hz, 120.0);
        assert_eq!(c.palette().len(), 5);
        assert!(!c.carry_positions);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn listening_center_is_raised_by_lift() {
        let c = SwarmConfig {
            viewport: Viewport::new(400.0, 800.0),
            ..SwarmConfig::default()
        };
        assert_eq!(c.listening_center(), DVec2::new(200.0, 360.0));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = SwarmConfig::from_json(r#"{"particle_count": 4, "seed": 9}"#).unwrap();
        assert_eq!(c.particle_count, 4);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.viewport, Viewport::default());
    }

    #[test]
    fn json_round_trip() {
        let c = SwarmConfig {
            particle_count: 250,
            viewport: Viewport::new(1024.0, 768.0),
            seed: Some(42),
            carry_positions: true,
            palette: "#7f7f7f, #ffffff".into(),
            ..SwarmConfig::default()
        };
        let json = serde_json::to_string_pretty(&c).unwrap();
        let back = SwarmConfig::from_json(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            SwarmConfig::from_json("{not json"),
            Err(SwarmError::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_viewport() {
        let c = SwarmConfig {
            viewport: Viewport::new(0.0, 844.0),
            ..SwarmConfig::default()
        };
        assert!(matches!(c.validate(), Err(SwarmError::InvalidDimensions)));
    }

    #[test]
    fn validate_rejects_nan_viewport() {
        let c = SwarmConfig {
            viewport: Viewport::new(f64::NAN, 844.0),
            ..SwarmConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_particles() {
        let c = SwarmConfig {
            particle_count: 0,
            ..SwarmConfig::default()
        };
        assert!(matches!(c.validate(), Err(SwarmError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_zero_shape_size() {
        let c = SwarmConfig {
            shape_size: 0,
            ..SwarmConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_tick_rate() {
        for hz in [0.0, -120.0, f64::INFINITY] {
            let c = SwarmConfig {
                tick_hz: hz,
                ..SwarmConfig::default()
            };
            assert!(c.validate().is_err(), "tick_hz {hz} accepted");
        }
    }

    #[test]
    fn validate_rejects_unrepresentable_tick_periods() {
        for hz in [1e-300, 1e12] {
            let c = SwarmConfig {
                tick_hz: hz,
                ..SwarmConfig::default()
            };
            assert!(
                matches!(c.validate(), Err(SwarmError::InvalidConfig(_))),
                "tick_hz {hz} accepted"
            );
        }
    }

    #[test]
    fn tick_period_rounds_to_nearest_nanosecond() {
        assert_eq!(tick_period(120.0).unwrap(), Duration::from_nanos(8_333_333));
        assert_eq!(tick_period(60.0).unwrap(), Duration::from_nanos(16_666_667));
        assert_eq!(tick_period(1.0).unwrap(), Duration::from_secs(1));
    }

    #[test]
    fn validate_rejects_unknown_palette() {
        let c = SwarmConfig {
            palette: "plaid".into(),
            ..SwarmConfig::default()
        };
        assert!(matches!(c.validate(), Err(SwarmError::InvalidPalette(_))));
    }
}
