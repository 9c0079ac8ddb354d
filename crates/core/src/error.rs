//! Error types for the particle swarm core.

use thiserror::Error;

/// Errors produced by swarm operations.
///
/// Sampling failures are recoverable: the field keeps its previous particle
/// set and reports the error to the caller instead of panicking.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// Width or height was zero (or overflowed) when creating a mask or viewport.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A configuration value was out of its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A mode name did not match any of the four modes.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// A glyph/symbol id did not match any known shape.
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    /// The shape sampler produced fewer bases than requested.
    #[error("shape sampling failed: requested {requested} points, got {got}")]
    ShapeSampling { requested: usize, got: usize },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed or looked up.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Writing a snapshot or reading an input file failed.
    #[error("I/O error: {0}")]
    Io(String),
}
