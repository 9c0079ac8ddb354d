#![deny(unsafe_code)]
//! Core types for the particle swarm.
//!
//! Provides the `Simulation` trait and `DrawPoint` render data, `Mode`,
//! `DragState`, the `AlphaMask` raster, glyph `Shape`s and the
//! `ShapeSampler`, indexed `Palette`s, the `Xorshift64` PRNG, and
//! `SwarmConfig`.

pub mod color;
pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod mask;
pub mod mode;
pub mod palette;
pub mod prng;
pub mod sampler;
pub mod shape;

pub use color::Srgb;
pub use config::{SwarmConfig, Viewport};
pub use drag::DragState;
pub use engine::{DrawPoint, Simulation};
pub use error::SwarmError;
pub use mask::AlphaMask;
pub use mode::{Curve, Mode, Motion};
pub use palette::Palette;
pub use prng::Xorshift64;
pub use sampler::ShapeSampler;
pub use shape::Shape;
