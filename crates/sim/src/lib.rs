#![deny(unsafe_code)]
//! Particle swarm simulation.
//!
//! A [`ParticleField`] holds a fixed number of [`Particle`]s sampled from the
//! current mode's glyph. Each tick every particle runs its mode's motion
//! rule:
//!
//! - idle / question: small orbit around its own base
//! - speaking: wide, vertically stretched orbit around its base
//! - listening: a rotating ring shared by the whole swarm
//!
//! followed by a radial push away from the pointer while a drag is active.
//! [`InputTracker`] turns host gesture callbacks into that drag state.

pub mod field;
pub mod input;
pub mod particle;

pub use field::ParticleField;
pub use input::{HapticSink, InputTracker, NoHaptics};
pub use particle::Particle;
