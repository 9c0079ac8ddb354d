//! The `Simulation` trait every swarm implementation provides.
//!
//! The trait is object-safe so hosts can drive a `dyn Simulation` without
//! knowing the concrete particle store.

use serde::{Deserialize, Serialize};

use crate::config::Viewport;
use crate::drag::DragState;
use crate::error::SwarmError;
use crate::mode::Mode;

/// One drawable point handed to the renderer sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawPoint {
    pub x: f64,
    pub y: f64,
    /// Palette slot; stable per list position, not per particle.
    pub color_index: usize,
}

/// Core trait for a mode-driven particle simulation.
///
/// `set_mode` and `tick` take `&mut self`, so both always run on the same
/// serialized timeline and a tick never observes a half-rebuilt swarm.
pub trait Simulation {
    /// Switches mode and resamples the particle set for the mode's shape.
    ///
    /// On a sampling failure the previous particles are kept, the new mode
    /// still drives motion, and the error is returned for reporting.
    fn set_mode(&mut self, mode: Mode) -> Result<(), SwarmError>;

    /// Current mode.
    fn mode(&self) -> Mode;

    /// Advances every particle by one tick.
    fn tick(&mut self, drag: Option<&DragState>);

    /// Ordered render data for the current state.
    fn snapshot(&self) -> Vec<DrawPoint>;

    /// Drawing area used for sampling offsets and the listening center.
    fn viewport(&self) -> Viewport;

    /// Changes the drawing area. Rejects degenerate sizes.
    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), SwarmError>;
}
