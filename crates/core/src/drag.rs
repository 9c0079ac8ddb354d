//! Pointer drag state fed into every tick.

use glam::DVec2;

/// An active pointer drag.
///
/// Absence of a drag is modelled as `Option<DragState>::None`; while a drag
/// is active its position is always known but the host may not report a
/// velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub position: DVec2,
    pub velocity: Option<DVec2>,
}

impl DragState {
    pub fn new(position: DVec2, velocity: Option<DVec2>) -> Self {
        Self { position, velocity }
    }

    /// Largest absolute velocity component, or 0 when no velocity is known.
    pub fn speed(&self) -> f64 {
        self.velocity
            .map(|v| v.x.abs().max(v.y.abs()))
            .unwrap_or(0.0)
    }
}
