//! Pointer drag tracking and haptic notification.
//!
//! The host forwards its gesture callbacks here; the tracker keeps the one
//! piece of state the simulation needs (the current drag, if any) and pings
//! the haptic sink on every drag update.

use glam::DVec2;
use log::trace;
use swarm_core::DragState;

/// Receiver for fire-and-forget haptic pulses.
pub trait HapticSink {
    /// Called once per drag update. Must not block.
    fn impact(&mut self);
}

/// Sink that ignores every pulse.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticSink for NoHaptics {
    fn impact(&mut self) {}
}

/// Current pointer drag as seen by the simulation.
pub struct InputTracker {
    drag: Option<DragState>,
    haptics: Box<dyn HapticSink>,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(Box::new(NoHaptics))
    }
}

impl InputTracker {
    pub fn new(haptics: Box<dyn HapticSink>) -> Self {
        Self {
            drag: None,
            haptics,
        }
    }

    /// Records the latest pointer position and velocity and fires one haptic pulse.
    pub fn drag_changed(&mut self, position: DVec2, velocity: Option<DVec2>) {
        trace!("drag at ({:.1}, {:.1})", position.x, position.y);
        self.drag = Some(DragState::new(position, velocity));
        self.haptics.impact();
    }

    /// Clears the drag. Position and velocity both become absent.
    pub fn drag_ended(&mut self) {
        trace!("drag ended");
        self.drag = None;
    }

    /// The drag to feed into the next tick.
    pub fn current(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
