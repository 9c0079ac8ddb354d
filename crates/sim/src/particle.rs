//! A single particle and its per-tick motion rules.
//!
//! Each tick runs the mode's motion first (advance the phase angle, compute
//! a target, move a fixed fraction of the way there) and then, while a drag
//! is active, the radial drag displacement.

use glam::DVec2;
use swarm_core::{DragState, Mode, Motion};

/// Phase advance per tick while circulating.
const CIRCULATE_SPIN: f64 = 0.04;
/// Orbit radius around the base while circulating.
const CIRCULATE_RADIUS: f64 = 5.0;
const CIRCULATE_GAIN: DVec2 = DVec2::new(0.1, 0.1);

const OUTLINE_SPIN: f64 = 0.03;
const OUTLINE_RADIUS: f64 = 60.0;
/// Faster on y, which stretches the orbit vertically.
const OUTLINE_GAIN: DVec2 = DVec2::new(0.1, 0.2);

const EXPLODE_SPIN: f64 = 0.05;
/// Ring radius around the listening center (half of the 360 glyph box).
const EXPLODE_RADIUS: f64 = 180.0;
const EXPLODE_GAIN: DVec2 = DVec2::new(0.1, 0.1);

/// Distance at which the drag force reaches its floor.
pub const DRAG_RANGE: f64 = 200.0;
/// Scale applied to the largest drag velocity component.
pub const DRAG_VELOCITY_SCALE: f64 = 0.00005;
/// Fraction of the scaled offset applied per tick.
pub const DRAG_STRENGTH: f64 = 0.3;

/// One rendered point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    position: DVec2,
    base: DVec2,
    density: f64,
    angle: f64,
}

impl Particle {
    pub fn new(position: DVec2, base: DVec2, density: f64, angle: f64) -> Self {
        Self {
            position,
            base,
            density,
            angle,
        }
    }

    /// Current drawn location.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Fixed anchor sampled from the shape mask.
    pub fn base(&self) -> DVec2 {
        self.base
    }

    /// Per-particle variation in [5, 20]; not used by the motion rules.
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Phase accumulator, unbounded.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Advances one tick: mode motion, then drag if one is active.
    pub fn update(&mut self, mode: Mode, listening_center: DVec2, drag: Option<&DragState>) {
        match mode.motion() {
            Motion::Circulate => self.circulate(),
            Motion::ExplodeOutward => self.explode_outward(listening_center),
            Motion::MoveToOutline => self.move_to_outline(),
        }

        if let Some(drag) = drag {
            self.apply_drag(drag);
        }
    }

    /// Where `mode` pulls this particle at the current angle.
    pub fn target(&self, mode: Mode, listening_center: DVec2) -> DVec2 {
        match mode.motion() {
            Motion::Circulate => orbit(self.base, self.angle, CIRCULATE_RADIUS),
            Motion::ExplodeOutward => orbit(listening_center, self.angle, EXPLODE_RADIUS),
            Motion::MoveToOutline => orbit(self.base, self.angle, OUTLINE_RADIUS),
        }
    }

    pub fn circulate(&mut self) {
        self.angle += CIRCULATE_SPIN;
        let target = orbit(self.base, self.angle, CIRCULATE_RADIUS);
        self.position = approach(self.position, target, CIRCULATE_GAIN);
    }

    pub fn move_to_outline(&mut self) {
        self.angle += OUTLINE_SPIN;
        let target = orbit(self.base, self.angle, OUTLINE_RADIUS);
        self.position = approach(self.position, target, OUTLINE_GAIN);
    }

    /// Every particle chases the same ring; only the angle tells them apart.
    pub fn explode_outward(&mut self, center: DVec2) {
        self.angle += EXPLODE_SPIN;
        let target = orbit(center, self.angle, EXPLODE_RADIUS);
        self.position = approach(self.position, target, EXPLODE_GAIN);
    }

    /// Pushes the particle along its offset from the drag point.
    pub fn apply_drag(&mut self, drag: &DragState) {
        let offset = self.position - drag.position;
        let force = drag_force(offset.length(), drag.speed());
        self.position += offset * force * DRAG_STRENGTH;
    }
}

/// Drag force for a particle `distance` away from the pointer.
///
/// Linear falloff from 1 at the pointer to 0 at [`DRAG_RANGE`], plus a small
/// kick proportional to `speed` (the largest absolute velocity component).
pub fn drag_force(distance: f64, speed: f64) -> f64 {
    (DRAG_RANGE - distance.min(DRAG_RANGE)) / DRAG_RANGE + speed * DRAG_VELOCITY_SCALE
}

/// Moves `gain` of the remaining distance toward `target`, per axis.
pub fn approach(current: DVec2, target: DVec2, gain: DVec2) -> DVec2 {
    current + (target - current) * gain
}

fn orbit(center: DVec2, angle: f64, radius: f64) -> DVec2 {
    center + DVec2::new(angle.cos(), angle.sin()) * radius
}
