//! The particle field: owns every particle and rebuilds them on mode change.
//!
//! A mode change resamples the whole particle set from the mode's glyph.
//! Ticks advance every particle with the current mode's motion rule and the
//! shared drag state. Both take `&mut self`, so a tick can never see a
//! partially rebuilt set.

use glam::DVec2;
use log::{debug, warn};
use swarm_core::{
    DragState, DrawPoint, Mode, ShapeSampler, Simulation, SwarmConfig, SwarmError, Viewport,
    Xorshift64,
};

use crate::particle::Particle;

/// Range of the per-particle density draw.
const DENSITY_RANGE: (f64, f64) = (5.0, 20.0);
/// Initial angles are drawn from [0, 360).
const ANGLE_RANGE: (f64, f64) = (0.0, 360.0);

/// The full particle collection and the mode it is animating.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    mode: Mode,
    /// Mode whose glyph the current bases were sampled from.
    built_for: Mode,
    count: usize,
    viewport: Viewport,
    shape_size: usize,
    listening_lift: f64,
    carry_positions: bool,
    palette_len: usize,
    sampler: ShapeSampler,
    rng: Xorshift64,
    generation: u64,
}

impl ParticleField {
    /// Builds the initial particle set for [`Mode::Idle`].
    ///
    /// Returns an error if the config is invalid or the initial glyph yields
    /// no particles; there is no previous set to fall back on at startup.
    pub fn new(config: &SwarmConfig) -> Result<Self, SwarmError> {
        config.validate()?;
        let rng = config
            .seed
            .map(Xorshift64::new)
            .unwrap_or_else(Xorshift64::from_clock);
        let mut field = Self {
            particles: Vec::with_capacity(config.particle_count),
            mode: Mode::Idle,
            built_for: Mode::Idle,
            count: config.particle_count,
            viewport: config.viewport,
            shape_size: config.shape_size,
            listening_lift: config.listening_lift,
            carry_positions: config.carry_positions,
            palette_len: config.palette().len(),
            sampler: ShapeSampler::from_config(config),
            rng,
            generation: 0,
        };
        field.rebuild()?;
        Ok(field)
    }

    /// Switches mode and rebuilds the particle set from the mode's glyph.
    ///
    /// Setting the current mode again is a no-op once its glyph has been
    /// sampled; after a failed switch the same mode is retried. If sampling
    /// comes up short, the previous particles stay in place, the new mode
    /// still drives motion, and `SwarmError::ShapeSampling` is returned.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), SwarmError> {
        if mode == self.mode && mode == self.built_for {
            return Ok(());
        }
        debug!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.rebuild()
    }

    /// Rebuilds the particle set for the current mode, drawing new bases.
    pub fn resample(&mut self) -> Result<(), SwarmError> {
        self.rebuild()
    }

    /// Advances every particle by one tick.
    pub fn tick(&mut self, drag: Option<&DragState>) {
        let mode = self.mode;
        let center = self.listening_center();
        for particle in &mut self.particles {
            particle.update(mode, center, drag);
        }
    }

    /// Render data: positions in list order, colored by slot.
    pub fn snapshot(&self) -> Vec<DrawPoint> {
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let pos = p.position();
                DrawPoint {
                    x: pos.x,
                    y: pos.y,
                    color_index: i % self.palette_len,
                }
            })
            .collect()
    }

    /// Changes the viewport used for future rebuilds and the listening center.
    /// Existing bases are not moved.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), SwarmError> {
        viewport.validate()?;
        debug!("viewport {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Center of the listening ring for the current viewport.
    pub fn listening_center(&self) -> DVec2 {
        self.viewport.listening_center(self.listening_lift)
    }

    /// Mode the current bases were sampled for. Differs from [`mode`](Self::mode)
    /// after a failed switch.
    pub fn built_for(&self) -> Mode {
        self.built_for
    }

    /// Number of successful rebuilds so far (the initial build counts).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn rebuild(&mut self) -> Result<(), SwarmError> {
        let shape = self.mode.shape();
        let bases = self.sampler.sample(
            shape,
            self.shape_size,
            self.count,
            self.viewport,
            &mut self.rng,
        );
        if bases.len() < self.count {
            warn!(
                "sampling {shape} gave {} of {} bases, keeping {} existing particles",
                bases.len(),
                self.count,
                self.particles.len()
            );
            return Err(SwarmError::ShapeSampling {
                requested: self.count,
                got: bases.len(),
            });
        }

        let previous = std::mem::take(&mut self.particles);
        let carry = self.carry_positions;
        let viewport = self.viewport;
        let rng = &mut self.rng;

        self.particles = bases
            .into_iter()
            .enumerate()
            .map(|(i, base)| {
                let position = match previous.get(i) {
                    Some(old) if carry => old.position(),
                    _ => rng.next_point(viewport.width, viewport.height),
                };
                let density = rng.next_range_inclusive(DENSITY_RANGE.0, DENSITY_RANGE.1);
                let angle = rng.next_range(ANGLE_RANGE.0, ANGLE_RANGE.1);
                Particle::new(position, base, density, angle)
            })
            .collect();
        self.built_for = self.mode;
        self.generation += 1;

        debug!(
            "rebuilt {} particles from {shape} (generation {})",
            self.particles.len(),
            self.generation
        );
        Ok(())
    }
}

impl Simulation for ParticleField {
    fn set_mode(&mut self, mode: Mode) -> Result<(), SwarmError> {
        ParticleField::set_mode(self, mode)
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn tick(&mut self, drag: Option<&DragState>) {
        ParticleField::tick(self, drag)
    }

    fn snapshot(&self) -> Vec<DrawPoint> {
        ParticleField::snapshot(self)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<(), SwarmError> {
        ParticleField::set_viewport(self, viewport)
    }
}
