//! A running swarm: simulation, input, and scheduler under one owner.
//!
//! The session is the single serialized timeline every host callback goes
//! through. Mode changes, drag updates, resizes, and ticks all take
//! `&mut self`, so they never overlap. It drives any [`Simulation`]; the
//! default is the particle field.

use std::time::Duration;

use glam::DVec2;
use log::{info, warn};
use serde::Serialize;
use swarm_core::{DrawPoint, Mode, Simulation, SwarmConfig, SwarmError, Viewport};
use swarm_sim::{HapticSink, InputTracker, ParticleField};

use crate::scheduler::{FrameScheduler, TickBudget};
use crate::timeline::{Event, Timeline};

/// Summary of a timeline playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackReport {
    /// Ticks run, including the immediate tick after each release.
    pub ticks: u64,
    pub events_applied: usize,
    /// Mode changes that kept the previous particles.
    pub sampling_failures: usize,
    /// Events scheduled at or after the final tick, never applied.
    pub events_skipped: usize,
}

pub struct Session<S: Simulation = ParticleField> {
    sim: S,
    input: InputTracker,
    scheduler: FrameScheduler,
    ticks: u64,
}

impl Session<ParticleField> {
    /// Builds a particle field and scheduler from `config`.
    pub fn new(config: &SwarmConfig, haptics: Box<dyn HapticSink>) -> Result<Self, SwarmError> {
        let field = ParticleField::new(config)?;
        let scheduler = FrameScheduler::from_config(config)?;
        info!(
            "session: {} particles, {}x{} viewport, {} Hz",
            field.len(),
            config.viewport.width,
            config.viewport.height,
            config.tick_hz
        );
        Ok(Self::with_simulation(field, scheduler, haptics))
    }
}

impl<S: Simulation> Session<S> {
    pub fn with_simulation(sim: S, scheduler: FrameScheduler, haptics: Box<dyn HapticSink>) -> Self {
        Self {
            sim,
            input: InputTracker::new(haptics),
            scheduler,
            ticks: 0,
        }
    }

    /// Switches mode. A sampling shortfall keeps the old particles, still
    /// switches motion, and is returned so the host can report it.
    pub fn select_mode(&mut self, mode: Mode) -> Result<(), SwarmError> {
        self.sim.set_mode(mode)
    }

    pub fn drag_changed(&mut self, position: DVec2, velocity: Option<DVec2>) {
        self.input.drag_changed(position, velocity);
    }

    /// Clears the drag and runs one tick straight away so the release is
    /// visible without waiting for the next deadline.
    pub fn drag_ended(&mut self) {
        self.input.drag_ended();
        self.tick();
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SwarmError> {
        self.sim.set_viewport(viewport)
    }

    pub fn tick(&mut self) {
        self.sim.tick(self.input.current());
        self.ticks += 1;
    }

    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Feeds `elapsed` wall time to the scheduler and runs the ticks it allows.
    pub fn advance(&mut self, elapsed: Duration) -> TickBudget {
        let budget = self.scheduler.advance(elapsed);
        self.run_ticks(budget.run);
        budget
    }

    /// Ticks in real time for `duration`, blocking the current thread.
    pub fn run_realtime(&mut self, duration: Duration) -> TickBudget {
        let Session {
            sim,
            input,
            scheduler,
            ticks,
        } = self;
        scheduler.run_for(duration, |_| {
            sim.tick(input.current());
            *ticks += 1;
        })
    }

    /// Applies one host event.
    pub fn apply(&mut self, event: &Event) -> Result<(), SwarmError> {
        match *event {
            Event::Mode(mode) => self.select_mode(mode),
            Event::Drag { position, velocity } => {
                self.drag_changed(DVec2::from_array(position), velocity.map(DVec2::from_array));
                Ok(())
            }
            Event::Release => {
                self.drag_ended();
                Ok(())
            }
            Event::Resize { width, height } => self.resize(Viewport::new(width, height)),
        }
    }

    /// Runs `total_ticks` scheduled ticks, applying each timeline event just
    /// before the tick it names.
    ///
    /// Sampling failures are logged and counted; any other error stops
    /// playback.
    pub fn play(&mut self, timeline: &Timeline, total_ticks: u64) -> Result<PlaybackReport, SwarmError> {
        let start = self.ticks;
        let mut report = PlaybackReport::default();

        for t in 0..total_ticks {
            for event in timeline.events_at(t) {
                match self.apply(event) {
                    Ok(()) => {}
                    Err(e @ SwarmError::ShapeSampling { .. }) => {
                        warn!("tick {t}: {e}");
                        report.sampling_failures += 1;
                    }
                    Err(e) => return Err(e),
                }
                report.events_applied += 1;
            }
            self.tick();
        }

        report.events_skipped = timeline
            .entries()
            .iter()
            .filter(|e| e.tick >= total_ticks)
            .count();
        if report.events_skipped > 0 {
            warn!(
                "{} timeline events fall after tick {total_ticks} and were skipped",
                report.events_skipped
            );
        }
        report.ticks = self.ticks - start;
        Ok(report)
    }

    pub fn snapshot(&self) -> Vec<DrawPoint> {
        self.sim.snapshot()
    }

    pub fn mode(&self) -> Mode {
        self.sim.mode()
    }

    pub fn viewport(&self) -> Viewport {
        self.sim.viewport()
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Ticks run since the session started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
